pub mod env;
mod loader;

pub use env::{
    AdmissionConfig, AppConfig, ClassifierConfig, DirectoryConfig, ServerConfig, SpeechConfig,
};
pub use loader::load_config;
