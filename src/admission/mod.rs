mod controller;
mod sweeper;

pub use controller::{AdmissionController, Decision, ANONYMOUS_CLIENT};
pub use sweeper::spawn_sweeper;
