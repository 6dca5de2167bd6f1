pub mod intent;
pub mod verdict;

pub use intent::Intent;
pub use verdict::{Entities, IntentVerdict, SpamVerdict};
