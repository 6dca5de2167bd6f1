mod error;
mod handlers;
mod middleware;
mod router;
mod state;

pub use router::build_router;
pub use state::ApiState;
