mod bearer_context;
mod config;
mod node_role;
mod node_state;
mod session_context;
pub mod trace;

pub use bearer_context::*;
pub use config::*;
pub use node_role::*;
pub use node_state::*;
pub use session_context::*;
