mod data;
mod procedures;
mod replay;

pub use data::trace::load_trace_file;
pub use data::{
    BearerContext, Config, DeleteSessionPolicy, Lbi, MatchKey, NodeRole, NodeState,
    SessionContext, TunnelEndpoint, TunnelSlot, Tunnels, load_config_file,
};
pub use procedures::correlation::{Correlation, MatchTier, correlate};
pub use procedures::{handle_message, next_state};
pub use replay::{EngineState, History, ReplayEngine};
