use crate::data::{Config, NodeState};
use slog::{Logger, debug};

/// What every procedure handler works on: the store being updated, the replay
/// configuration and the per-step logger.
pub struct Procedure<'a> {
    pub store: &'a mut NodeState,
    pub config: &'a Config,
    pub logger: &'a Logger,
}

impl<'a> Procedure<'a> {
    pub fn new(store: &'a mut NodeState, config: &'a Config, logger: &'a Logger) -> Self {
        Procedure {
            store,
            config,
            logger,
        }
    }
    pub fn log_message(&self, s: &str) {
        debug!(self.logger, "{}", s)
    }
}
