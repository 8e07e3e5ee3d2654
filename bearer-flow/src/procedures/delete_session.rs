//! delete_session - tears down a PDN session on the two nodes of the exchange

use super::Procedure;
use crate::data::{Config, DeleteSessionPolicy, NodeState};
use anyhow::Result;
use derive_deref::{Deref, DerefMut};
use gtpc::CallFlowMessage;
use slog::{Logger, debug};

#[derive(Deref, DerefMut)]
pub struct DeleteSessionProcedure<'a>(Procedure<'a>);

impl<'a> DeleteSessionProcedure<'a> {
    pub fn new(store: &'a mut NodeState, config: &'a Config, logger: &'a Logger) -> Self {
        DeleteSessionProcedure(Procedure::new(store, config, logger))
    }

    // Delete Session Procedure
    // 1.    Delete Session Request >>   (sessions marked for teardown, or removed if eager)
    // 2.    Delete Session Response <<  (nodes' sessions removed)
    pub fn request(&mut self, cf: &CallFlowMessage) -> Result<()> {
        self.log_message(">> Delete Session Request");
        if self.config.delete_session_policy == DeleteSessionPolicy::Eager {
            self.remove_nodes(cf);
            return Ok(());
        }
        for node in cf.nodes() {
            for session in self.store.sessions_mut(node) {
                session.teardown = true;
                for bearer in session.bearers_mut().filter(|b| !b.delete_pending) {
                    bearer.pending = true;
                    bearer.active = false;
                }
            }
        }
        Ok(())
    }

    pub fn response(&mut self, cf: &CallFlowMessage) -> Result<()> {
        self.log_message("<< Delete Session Response");
        self.remove_nodes(cf);
        Ok(())
    }

    fn remove_nodes(&mut self, cf: &CallFlowMessage) {
        let logger = self.logger;
        for node in cf.nodes() {
            let removed = self.store.remove_node(node);
            debug!(logger, "{node}: removed {removed} sessions");
        }
    }
}
