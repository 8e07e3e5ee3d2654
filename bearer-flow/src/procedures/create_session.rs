//! create_session - establishes a PDN session and its default bearer on both nodes

use super::Procedure;
use super::bearer_setup::{InitialKey, confirm_pending_bearers, stage_bearers};
use crate::data::{Config, Lbi, NodeState};
use anyhow::{Result, ensure};
use derive_deref::{Deref, DerefMut};
use gtpc::CallFlowMessage;
use slog::{Logger, debug, warn};

#[derive(Deref, DerefMut)]
pub struct CreateSessionProcedure<'a>(Procedure<'a>);

impl<'a> CreateSessionProcedure<'a> {
    pub fn new(store: &'a mut NodeState, config: &'a Config, logger: &'a Logger) -> Self {
        CreateSessionProcedure(Procedure::new(store, config, logger))
    }

    // Create Session Procedure
    // 1.    Create Session Request >>   (bearers staged pending on both nodes)
    // 2.    Create Session Response <<  (pending bearers confirmed)
    pub fn request(&mut self, cf: &CallFlowMessage) -> Result<()> {
        self.log_message(">> Create Session Request");
        ensure!(
            !cf.bearer_list.is_empty(),
            "Create Session Request {} has no Bearer Contexts",
            cf.id
        );
        let lbi = Lbi::from(cf.bearer_list[0].ebi);
        let logger = self.logger;
        if lbi == Lbi::Unknown {
            warn!(logger, "Create Session Request {} - default bearer EBI not known", cf.id);
        }
        for node in cf.nodes() {
            let session = self.store.get_or_create_session(node, lbi);
            stage_bearers(session, &cf.bearer_list, node, InitialKey::LocalOnly, logger);
        }
        Ok(())
    }

    pub fn response(&mut self, cf: &CallFlowMessage) -> Result<()> {
        self.log_message("<< Create Session Response");
        let logger = self.logger;
        let config = self.config;
        for node in cf.nodes() {
            let confirmed =
                confirm_pending_bearers(self.store, node, None, &cf.bearer_list, config, logger);
            // A session staged without a known LBI takes it from its default bearer.
            for c in confirmed
                .into_iter()
                .filter(|c| c.lbi == Lbi::Unknown && c.index == 0)
            {
                if self.store.rekey_session(node, Lbi::Unknown, Lbi::Ebi(c.ebi)) {
                    debug!(logger, "{node}: session now has LBI {}", c.ebi);
                } else {
                    warn!(logger, "{node}: LBI {} already in use - session left unkeyed", c.ebi);
                }
            }
        }
        Ok(())
    }
}
