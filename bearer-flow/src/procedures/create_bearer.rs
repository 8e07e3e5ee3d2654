//! create_bearer - adds a dedicated bearer to an existing PDN session

use super::Procedure;
use super::bearer_setup::{InitialKey, confirm_pending_bearers, stage_bearers};
use crate::data::{Config, Lbi, NodeState};
use anyhow::{Result, anyhow};
use derive_deref::{Deref, DerefMut};
use gtpc::CallFlowMessage;
use slog::{Logger, debug};

#[derive(Deref, DerefMut)]
pub struct CreateBearerProcedure<'a>(Procedure<'a>);

impl<'a> CreateBearerProcedure<'a> {
    pub fn new(store: &'a mut NodeState, config: &'a Config, logger: &'a Logger) -> Self {
        CreateBearerProcedure(Procedure::new(store, config, logger))
    }

    // Create Bearer Procedure
    // 1.    Create Bearer Request >>   (LBI in the message, new bearers staged pending)
    // 2.    Create Bearer Response <<  (pending bearers confirmed)
    pub fn request(&mut self, cf: &CallFlowMessage) -> Result<()> {
        self.log_message(">> Create Bearer Request");
        let lbi = Lbi::Ebi(
            cf.ebi
                .ok_or_else(|| anyhow!("Create Bearer Request {} has no LBI", cf.id))?,
        );
        let logger = self.logger;
        for node in cf.nodes() {
            let Some(session) = self.store.session_mut(node, lbi) else {
                debug!(logger, "{node}: no session with LBI {lbi} - ignored");
                continue;
            };
            stage_bearers(session, &cf.bearer_list, node, InitialKey::FirstFTeid, logger);
        }
        Ok(())
    }

    pub fn response(&mut self, cf: &CallFlowMessage) -> Result<()> {
        self.log_message("<< Create Bearer Response");
        let lbi = cf.ebi.map(Lbi::Ebi);
        let logger = self.logger;
        let config = self.config;
        for node in cf.nodes() {
            confirm_pending_bearers(self.store, node, lbi, &cf.bearer_list, config, logger);
        }
        Ok(())
    }
}
