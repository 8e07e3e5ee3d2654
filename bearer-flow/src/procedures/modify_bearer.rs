//! modify_bearer - renegotiates a bearer's tunnel endpoints, typically the S1-U side

use super::Procedure;
use crate::data::{Config, NodeState};
use anyhow::{Result, anyhow, ensure};
use derive_deref::{Deref, DerefMut};
use gtpc::{BearerSpec, CallFlowMessage};
use slog::{Logger, debug};

#[derive(Deref, DerefMut)]
pub struct ModifyBearerProcedure<'a>(Procedure<'a>);

impl<'a> ModifyBearerProcedure<'a> {
    pub fn new(store: &'a mut NodeState, config: &'a Config, logger: &'a Logger) -> Self {
        ModifyBearerProcedure(Procedure::new(store, config, logger))
    }

    // Modify Bearer Procedure
    // 1.    Modify Bearer Request >>   (bearer pending again, usually S1-U eNB updated)
    // 2.    Modify Bearer Response <<  (bearer confirmed, usually S1-U SGW updated)
    pub fn request(&mut self, cf: &CallFlowMessage) -> Result<()> {
        self.log_message(">> Modify Bearer Request");
        self.modify(cf, true)
    }

    pub fn response(&mut self, cf: &CallFlowMessage) -> Result<()> {
        self.log_message("<< Modify Bearer Response");
        self.modify(cf, false)
    }

    fn modify(&mut self, cf: &CallFlowMessage, pending: bool) -> Result<()> {
        ensure!(
            !cf.bearer_list.is_empty(),
            "{} {} has no Bearer Contexts",
            cf.procedure,
            cf.id
        );
        let logger = self.logger;
        for BearerSpec { ebi, fteids } in cf.bearer_list.iter() {
            let ebi =
                ebi.ok_or_else(|| anyhow!("{} {} - bearer without EBI", cf.procedure, cf.id))?;
            for node in cf.nodes() {
                let Some(bearer) = self
                    .store
                    .find_session_by_ebi(node, ebi)
                    .and_then(|session| session.bearer_mut(ebi))
                else {
                    debug!(logger, "{node}: no bearer {ebi} - ignored");
                    continue;
                };
                if bearer.delete_pending {
                    debug!(logger, "{node}: bearer {bearer} is being deleted - not modified");
                    continue;
                }
                for fteid in fteids.iter() {
                    bearer.tunnels.record(fteid);
                }
                bearer.pending = pending;
                bearer.active = !pending;
            }
        }
        Ok(())
    }
}
