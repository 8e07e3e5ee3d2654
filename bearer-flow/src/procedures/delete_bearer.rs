//! delete_bearer - removes dedicated bearers from a PDN session

use super::Procedure;
use crate::data::{Config, NodeState};
use anyhow::{Result, ensure};
use derive_deref::{Deref, DerefMut};
use gtpc::{CallFlowMessage, Ebi};
use slog::{Logger, debug};

#[derive(Deref, DerefMut)]
pub struct DeleteBearerProcedure<'a>(Procedure<'a>);

impl<'a> DeleteBearerProcedure<'a> {
    pub fn new(store: &'a mut NodeState, config: &'a Config, logger: &'a Logger) -> Self {
        DeleteBearerProcedure(Procedure::new(store, config, logger))
    }

    // Delete Bearer Procedure
    // 1.    Delete Bearer Request >>   (bearers marked for deletion)
    // 2.    Delete Bearer Response <<  (bearers removed, and the session once it is empty)
    pub fn request(&mut self, cf: &CallFlowMessage) -> Result<()> {
        self.log_message(">> Delete Bearer Request");
        let logger = self.logger;
        for ebi in target_ebis(cf)? {
            for node in cf.nodes() {
                match self
                    .store
                    .find_session_by_ebi(node, ebi)
                    .and_then(|session| session.bearer_mut(ebi))
                {
                    Some(bearer) => {
                        bearer.delete_pending = true;
                        bearer.active = false;
                    }
                    None => debug!(logger, "{node}: no bearer {ebi} to delete"),
                }
            }
        }
        Ok(())
    }

    pub fn response(&mut self, cf: &CallFlowMessage) -> Result<()> {
        self.log_message("<< Delete Bearer Response");
        let logger = self.logger;
        for ebi in target_ebis(cf)? {
            for node in cf.nodes() {
                if self.store.remove_bearer(node, ebi).is_none() {
                    debug!(logger, "{node}: no bearer {ebi} to remove");
                }
            }
        }
        Ok(())
    }
}

// The message's own EBI if it has one, otherwise every EBI in its Bearer Contexts.
fn target_ebis(cf: &CallFlowMessage) -> Result<Vec<Ebi>> {
    let ebis: Vec<Ebi> = match cf.ebi {
        Some(ebi) => vec![ebi],
        None => cf.bearer_list.iter().filter_map(|spec| spec.ebi).collect(),
    };
    ensure!(!ebis.is_empty(), "{} {} names no bearer", cf.procedure, cf.id);
    Ok(ebis)
}
