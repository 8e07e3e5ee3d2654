mod bearer_setup;
pub mod correlation;
mod create_bearer;
mod create_session;
mod delete_bearer;
mod delete_session;
mod modify_bearer;
mod procedure;

pub use create_bearer::CreateBearerProcedure;
pub use create_session::CreateSessionProcedure;
pub use delete_bearer::DeleteBearerProcedure;
pub use delete_session::DeleteSessionProcedure;
pub use modify_bearer::ModifyBearerProcedure;
pub use procedure::Procedure;

use crate::data::{Config, NodeState};
use anyhow::Result;
use gtpc::{CallFlowMessage, MessageKind, ProcedureFamily};
use slog::{Logger, debug, warn};

/// Apply one message to the store in place.  On error the store may be partly updated.
/// Messages outside the bearer procedures leave the store untouched.
pub fn handle_message(
    store: &mut NodeState,
    cf: &CallFlowMessage,
    config: &Config,
    logger: &Logger,
) -> Result<()> {
    let MessageKind::Gtpc(procedure) = &cf.procedure else {
        debug!(logger, "{} {} takes no part in bearer state", cf.procedure, cf.id);
        return Ok(());
    };
    let request = procedure.is_request();
    match procedure.family() {
        ProcedureFamily::CreateSession => {
            let mut p = CreateSessionProcedure::new(store, config, logger);
            if request {
                p.request(cf)
            } else {
                p.response(cf)
            }
        }
        ProcedureFamily::CreateBearer => {
            let mut p = CreateBearerProcedure::new(store, config, logger);
            if request {
                p.request(cf)
            } else {
                p.response(cf)
            }
        }
        ProcedureFamily::ModifyBearer => {
            let mut p = ModifyBearerProcedure::new(store, config, logger);
            if request {
                p.request(cf)
            } else {
                p.response(cf)
            }
        }
        ProcedureFamily::DeleteBearer => {
            let mut p = DeleteBearerProcedure::new(store, config, logger);
            if request {
                p.request(cf)
            } else {
                p.response(cf)
            }
        }
        ProcedureFamily::DeleteSession => {
            let mut p = DeleteSessionProcedure::new(store, config, logger);
            if request {
                p.request(cf)
            } else {
                p.response(cf)
            }
        }
    }
}

/// The state that follows `previous` once `cf` is applied.  A message that cannot be
/// applied leaves the state as it was.
pub fn next_state(
    previous: &NodeState,
    cf: &CallFlowMessage,
    config: &Config,
    logger: &Logger,
) -> NodeState {
    let mut working = previous.clone();
    match handle_message(&mut working, cf, config, logger) {
        Ok(()) => working,
        Err(e) => {
            warn!(logger, "Message {} ignored - {e}", cf.id);
            previous.clone()
        }
    }
}
