//! gtpc - decoded GTPv2-C call flow messages, as handed over by the capture decoder

mod conversion;
mod error;
mod ies;
mod message;

pub use error::ModelError;
pub use ies::{Ebi, FTeid, InterfaceType, NodeId, Teid};
pub use message::{BearerSpec, CallFlowMessage, MessageKind, Procedure, ProcedureFamily};
