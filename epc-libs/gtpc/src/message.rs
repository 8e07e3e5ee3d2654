use crate::conversion::{null_as_empty, optional_ebi};
use crate::{Ebi, FTeid, NodeId};
use serde::{Deserialize, Serialize};

/// The GTP-C procedures that take part in the call flow.  Resolved once when a trace is
/// loaded, from either the variant name or the decoder's display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Procedure {
    CreateSessionRequest,
    CreateSessionResponse,
    CreateBearerRequest,
    CreateBearerResponse,
    ModifyBearerRequest,
    ModifyBearerResponse,
    DeleteBearerRequest,
    DeleteBearerResponse,
    DeleteSessionRequest,
    DeleteSessionResponse,
}

/// What a call flow message is.  The decoder also reports messages that neither set up
/// nor tear down bearers, such as Release Access Bearers or Downlink Data Notification.
/// These are carried by name as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Gtpc(Procedure),
    Other(String),
}

impl MessageKind {
    pub fn procedure(&self) -> Option<Procedure> {
        match self {
            MessageKind::Gtpc(procedure) => Some(*procedure),
            MessageKind::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureFamily {
    CreateSession,
    CreateBearer,
    ModifyBearer,
    DeleteBearer,
    DeleteSession,
}

impl Procedure {
    pub const ALL: [Procedure; 10] = [
        Procedure::CreateSessionRequest,
        Procedure::CreateSessionResponse,
        Procedure::CreateBearerRequest,
        Procedure::CreateBearerResponse,
        Procedure::ModifyBearerRequest,
        Procedure::ModifyBearerResponse,
        Procedure::DeleteBearerRequest,
        Procedure::DeleteBearerResponse,
        Procedure::DeleteSessionRequest,
        Procedure::DeleteSessionResponse,
    ];

    pub fn family(&self) -> ProcedureFamily {
        match self {
            Procedure::CreateSessionRequest | Procedure::CreateSessionResponse => {
                ProcedureFamily::CreateSession
            }
            Procedure::CreateBearerRequest | Procedure::CreateBearerResponse => {
                ProcedureFamily::CreateBearer
            }
            Procedure::ModifyBearerRequest | Procedure::ModifyBearerResponse => {
                ProcedureFamily::ModifyBearer
            }
            Procedure::DeleteBearerRequest | Procedure::DeleteBearerResponse => {
                ProcedureFamily::DeleteBearer
            }
            Procedure::DeleteSessionRequest | Procedure::DeleteSessionResponse => {
                ProcedureFamily::DeleteSession
            }
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Procedure::CreateSessionRequest
                | Procedure::CreateBearerRequest
                | Procedure::ModifyBearerRequest
                | Procedure::DeleteBearerRequest
                | Procedure::DeleteSessionRequest
        )
    }

    /// Human readable message name, as shown on the call flow diagram.
    pub fn name(&self) -> &'static str {
        match self {
            Procedure::CreateSessionRequest => "Create Session Request",
            Procedure::CreateSessionResponse => "Create Session Response",
            Procedure::CreateBearerRequest => "Create Bearer Request",
            Procedure::CreateBearerResponse => "Create Bearer Response",
            Procedure::ModifyBearerRequest => "Modify Bearer Request",
            Procedure::ModifyBearerResponse => "Modify Bearer Response",
            Procedure::DeleteBearerRequest => "Delete Bearer Request",
            Procedure::DeleteBearerResponse => "Delete Bearer Response",
            Procedure::DeleteSessionRequest => "Delete Session Request",
            Procedure::DeleteSessionResponse => "Delete Session Response",
        }
    }
}

/// One Bearer Context IE of a message.  An EBI of 0 from the decoder means "not present".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerSpec {
    #[serde(default, deserialize_with = "optional_ebi")]
    pub ebi: Option<Ebi>,
    #[serde(rename = "fteid_list", default, deserialize_with = "null_as_empty")]
    pub fteids: Vec<FTeid>,
}

impl BearerSpec {
    pub fn new(ebi: Option<u8>, fteids: Vec<FTeid>) -> Self {
        BearerSpec {
            ebi: ebi.map(Ebi),
            fteids,
        }
    }
}

/// One GTP-C message of a call flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFlowMessage {
    pub id: u64,
    #[serde(alias = "src_addr")]
    pub src_node: NodeId,
    #[serde(alias = "dst_addr")]
    pub dst_node: NodeId,
    #[serde(alias = "message")]
    pub procedure: MessageKind,
    #[serde(alias = "bearer", default, deserialize_with = "null_as_empty")]
    pub bearer_list: Vec<BearerSpec>,
    #[serde(default, deserialize_with = "optional_ebi")]
    pub ebi: Option<Ebi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl CallFlowMessage {
    pub fn new(id: u64, src_node: &str, dst_node: &str, procedure: Procedure) -> Self {
        CallFlowMessage {
            id,
            src_node: src_node.into(),
            dst_node: dst_node.into(),
            procedure: MessageKind::Gtpc(procedure),
            bearer_list: vec![],
            ebi: None,
            timestamp: None,
        }
    }

    /// The nodes whose state a message touches, sender first.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        std::iter::once(&self.src_node)
            .chain((self.dst_node != self.src_node).then_some(&self.dst_node))
    }
}
