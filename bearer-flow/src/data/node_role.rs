use super::SessionContext;
use gtpc::NodeId;
use serde::Serialize;

/// Where a node sits on the user plane path, judged from the tunnel endpoints it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeRole {
    // eNB side, or a pure control plane node such as the MME
    Access,
    // Owns both S1-U and S5/S8 endpoints - an SGW
    Relay,
    // Owns only S5/S8 endpoints - a PGW
    Core,
}

impl NodeRole {
    pub fn classify<'a>(
        node: &NodeId,
        sessions: impl Iterator<Item = &'a SessionContext>,
    ) -> NodeRole {
        let mut owns_s1u = false;
        let mut owns_s5s8 = false;
        let owned_slots = sessions
            .flat_map(|session| session.bearers())
            .flat_map(|bearer| bearer.tunnels.iter())
            .filter(|(_, endpoint)| endpoint.ip.is_some_and(|ip| node.owns(&ip)));
        for (slot, _) in owned_slots {
            if slot.is_s1u() {
                owns_s1u = true;
            } else {
                owns_s5s8 = true;
            }
        }
        match (owns_s1u, owns_s5s8) {
            (true, true) => NodeRole::Relay,
            (false, true) => NodeRole::Core,
            _ => NodeRole::Access,
        }
    }
}
