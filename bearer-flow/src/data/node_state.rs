use super::{BearerContext, Lbi, NodeRole, SessionContext};
use gtpc::{Ebi, NodeId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Every node's PDN sessions at one point of the call flow.
///
/// State is only changed through the accessors below, which keep a node's entry
/// present exactly while it has at least one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NodeState {
    nodes: BTreeMap<NodeId, BTreeMap<Lbi, SessionContext>>,
}

impl NodeState {
    pub const fn new() -> Self {
        NodeState {
            nodes: BTreeMap::new(),
        }
    }

    pub fn get_or_create_session(&mut self, node: &NodeId, lbi: Lbi) -> &mut SessionContext {
        self.nodes
            .entry(node.clone())
            .or_default()
            .entry(lbi)
            .or_insert_with(|| SessionContext::new(lbi, node.clone()))
    }

    /// The session holding the bearer, searching all of the node's sessions.
    pub fn find_session_by_ebi(&mut self, node: &NodeId, ebi: Ebi) -> Option<&mut SessionContext> {
        self.nodes
            .get_mut(node)?
            .values_mut()
            .find(|session| session.bearer(ebi).is_some())
    }

    pub fn session_mut(&mut self, node: &NodeId, lbi: Lbi) -> Option<&mut SessionContext> {
        self.nodes.get_mut(node)?.get_mut(&lbi)
    }

    pub fn sessions_mut(&mut self, node: &NodeId) -> impl Iterator<Item = &mut SessionContext> {
        self.nodes
            .get_mut(node)
            .into_iter()
            .flat_map(|sessions| sessions.values_mut())
    }

    /// Remove a bearer from whichever of the node's sessions holds it, dropping the
    /// session if that leaves it empty.
    pub fn remove_bearer(&mut self, node: &NodeId, ebi: Ebi) -> Option<BearerContext> {
        let sessions = self.nodes.get_mut(node)?;
        let (lbi, session) = sessions
            .iter_mut()
            .find(|(_, session)| session.bearer(ebi).is_some())?;
        let lbi = *lbi;
        let removed = session.remove_bearer(ebi);
        if session.is_empty() {
            sessions.remove(&lbi);
        }
        self.prune(node);
        removed
    }

    /// Drop all of a node's sessions, returning how many there were.
    pub fn remove_node(&mut self, node: &NodeId) -> usize {
        self.nodes.remove(node).map_or(0, |sessions| sessions.len())
    }

    /// Move a session to a new LBI.  Refused if the node already has a session there.
    pub fn rekey_session(&mut self, node: &NodeId, from: Lbi, to: Lbi) -> bool {
        let Some(sessions) = self.nodes.get_mut(node) else {
            return false;
        };
        if sessions.contains_key(&to) {
            return false;
        }
        let Some(mut session) = sessions.remove(&from) else {
            return false;
        };
        session.lbi = to;
        sessions.insert(to, session);
        true
    }

    fn prune(&mut self, node: &NodeId) {
        if self.nodes.get(node).is_some_and(|sessions| sessions.is_empty()) {
            self.nodes.remove(node);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes that currently have at least one session.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    pub fn session(&self, node: &NodeId, lbi: Lbi) -> Option<&SessionContext> {
        self.nodes.get(node)?.get(&lbi)
    }

    /// A node's sessions in LBI order.  Empty for a node with no sessions.
    pub fn sessions(&self, node: &NodeId) -> impl Iterator<Item = &SessionContext> {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|sessions| sessions.values())
    }

    pub fn bearer(&self, node: &NodeId, ebi: Ebi) -> Option<&BearerContext> {
        self.sessions(node).find_map(|session| session.bearer(ebi))
    }

    pub fn node_role(&self, node: &NodeId) -> NodeRole {
        NodeRole::classify(node, self.sessions(node))
    }
}

impl std::fmt::Display for NodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return writeln!(f, "(no sessions)");
        }
        for (node, sessions) in self.nodes.iter() {
            writeln!(f, "{} ({:?})", node, self.node_role(node))?;
            for session in sessions.values() {
                let teardown = if session.teardown { " [teardown]" } else { "" };
                writeln!(f, "  LBI {}{}", session.lbi, teardown)?;
                for bearer in session.bearers() {
                    writeln!(f, "    {}", bearer)?;
                }
            }
        }
        Ok(())
    }
}
