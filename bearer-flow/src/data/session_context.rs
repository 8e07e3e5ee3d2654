use super::{BearerContext, MatchKey};
use anyhow::{Result, bail};
use gtpc::{Ebi, NodeId};
use serde::{Serialize, Serializer};

/// Linked bearer identity - the EBI of a PDN session's default bearer.  `Unknown` is
/// used when a Create Session Request did not reveal it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lbi {
    Ebi(Ebi),
    Unknown,
}

impl Lbi {
    pub fn ebi(&self) -> Option<Ebi> {
        match self {
            Lbi::Ebi(ebi) => Some(*ebi),
            Lbi::Unknown => None,
        }
    }
}

impl From<Option<Ebi>> for Lbi {
    fn from(ebi: Option<Ebi>) -> Self {
        ebi.map_or(Lbi::Unknown, Lbi::Ebi)
    }
}

impl From<u8> for Lbi {
    fn from(ebi: u8) -> Self {
        Lbi::Ebi(Ebi(ebi))
    }
}

impl std::fmt::Display for Lbi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lbi::Ebi(ebi) => write!(f, "{ebi}"),
            Lbi::Unknown => write!(f, "unknown"),
        }
    }
}

// Serialized as a string so that it can key a JSON object.
impl Serialize for Lbi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A PDN session on one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    pub lbi: Lbi,
    pub node_ip: NodeId,
    // Set by a Delete Session Request whose Response has not been seen yet.
    pub teardown: bool,
    bearers: Vec<BearerContext>,
}

impl SessionContext {
    pub(crate) fn new(lbi: Lbi, node_ip: NodeId) -> Self {
        SessionContext {
            lbi,
            node_ip,
            teardown: false,
            bearers: vec![],
        }
    }

    /// Bearers in creation order.
    pub fn bearers(&self) -> &[BearerContext] {
        &self.bearers
    }

    pub fn bearer(&self, ebi: Ebi) -> Option<&BearerContext> {
        self.bearers.iter().find(|b| b.ebi == Some(ebi))
    }

    pub fn bearer_mut(&mut self, ebi: Ebi) -> Option<&mut BearerContext> {
        self.bearers.iter_mut().find(|b| b.ebi == Some(ebi))
    }

    pub fn bearers_mut(&mut self) -> impl Iterator<Item = &mut BearerContext> {
        self.bearers.iter_mut()
    }

    pub(crate) fn bearer_at_mut(&mut self, index: usize) -> Option<&mut BearerContext> {
        self.bearers.get_mut(index)
    }

    /// Position of the bearer identified by its EBI or, while it has none, by its match key.
    pub(crate) fn locate(&self, ebi: Option<Ebi>, key: Option<&MatchKey>) -> Option<usize> {
        match (ebi, key) {
            (Some(ebi), _) => self.bearers.iter().position(|b| b.ebi == Some(ebi)),
            (None, Some(key)) => self
                .bearers
                .iter()
                .position(|b| b.ebi.is_none() && b.match_key.as_ref() == Some(key)),
            (None, None) => None,
        }
    }

    /// Add a bearer, refusing one that would be indistinguishable from an existing one.
    /// At most one bearer may lack both EBI and match key.
    pub fn insert_bearer(&mut self, bearer: BearerContext) -> Result<()> {
        let unidentified = |b: &BearerContext| b.ebi.is_none() && b.match_key.is_none();
        if self.locate(bearer.ebi, bearer.match_key.as_ref()).is_some()
            || (unidentified(&bearer) && self.bearers.iter().any(unidentified))
        {
            bail!(
                "Bearer {} already present in session {} on {}",
                bearer,
                self.lbi,
                self.node_ip
            );
        }
        self.bearers.push(bearer);
        Ok(())
    }

    pub fn remove_bearer(&mut self, ebi: Ebi) -> Option<BearerContext> {
        let index = self.bearers.iter().position(|b| b.ebi == Some(ebi))?;
        Some(self.bearers.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.bearers.is_empty()
    }
}
