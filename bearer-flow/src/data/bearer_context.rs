use gtpc::{Ebi, FTeid, InterfaceType, NodeId, Teid};
use serde::Serialize;
use std::net::IpAddr;

/// The interface type and TEID that a later Response is expected to echo back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchKey {
    pub iface_type: u8,
    pub teid: Teid,
}

impl From<&FTeid> for MatchKey {
    fn from(fteid: &FTeid) -> Self {
        MatchKey {
            iface_type: fteid.iface_type,
            teid: fteid.teid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TunnelEndpoint {
    pub teid: Teid,
    pub ip: Option<IpAddr>,
}

impl From<&FTeid> for TunnelEndpoint {
    fn from(fteid: &FTeid) -> Self {
        TunnelEndpoint {
            teid: fteid.teid,
            ip: fteid.ip(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelSlot {
    S1uEnb,
    S1uSgw,
    S5S8Sgw,
    S5S8Pgw,
}

impl TunnelSlot {
    pub const ALL: [TunnelSlot; 4] = [
        TunnelSlot::S1uEnb,
        TunnelSlot::S1uSgw,
        TunnelSlot::S5S8Sgw,
        TunnelSlot::S5S8Pgw,
    ];

    /// The slot that records F-TEIDs of the given interface type, if any.
    pub fn for_interface(iface_type: u8) -> Option<TunnelSlot> {
        match InterfaceType::try_from(iface_type).ok()? {
            InterfaceType::S1uEnodebGtpU => Some(TunnelSlot::S1uEnb),
            InterfaceType::S1uSgwGtpU => Some(TunnelSlot::S1uSgw),
            InterfaceType::S5S8SgwGtpU => Some(TunnelSlot::S5S8Sgw),
            InterfaceType::S5S8PgwGtpU => Some(TunnelSlot::S5S8Pgw),
            _ => None,
        }
    }

    pub fn is_s1u(&self) -> bool {
        matches!(self, TunnelSlot::S1uEnb | TunnelSlot::S1uSgw)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TunnelSlot::S1uEnb => "s1u_enb",
            TunnelSlot::S1uSgw => "s1u_sgw",
            TunnelSlot::S5S8Sgw => "s5s8_sgw",
            TunnelSlot::S5S8Pgw => "s5s8_pgw",
        }
    }
}

/// The user plane tunnel endpoints known for one bearer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tunnels {
    pub s1u_enb: Option<TunnelEndpoint>,
    pub s1u_sgw: Option<TunnelEndpoint>,
    pub s5s8_sgw: Option<TunnelEndpoint>,
    pub s5s8_pgw: Option<TunnelEndpoint>,
}

impl Tunnels {
    pub fn get(&self, slot: TunnelSlot) -> Option<&TunnelEndpoint> {
        match slot {
            TunnelSlot::S1uEnb => self.s1u_enb.as_ref(),
            TunnelSlot::S1uSgw => self.s1u_sgw.as_ref(),
            TunnelSlot::S5S8Sgw => self.s5s8_sgw.as_ref(),
            TunnelSlot::S5S8Pgw => self.s5s8_pgw.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: TunnelSlot) -> &mut Option<TunnelEndpoint> {
        match slot {
            TunnelSlot::S1uEnb => &mut self.s1u_enb,
            TunnelSlot::S1uSgw => &mut self.s1u_sgw,
            TunnelSlot::S5S8Sgw => &mut self.s5s8_sgw,
            TunnelSlot::S5S8Pgw => &mut self.s5s8_pgw,
        }
    }

    /// Overwrite the slot named by the F-TEID's interface type.  Returns false, leaving
    /// everything untouched, for interfaces that have no slot.
    pub fn record(&mut self, fteid: &FTeid) -> bool {
        let Some(slot) = TunnelSlot::for_interface(fteid.iface_type) else {
            return false;
        };
        *self.slot_mut(slot) = Some(fteid.into());
        true
    }

    /// Whether the F-TEID is already recorded in the slot for its interface.
    pub fn holds(&self, fteid: &FTeid) -> bool {
        TunnelSlot::for_interface(fteid.iface_type)
            .and_then(|slot| self.get(slot))
            .is_some_and(|endpoint| endpoint.teid == fteid.teid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TunnelSlot, &TunnelEndpoint)> {
        TunnelSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|endpoint| (slot, endpoint)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// One bearer as seen by one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BearerContext {
    pub ebi: Option<Ebi>,
    pub pending: bool,
    pub delete_pending: bool,
    pub active: bool,
    pub match_key: Option<MatchKey>,
    pub tunnels: Tunnels,
}

impl BearerContext {
    pub fn new_pending(ebi: Option<Ebi>) -> Self {
        BearerContext {
            ebi,
            pending: true,
            delete_pending: false,
            active: false,
            match_key: None,
            tunnels: Tunnels::default(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        !self.pending && self.ebi.is_some()
    }

    /// Record the F-TEIDs whose address is the node's own.  A node never claims its
    /// peer's endpoint.  Returns the key of the last such F-TEID.
    pub fn record_local_tunnels(&mut self, fteids: &[FTeid], node: &NodeId) -> Option<MatchKey> {
        let mut key = None;
        for fteid in fteids.iter().filter(|f| f.is_owned_by(node)) {
            self.tunnels.record(fteid);
            key = Some(MatchKey::from(fteid));
        }
        key
    }

    pub fn confirm(&mut self, ebi: Ebi) {
        self.ebi = Some(ebi);
        self.pending = false;
        self.active = true;
    }
}

impl std::fmt::Display for TunnelEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.ip {
            Some(ip) => write!(f, "{}@{}", self.teid, ip),
            None => write!(f, "{}", self.teid),
        }
    }
}

impl std::fmt::Display for BearerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.ebi {
            Some(ebi) => write!(f, "EBI {ebi}")?,
            None => write!(f, "EBI ?")?,
        }
        let status = if self.delete_pending {
            "deleting"
        } else if self.pending {
            "pending"
        } else {
            "active"
        };
        write!(f, " [{status}]")?;
        for (slot, endpoint) in self.tunnels.iter() {
            write!(f, " {}={}", slot.name(), endpoint)?;
        }
        Ok(())
    }
}
