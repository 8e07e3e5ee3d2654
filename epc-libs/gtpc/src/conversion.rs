use crate::{Ebi, FTeid, InterfaceType, MessageKind, ModelError, NodeId, Procedure, Teid};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::net::IpAddr;
use std::str::FromStr;

const EBI_MAX: u8 = 15;

impl TryFrom<u8> for Ebi {
    type Error = ModelError;
    fn try_from(value: u8) -> Result<Self, ModelError> {
        if value > EBI_MAX {
            return Err(ModelError::EbiOutOfRange(value));
        }
        Ok(Ebi(value))
    }
}

impl From<Ebi> for u8 {
    fn from(ebi: Ebi) -> Self {
        ebi.0
    }
}

impl TryFrom<&FTeid> for InterfaceType {
    type Error = ModelError;
    fn try_from(fteid: &FTeid) -> Result<Self, ModelError> {
        InterfaceType::try_from(fteid.iface_type)
            .map_err(|_| ModelError::UnknownInterfaceType(fteid.iface_type))
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<IpAddr> for NodeId {
    fn from(ip: IpAddr) -> Self {
        NodeId(ip.to_string())
    }
}

impl FromStr for Procedure {
    type Err = ModelError;

    /// Accepts either the variant name ("CreateSessionRequest") or the display name
    /// ("Create Session Request").
    fn from_str(s: &str) -> Result<Self, ModelError> {
        let s = s.trim();
        Procedure::ALL
            .into_iter()
            .find(|p| p.name() == s || p.name().replace(' ', "") == s)
            .ok_or_else(|| ModelError::UnknownProcedure(s.to_string()))
    }
}

impl std::fmt::Display for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<Procedure> for MessageKind {
    fn from(procedure: Procedure) -> Self {
        MessageKind::Gtpc(procedure)
    }
}

impl PartialEq<Procedure> for MessageKind {
    fn eq(&self, other: &Procedure) -> bool {
        self.procedure() == Some(*other)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Gtpc(procedure) => write!(f, "{}", procedure.name()),
            MessageKind::Other(name) => write!(f, "{name}"),
        }
    }
}

impl Serialize for MessageKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MessageKind::Gtpc(procedure) => procedure.serialize(serializer),
            MessageKind::Other(name) => serializer.serialize_str(name),
        }
    }
}

// Names outside the modelled procedures are kept rather than rejected.
impl<'de> Deserialize<'de> for MessageKind {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let name = String::deserialize(d)?;
        Ok(match name.parse::<Procedure>() {
            Ok(procedure) => MessageKind::Gtpc(procedure),
            Err(_) => MessageKind::Other(name.trim().to_string()),
        })
    }
}

impl std::fmt::Display for Teid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl std::fmt::Display for Ebi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for FTeid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match InterfaceType::try_from(self) {
            Ok(iface) => write!(f, "{:?}", iface)?,
            Err(_) => write!(f, "iface({})", self.iface_type)?,
        }
        write!(f, "/{}", self.teid)?;
        if let Some(ip) = self.ip() {
            write!(f, "@{}", ip)?;
        }
        Ok(())
    }
}

/// The decoder writes 0 for an absent EBI.
pub(crate) fn optional_ebi<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Ebi>, D::Error> {
    match Option::<u8>::deserialize(d)? {
        None | Some(0) => Ok(None),
        Some(v) => Ebi::try_from(v).map(Some).map_err(D::Error::custom),
    }
}

/// The decoder writes null rather than an empty list.
pub(crate) fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}
