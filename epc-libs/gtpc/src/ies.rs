use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Tunnel endpoint identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Teid(pub u32);

/// EPS bearer identity.  4 bits on the wire (TS29.274, 8.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Ebi(pub u8);

/// Opaque identifier of a control plane node.  In practice the node's IP address
/// as it appears in the capture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Whether an F-TEID address belongs to this node.  A node whose identifier is
    /// not an IP address owns nothing.
    pub fn owns(&self, ip: &IpAddr) -> bool {
        self.0
            .parse::<IpAddr>()
            .map(|addr| addr == *ip)
            .unwrap_or(false)
    }
}

/// F-TEID interface type (TS29.274, 8.22).
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum InterfaceType {
    S1uEnodebGtpU = 0,
    S1uSgwGtpU = 1,
    S12RncGtpU = 2,
    S12SgwGtpU = 3,
    S5S8SgwGtpU = 4,
    S5S8PgwGtpU = 5,
    S5S8SgwGtpC = 6,
    S5S8PgwGtpC = 7,
    S5S8SgwPmipv6 = 8,
    S5S8PgwPmipv6 = 9,
    S11MmeGtpC = 10,
    S11S4SgwGtpC = 11,
    S10MmeGtpC = 12,
    S3MmeGtpC = 13,
    S3SgsnGtpC = 14,
    S4SgsnGtpU = 15,
    S4SgwGtpU = 16,
    S4SgsnGtpC = 17,
    S16SgsnGtpC = 18,
    EnodebGtpUForDlDataForwarding = 19,
    EnodebGtpUForUlDataForwarding = 20,
    RncGtpUForDataForwarding = 21,
    SgsnGtpUForDataForwarding = 22,
    SgwGtpUForDlDataForwarding = 23,
    SmMbmsGwGtpC = 24,
    SnMbmsGwGtpC = 25,
    SmMmeGtpC = 26,
    SnSgsnGtpC = 27,
    SgwGtpUForUlDataForwarding = 28,
    SnSgsnGtpU = 29,
    S2bEpdgGtpC = 30,
    S2bUEpdgGtpU = 31,
    S2bPgwGtpC = 32,
    S2bUPgwGtpU = 33,
    S2aTwanGtpU = 34,
    S2aTwanGtpC = 35,
    S2aPgwGtpC = 36,
    S2aPgwGtpU = 37,
    S11MmeGtpU = 38,
    S11SgwGtpU = 39,
}

/// Fully qualified TEID, as decoded from a Bearer Context IE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FTeid {
    pub iface_type: u8,
    pub teid: Teid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Ipv4Addr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Ipv6Addr>,
}

impl FTeid {
    pub fn new_ipv4(iface_type: InterfaceType, teid: u32, addr: Ipv4Addr) -> Self {
        FTeid {
            iface_type: iface_type.into(),
            teid: Teid(teid),
            ipv4: Some(addr),
            ipv6: None,
        }
    }

    pub fn new_ipv6(iface_type: InterfaceType, teid: u32, addr: Ipv6Addr) -> Self {
        FTeid {
            iface_type: iface_type.into(),
            teid: Teid(teid),
            ipv4: None,
            ipv6: Some(addr),
        }
    }

    /// The endpoint address.  IPv4 wins when both are present.
    pub fn ip(&self) -> Option<IpAddr> {
        self.ipv4
            .map(IpAddr::V4)
            .or_else(|| self.ipv6.map(IpAddr::V6))
    }

    pub fn is_owned_by(&self, node: &NodeId) -> bool {
        self.ip().is_some_and(|ip| node.owns(&ip))
    }
}
