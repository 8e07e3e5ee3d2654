use gtpc::{BearerSpec, CallFlowMessage, Ebi, FTeid, InterfaceType, NodeId, Procedure};
use std::net::{IpAddr, Ipv4Addr};

pub const MME: Ipv4Addr = Ipv4Addr::new(10, 10, 2, 72);
pub const SGW: Ipv4Addr = Ipv4Addr::new(10, 10, 1, 71);
pub const PGW: Ipv4Addr = Ipv4Addr::new(10, 10, 3, 73);

/// Builds a call flow one message at a time, numbering the messages from 1.
#[derive(Default)]
pub struct MockTrace {
    messages: Vec<CallFlowMessage>,
}

impl MockTrace {
    pub fn new() -> Self {
        MockTrace::default()
    }

    pub fn send(
        &mut self,
        src: Ipv4Addr,
        dst: Ipv4Addr,
        procedure: Procedure,
        ebi: Option<u8>,
        bearers: Vec<BearerSpec>,
    ) -> &mut Self {
        let mut cf = CallFlowMessage::new(self.messages.len() as u64 + 1, "", "", procedure);
        cf.src_node = NodeId::from(IpAddr::V4(src));
        cf.dst_node = NodeId::from(IpAddr::V4(dst));
        cf.ebi = ebi.map(Ebi);
        cf.bearer_list = bearers;
        self.messages.push(cf);
        self
    }

    pub fn messages(&self) -> &[CallFlowMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<CallFlowMessage> {
        self.messages
    }
}

pub fn fteid(iface: InterfaceType, teid: u32, ip: Ipv4Addr) -> FTeid {
    FTeid::new_ipv4(iface, teid, ip)
}

pub fn bearer(ebi: Option<u8>, fteids: Vec<FTeid>) -> BearerSpec {
    BearerSpec::new(ebi, fteids)
}

/// Attach, a Modify Bearer for the eNB, three dedicated bearers, removal of one of them
/// and then detach, across MME (standing in for the eNB as well), SGW and PGW.
pub fn attach_and_detach() -> Vec<CallFlowMessage> {
    use InterfaceType::*;
    use Procedure::*;
    let mut t = MockTrace::new();

    // Default bearer, LBI 5
    t.send(MME, SGW, CreateSessionRequest, None, vec![bearer(Some(5), vec![])])
        .send(
            SGW,
            PGW,
            CreateSessionRequest,
            None,
            vec![bearer(Some(5), vec![fteid(S5S8SgwGtpU, 123, SGW)])],
        )
        .send(
            PGW,
            SGW,
            CreateSessionResponse,
            None,
            vec![bearer(Some(5), vec![fteid(S5S8PgwGtpU, 321, PGW)])],
        )
        .send(
            SGW,
            MME,
            CreateSessionResponse,
            None,
            vec![bearer(Some(5), vec![fteid(S1uSgwGtpU, 132, SGW)])],
        )
        .send(
            MME,
            SGW,
            ModifyBearerRequest,
            None,
            vec![bearer(Some(5), vec![fteid(S1uEnodebGtpU, 213, MME)])],
        )
        .send(
            SGW,
            MME,
            ModifyBearerResponse,
            None,
            vec![bearer(Some(5), vec![fteid(S1uSgwGtpU, 132, SGW)])],
        );

    // Dedicated bearers 9, 10 and 11 in LBI 5
    let dedicated = [(9, 345, 145, 245, 155), (10, 346, 146, 246, 156), (11, 347, 147, 247, 157)];
    t.send(
        PGW,
        SGW,
        CreateBearerRequest,
        Some(5),
        dedicated
            .iter()
            .map(|&(_, pgw, ..)| bearer(None, vec![fteid(S5S8PgwGtpU, pgw, PGW)]))
            .collect(),
    )
    .send(
        SGW,
        MME,
        CreateBearerRequest,
        Some(5),
        dedicated
            .iter()
            .map(|&(_, pgw, s1u_sgw, ..)| {
                bearer(
                    None,
                    vec![fteid(S5S8PgwGtpU, pgw, PGW), fteid(S1uSgwGtpU, s1u_sgw, SGW)],
                )
            })
            .collect(),
    )
    .send(
        MME,
        SGW,
        CreateBearerResponse,
        None,
        dedicated
            .iter()
            .map(|&(ebi, _, s1u_sgw, enb, _)| {
                bearer(
                    Some(ebi),
                    vec![fteid(S1uEnodebGtpU, enb, MME), fteid(S1uSgwGtpU, s1u_sgw, SGW)],
                )
            })
            .collect(),
    )
    .send(
        SGW,
        PGW,
        CreateBearerResponse,
        None,
        dedicated
            .iter()
            .map(|&(ebi, pgw, _, _, s5s8_sgw)| {
                bearer(
                    Some(ebi),
                    vec![fteid(S5S8SgwGtpU, s5s8_sgw, SGW), fteid(S5S8PgwGtpU, pgw, PGW)],
                )
            })
            .collect(),
    );

    // Remove bearer 10
    t.send(PGW, SGW, DeleteBearerRequest, Some(10), vec![])
        .send(SGW, MME, DeleteBearerRequest, Some(10), vec![])
        .send(MME, SGW, DeleteBearerResponse, None, vec![bearer(Some(10), vec![])])
        .send(SGW, PGW, DeleteBearerResponse, None, vec![bearer(Some(10), vec![])]);

    // Detach
    t.send(MME, SGW, DeleteSessionRequest, None, vec![])
        .send(SGW, PGW, DeleteSessionRequest, None, vec![])
        .send(PGW, SGW, DeleteSessionResponse, None, vec![])
        .send(SGW, MME, DeleteSessionResponse, None, vec![]);

    t.into_messages()
}
