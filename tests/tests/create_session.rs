use anyhow::{Result, ensure};
use bearer_flow::{Config, Lbi, TunnelEndpoint};
use bearer_flow_tests::{framework::*, *};
use gtpc::{Ebi, InterfaceType::*, Procedure::*, Teid};
use std::net::IpAddr;

fn create_session_request() -> MockTrace {
    let mut t = MockTrace::new();
    t.send(
        MME,
        SGW,
        CreateSessionRequest,
        None,
        vec![bearer(Some(5), vec![fteid(S1uSgwGtpU, 0x100, SGW)])],
    );
    t
}

#[test]
fn request_stages_pending_bearer_on_both_nodes() -> Result<()> {
    let history = replay(create_session_request().messages());

    let sgw_bearer = bearer_at(&history[0], SGW, 5, 5)?;
    assert!(sgw_bearer.pending);
    assert!(!sgw_bearer.active);
    assert_eq!(
        sgw_bearer.tunnels.s1u_sgw,
        Some(TunnelEndpoint {
            teid: Teid(0x100),
            ip: Some(IpAddr::V4(SGW))
        })
    );

    // The MME does not own the SGW's endpoint.
    let mme_bearer = bearer_at(&history[0], MME, 5, 5)?;
    assert!(mme_bearer.pending);
    ensure!(mme_bearer.tunnels.is_empty(), "MME recorded {}", mme_bearer);
    Ok(())
}

#[test]
fn response_confirms_and_adds_tunnels() -> Result<()> {
    let mut t = create_session_request();
    t.send(
        SGW,
        MME,
        CreateSessionResponse,
        None,
        vec![bearer(
            Some(5),
            vec![fteid(S1uSgwGtpU, 0x100, SGW), fteid(S5S8SgwGtpU, 0x200, SGW)],
        )],
    );
    let history = replay(t.messages());

    let sgw_bearer = bearer_at(&history[1], SGW, 5, 5)?;
    assert!(!sgw_bearer.pending);
    assert!(sgw_bearer.active);
    assert_eq!(sgw_bearer.tunnels.s1u_sgw.map(|t| t.teid), Some(Teid(0x100)));
    assert_eq!(
        sgw_bearer.tunnels.s5s8_sgw,
        Some(TunnelEndpoint {
            teid: Teid(0x200),
            ip: Some(IpAddr::V4(SGW))
        })
    );
    assert!(bearer_at(&history[1], MME, 5, 5)?.is_confirmed());

    // The earlier snapshot is untouched.
    assert!(bearer_at(&history[0], SGW, 5, 5)?.pending);
    Ok(())
}

fn unknown_lbi_trace() -> MockTrace {
    let mut t = MockTrace::new();
    t.send(
        SGW,
        PGW,
        CreateSessionRequest,
        None,
        vec![bearer(None, vec![fteid(S5S8SgwGtpU, 0x123, SGW)])],
    )
    .send(
        PGW,
        SGW,
        CreateSessionResponse,
        None,
        vec![bearer(Some(6), vec![fteid(S5S8PgwGtpU, 0x321, PGW)])],
    );
    t
}

#[test]
fn unknown_lbi_takes_ebi_of_default_bearer() -> Result<()> {
    let history = replay(unknown_lbi_trace().messages());

    let session = history
        .session(0, &node(SGW), Lbi::Unknown)
        .ok_or_else(|| anyhow::anyhow!("no unknown-LBI session"))?;
    assert_eq!(session.bearers()[0].ebi, None);

    for ip in [SGW, PGW] {
        assert!(history.session(1, &node(ip), Lbi::Unknown).is_none());
        assert!(bearer_at(&history[1], ip, 6, 6)?.is_confirmed());
    }
    assert_eq!(
        bearer_at(&history[1], PGW, 6, 6)?.tunnels.s5s8_pgw.map(|t| t.teid),
        Some(Teid(0x321))
    );
    Ok(())
}

#[test]
fn relay_keeps_one_bearer_while_lbi_unknown() -> Result<()> {
    let mut t = MockTrace::new();
    t.send(MME, SGW, CreateSessionRequest, None, vec![bearer(None, vec![])])
        .send(
            SGW,
            PGW,
            CreateSessionRequest,
            None,
            vec![bearer(None, vec![fteid(S5S8SgwGtpU, 0x123, SGW)])],
        )
        .send(
            PGW,
            SGW,
            CreateSessionResponse,
            None,
            vec![bearer(Some(6), vec![fteid(S5S8PgwGtpU, 0x321, PGW)])],
        )
        .send(
            SGW,
            MME,
            CreateSessionResponse,
            None,
            vec![bearer(Some(6), vec![fteid(S1uSgwGtpU, 0x132, SGW)])],
        );
    let history = replay(t.messages());

    let sgw_session = history
        .session(1, &node(SGW), Lbi::Unknown)
        .ok_or_else(|| anyhow::anyhow!("no unknown-LBI session on SGW"))?;
    assert_eq!(sgw_session.bearers().len(), 1);

    let last = &history[3];
    for ip in [MME, SGW, PGW] {
        ensure!(
            last.sessions(&node(ip)).count() == 1,
            "{ip} ends with sessions {:?}",
            last.sessions(&node(ip)).map(|s| s.lbi).collect::<Vec<_>>()
        );
        assert!(bearer_at(last, ip, 6, 6)?.is_confirmed());
        assert!(bearer_at(last, ip, 6, 6)?.active);
    }
    let sgw_bearers = last
        .session(&node(SGW), Lbi::from(6u8))
        .map(|s| s.bearers().len());
    assert_eq!(sgw_bearers, Some(1));
    let sgw_bearer = bearer_at(last, SGW, 6, 6)?;
    assert_eq!(sgw_bearer.tunnels.s5s8_sgw.map(|t| t.teid), Some(Teid(0x123)));
    assert_eq!(sgw_bearer.tunnels.s1u_sgw.map(|t| t.teid), Some(Teid(0x132)));
    Ok(())
}

#[test]
fn without_positional_fallback_bearer_stays_pending() -> Result<()> {
    let config = Config {
        positional_fallback: false,
        ..Config::default()
    };
    let history = replay_with(config, unknown_lbi_trace().messages());

    let session = history
        .session(1, &node(SGW), Lbi::Unknown)
        .ok_or_else(|| anyhow::anyhow!("session was rekeyed"))?;
    assert!(session.bearers()[0].pending);
    assert!(session.bearer(Ebi(6)).is_none());
    Ok(())
}

#[test]
fn request_without_bearers_is_ignored() -> Result<()> {
    let mut t = MockTrace::new();
    t.send(MME, SGW, CreateSessionRequest, None, vec![]);
    let history = replay(t.messages());
    assert_eq!(history.len(), 1);
    assert!(history[0].is_empty());
    Ok(())
}
