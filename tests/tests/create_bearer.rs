use anyhow::Result;
use bearer_flow::{Lbi, MatchKey};
use bearer_flow_tests::{framework::*, *};
use gtpc::{InterfaceType::*, Procedure::*, Teid};

// Messages 1-10 of the full trace: attach then three dedicated bearers.
fn dedicated_bearers() -> Vec<gtpc::CallFlowMessage> {
    let mut messages = attach_and_detach();
    messages.truncate(10);
    messages
}

#[test]
fn request_stages_one_bearer_per_node() -> Result<()> {
    let history = replay(&dedicated_bearers());

    // After the SGW forwards the request the MME holds three pending bearers keyed by
    // the PGW's F-TEID, and the SGW has re-keyed its own by the S1-U endpoint it allocated.
    let after_forward = &history[7];
    let mme = after_forward
        .session(&node(MME), Lbi::from(5u8))
        .ok_or_else(|| anyhow::anyhow!("MME has no session"))?;
    let mme_keys: Vec<_> = mme
        .bearers()
        .iter()
        .filter(|b| b.pending)
        .map(|b| b.match_key)
        .collect();
    assert_eq!(
        mme_keys,
        [345, 346, 347].map(|teid| Some(MatchKey {
            iface_type: S5S8PgwGtpU as u8,
            teid: Teid(teid)
        }))
    );

    let sgw = after_forward
        .session(&node(SGW), Lbi::from(5u8))
        .ok_or_else(|| anyhow::anyhow!("SGW has no session"))?;
    assert_eq!(sgw.bearers().len(), 4);
    assert_eq!(
        sgw.bearers()[1].match_key,
        Some(MatchKey {
            iface_type: S1uSgwGtpU as u8,
            teid: Teid(145)
        })
    );
    Ok(())
}

#[test]
fn responses_confirm_dedicated_bearers() -> Result<()> {
    let history = replay(&dedicated_bearers());
    let state = history.last().ok_or_else(|| anyhow::anyhow!("empty history"))?;

    for (ebi, pgw, s1u_sgw, enb, s5s8_sgw) in
        [(9, 345, 145, 245, 155), (10, 346, 146, 246, 156), (11, 347, 147, 247, 157)]
    {
        let b = bearer_at(state, SGW, 5, ebi)?;
        assert!(b.is_confirmed());
        assert_eq!(b.tunnels.s1u_sgw.map(|t| t.teid), Some(Teid(s1u_sgw)));
        assert_eq!(b.tunnels.s5s8_sgw.map(|t| t.teid), Some(Teid(s5s8_sgw)));

        let b = bearer_at(state, PGW, 5, ebi)?;
        assert!(b.is_confirmed());
        assert_eq!(b.tunnels.s5s8_pgw.map(|t| t.teid), Some(Teid(pgw)));

        let b = bearer_at(state, MME, 5, ebi)?;
        assert!(b.is_confirmed());
        assert_eq!(b.tunnels.s1u_enb.map(|t| t.teid), Some(Teid(enb)));
    }

    for ip in [MME, SGW, PGW] {
        let session = state
            .session(&node(ip), Lbi::from(5u8))
            .ok_or_else(|| anyhow::anyhow!("no session on {ip}"))?;
        assert_eq!(session.bearers().len(), 4, "bearers on {ip}");
    }
    Ok(())
}

#[test]
fn request_for_unknown_session_is_ignored() -> Result<()> {
    let mut t = MockTrace::new();
    t.send(
        PGW,
        SGW,
        CreateBearerRequest,
        Some(5),
        vec![bearer(None, vec![fteid(S5S8PgwGtpU, 345, PGW)])],
    );
    let history = replay(t.messages());
    assert!(history[0].is_empty());
    Ok(())
}
