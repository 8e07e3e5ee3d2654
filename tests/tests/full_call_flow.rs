use anyhow::Result;
use bearer_flow::{Lbi, NodeRole};
use bearer_flow_tests::{framework::*, *};
use gtpc::{Ebi, Teid};

#[test]
fn attach_dedicated_bearers_and_detach() -> Result<()> {
    let history = replay(&attach_and_detach());
    assert_eq!(history.len(), 18);

    // 1-2: Create Session Request MME -> SGW -> PGW
    assert!(bearer_at(&history[1], PGW, 5, 5)?.pending);
    assert_eq!(
        bearer_at(&history[1], SGW, 5, 5)?.tunnels.s5s8_sgw.map(|t| t.teid),
        Some(Teid(123))
    );

    // 3-4: Create Session Response
    let state = &history[3];
    for ip in [MME, SGW, PGW] {
        assert!(bearer_at(state, ip, 5, 5)?.is_confirmed());
    }
    assert_eq!(
        bearer_at(state, SGW, 5, 5)?.tunnels.s1u_sgw.map(|t| t.teid),
        Some(Teid(132))
    );

    // 7-10: dedicated bearers
    let state = &history[9];
    assert_eq!(state.node_role(&node(MME)), NodeRole::Access);
    assert_eq!(state.node_role(&node(SGW)), NodeRole::Relay);
    assert_eq!(state.node_role(&node(PGW)), NodeRole::Core);
    let ebis: Vec<_> = state
        .session(&node(SGW), Lbi::from(5u8))
        .into_iter()
        .flat_map(|session| session.bearers())
        .filter_map(|b| b.ebi)
        .collect();
    assert_eq!(ebis, [5, 9, 10, 11].map(Ebi));

    // 11-14: bearer 10 removed
    assert!(history[13].bearer(&node(SGW), Ebi(10)).is_none());
    assert!(history[13].bearer(&node(SGW), Ebi(11)).is_some());

    // 15-18: detach
    assert!(history.last().is_some_and(|state| state.is_empty()));
    Ok(())
}
