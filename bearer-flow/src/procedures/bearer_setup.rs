//! bearer_setup - the steps shared by Create Session and Create Bearer

use super::correlation::correlate;
use crate::data::{BearerContext, Config, Lbi, MatchKey, NodeState, SessionContext};
use gtpc::{BearerSpec, Ebi, NodeId};
use slog::{Logger, debug, warn};

/// Where a new pending bearer's match key comes from before the node's own F-TEID
/// overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialKey {
    LocalOnly,
    FirstFTeid,
}

/// A pending bearer that a Response confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmed {
    pub lbi: Lbi,
    pub index: usize,
    pub ebi: Ebi,
}

/// Create or update the pending bearers that a Request's Bearer Contexts describe, as
/// seen by `node`.
pub fn stage_bearers(
    session: &mut SessionContext,
    specs: &[BearerSpec],
    node: &NodeId,
    initial: InitialKey,
    logger: &Logger,
) {
    let mut staged = vec![];
    for spec in specs {
        if let Some(index) = stage_bearer(session, spec, node, initial, &staged, logger) {
            staged.push(index);
        }
    }
}

// Returns the position of the bearer the spec was staged into.
fn stage_bearer(
    session: &mut SessionContext,
    spec: &BearerSpec,
    node: &NodeId,
    initial: InitialKey,
    staged: &[usize],
    logger: &Logger,
) -> Option<usize> {
    let existing = match spec.ebi {
        Some(ebi) => session.locate(Some(ebi), None),
        None => find_unidentified(session, spec, staged),
    };
    if let Some(index) = existing {
        let bearer = session.bearer_at_mut(index)?;
        if bearer.delete_pending {
            debug!(logger, "{node}: bearer {bearer} is being deleted - not updated");
            return None;
        }
        let local_key = bearer.record_local_tunnels(&spec.fteids, node);
        if bearer.ebi.is_none() && local_key.is_some() {
            bearer.match_key = local_key;
        }
        return Some(index);
    }

    let mut bearer = BearerContext::new_pending(spec.ebi);
    bearer.match_key = match initial {
        InitialKey::LocalOnly => None,
        InitialKey::FirstFTeid => spec.fteids.first().map(MatchKey::from),
    };
    if let Some(local_key) = bearer.record_local_tunnels(&spec.fteids, node) {
        bearer.match_key = Some(local_key);
    }
    match session.insert_bearer(bearer) {
        Ok(()) => Some(session.bearers().len() - 1),
        Err(e) => {
            warn!(logger, "{e}");
            None
        }
    }
}

// The EBI-less pending bearer that a spec without an EBI refers to.
fn find_unidentified(
    session: &SessionContext,
    spec: &BearerSpec,
    staged: &[usize],
) -> Option<usize> {
    let unidentified = move || {
        session
            .bearers()
            .iter()
            .enumerate()
            .filter(move |(index, bearer)| bearer.ebi.is_none() && !staged.contains(index))
    };
    // A relay sees the same bearer on both legs, so any echoed F-TEID identifies it.
    let by_fteid = unidentified().find(|(_, bearer)| {
        spec.fteids.iter().any(|fteid| {
            bearer.match_key == Some(MatchKey::from(fteid)) || bearer.tunnels.holds(fteid)
        })
    });
    // Without an LBI or a key, the bearer staged on the previous leg is this one.
    let by_order = || {
        unidentified().find(|(_, bearer)| {
            session.lbi == Lbi::Unknown
                && bearer.pending
                && !bearer.delete_pending
                && bearer.match_key.is_none()
        })
    };
    by_fteid.or_else(by_order).map(|(index, _)| index)
}

/// Confirm the node's pending bearers against the Bearer Contexts of a Create Response.
/// Only sessions with the given LBI are searched, or all the node's sessions if `lbi`
/// is None.  Sessions being torn down are skipped.
pub fn confirm_pending_bearers(
    store: &mut NodeState,
    node: &NodeId,
    lbi: Option<Lbi>,
    response: &[BearerSpec],
    config: &Config,
    logger: &Logger,
) -> Vec<Confirmed> {
    let pending: Vec<(Lbi, usize, BearerContext)> = store
        .sessions(node)
        .filter(|session| !session.teardown && lbi.is_none_or(|lbi| session.lbi == lbi))
        .flat_map(|session| {
            session
                .bearers()
                .iter()
                .enumerate()
                .filter(|(_, bearer)| bearer.pending && !bearer.delete_pending)
                .map(|(index, bearer)| (session.lbi, index, bearer.clone()))
        })
        .collect();
    let candidates: Vec<&BearerContext> = pending.iter().map(|(_, _, bearer)| bearer).collect();
    // Position only means something within one session's creation order.
    let one_session = pending.iter().all(|(l, _, _)| *l == pending[0].0);
    let correlations = correlate(&candidates, response, config.positional_fallback && one_session);

    let mut confirmed = vec![];
    let mut claimed = vec![false; response.len()];
    for ((session_lbi, index, candidate), correlation) in pending.iter().zip(correlations) {
        let Some(correlation) = correlation else {
            debug!(logger, "{node}: no Response bearer for pending {candidate} - stays pending");
            continue;
        };
        claimed[correlation.response_index] = true;
        let spec = &response[correlation.response_index];
        let Some(ebi) = spec.ebi.or(candidate.ebi) else {
            debug!(logger, "{node}: Response bearer has no EBI - {candidate} stays pending");
            continue;
        };
        let Some(session) = store.session_mut(node, *session_lbi) else {
            continue;
        };
        if session
            .bearers()
            .iter()
            .enumerate()
            .any(|(i, bearer)| i != *index && bearer.ebi == Some(ebi))
        {
            warn!(logger, "{node}: EBI {ebi} already in use in session {session_lbi}");
            continue;
        }
        let Some(bearer) = session.bearer_at_mut(*index) else {
            continue;
        };
        bearer.confirm(ebi);
        bearer.record_local_tunnels(&spec.fteids, node);
        debug!(logger, "{node}: confirmed {bearer} by {:?}", correlation.tier);
        confirmed.push(Confirmed {
            lbi: *session_lbi,
            index: *index,
            ebi,
        });
    }

    if config.refresh_confirmed_tunnels {
        let unclaimed = response
            .iter()
            .zip(claimed)
            .filter(|(_, claimed)| !claimed)
            .map(|(spec, _)| spec);
        for spec in unclaimed {
            let Some(ebi) = spec.ebi else { continue };
            let bearer = store
                .sessions_mut(node)
                .filter(|session| lbi.is_none_or(|lbi| session.lbi == lbi))
                .find_map(|session| session.bearer_mut(ebi));
            if let Some(bearer) = bearer.filter(|b| b.is_confirmed() && !b.delete_pending) {
                bearer.record_local_tunnels(&spec.fteids, node);
            }
        }
    }
    confirmed
}
