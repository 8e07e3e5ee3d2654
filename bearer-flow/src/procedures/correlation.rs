//! correlation - pairing the bearers a node holds pending with the Bearer Contexts of a Response
//!
//! Three tiers are tried in turn, each over every pending bearer before the next tier
//! starts, so that a strong match is never stolen by a weaker one.
//! 1. EBI equality.
//! 2. F-TEID: an echoed interface type and TEID equal to the bearer's match key or to
//!    one of its recorded tunnel endpoints.
//! 3. Position, when the Response carries exactly as many bearers as are pending.
//!    The caller only allows it when those bearers belong to one session.

use crate::data::{BearerContext, MatchKey};
use gtpc::BearerSpec;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchTier {
    Ebi,
    FTeidKey,
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Correlation {
    pub response_index: usize,
    pub tier: MatchTier,
}

// A bearer that already has an EBI can only pair with a Response bearer that carries
// no EBI or the same one.
fn ebi_compatible(pending: &BearerContext, spec: &BearerSpec) -> bool {
    match (pending.ebi, spec.ebi) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

pub fn match_by_ebi(
    pending: &BearerContext,
    response: &[BearerSpec],
    claimed: &[bool],
) -> Option<usize> {
    let ebi = pending.ebi?;
    response
        .iter()
        .enumerate()
        .find(|(idx, spec)| !claimed[*idx] && spec.ebi == Some(ebi))
        .map(|(idx, _)| idx)
}

pub fn match_by_fteid_key(
    pending: &BearerContext,
    response: &[BearerSpec],
    claimed: &[bool],
) -> Option<usize> {
    response
        .iter()
        .enumerate()
        .filter(|(idx, spec)| !claimed[*idx] && ebi_compatible(pending, spec))
        .find(|(_, spec)| {
            spec.fteids.iter().any(|fteid| {
                pending.match_key == Some(MatchKey::from(fteid)) || pending.tunnels.holds(fteid)
            })
        })
        .map(|(idx, _)| idx)
}

pub fn match_by_position(
    position: usize,
    pending_count: usize,
    pending: &BearerContext,
    response: &[BearerSpec],
    claimed: &[bool],
) -> Option<usize> {
    if pending_count != response.len() || claimed[position] {
        return None;
    }
    ebi_compatible(pending, &response[position]).then_some(position)
}

/// Correlate each pending bearer with at most one Response bearer, and each Response
/// bearer with at most one pending bearer.  The result is indexed like `pending`.
pub fn correlate(
    pending: &[&BearerContext],
    response: &[BearerSpec],
    positional_fallback: bool,
) -> Vec<Option<Correlation>> {
    let mut result = vec![None; pending.len()];
    let mut claimed = vec![false; response.len()];

    let mut run_tier = |tier: MatchTier, result: &mut Vec<Option<Correlation>>| {
        for (position, bearer) in pending.iter().enumerate() {
            if result[position].is_some() {
                continue;
            }
            let found = match tier {
                MatchTier::Ebi => match_by_ebi(bearer, response, &claimed),
                MatchTier::FTeidKey => match_by_fteid_key(bearer, response, &claimed),
                MatchTier::Position => {
                    match_by_position(position, pending.len(), bearer, response, &claimed)
                }
            };
            if let Some(response_index) = found {
                claimed[response_index] = true;
                result[position] = Some(Correlation {
                    response_index,
                    tier,
                });
            }
        }
    };

    run_tier(MatchTier::Ebi, &mut result);
    run_tier(MatchTier::FTeidKey, &mut result);
    if positional_fallback {
        run_tier(MatchTier::Position, &mut result);
    }
    result
}
