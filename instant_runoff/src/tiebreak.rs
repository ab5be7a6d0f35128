use log::debug;

use crate::candidate::Candidate;
use crate::config::TieBreakMode;

/// The resolution of a tie between the candidates with the fewest votes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TieBreak {
    /// These candidates are eliminated this round.
    Eliminate(Vec<Candidate>),
    /// The election stops with all the remaining candidates tied.
    DeclareTie,
}

/// What a tie-break may look at, besides the tied candidates.
#[derive(Debug, Clone, Copy)]
pub struct TieBreakContext<'a> {
    /// All the candidates of the election, in candidate order.
    pub candidate_order: &'a [Candidate],
    /// The candidates still running this round.
    pub active: &'a [Candidate],
    pub round: u32,
}

impl TieBreakMode {
    /// Picks the candidates to eliminate among `losers`, the candidates tied
    /// for the fewest votes.
    ///
    /// A single loser is always eliminated. Only [`TieBreakMode::Refuse`] may
    /// declare a tie or eliminate more than one candidate.
    pub fn break_tie(&self, losers: &[Candidate], context: &TieBreakContext) -> TieBreak {
        if losers.len() <= 1 {
            return TieBreak::Eliminate(losers.to_vec());
        }
        let eliminated: Option<Candidate> = match self {
            TieBreakMode::Refuse => {
                if losers.len() >= context.active.len() {
                    debug!("break_tie: all the remaining candidates are tied: {:?}", losers);
                    return TieBreak::DeclareTie;
                }
                return TieBreak::Eliminate(losers.to_vec());
            }
            TieBreakMode::UseCandidateOrder => {
                let mut res: Vec<&Candidate> = losers.iter().collect();
                res.sort_by_key(|c| {
                    context
                        .candidate_order
                        .iter()
                        .position(|c2| c2 == *c)
                        .unwrap_or(usize::MAX)
                });
                // The last one in candidate order loses.
                res.last().map(|c| (*c).clone())
            }
            TieBreakMode::Random(seed) => {
                let res = candidate_permutation_crypto(losers, *seed, context.round);
                debug!(
                    "break_tie: elimination queue using tiebreak mode random: {:?}",
                    res
                );
                res.into_iter().next()
            }
            TieBreakMode::RandomVoterHierarchy(seed) => {
                // Drawn for the whole election, so it does not depend on the round.
                let hierarchy = candidate_permutation_crypto(context.candidate_order, *seed, 0);
                debug!("break_tie: random voter hierarchy: {:?}", hierarchy);
                hierarchy.into_iter().find(|c| losers.contains(c))
            }
        };
        match eliminated {
            Some(c) => TieBreak::Eliminate(vec![c]),
            // The losers are not part of the election: drop them all.
            None => TieBreak::Eliminate(losers.to_vec()),
        }
    }
}

/// Generates a "random" permutation of the candidates. Random in this context means hard to guess in advance.
/// Each candidate is keyed by a cryptographic hash of the seed, the round and its name,
/// so the permutation is reproducible for a given seed.
fn candidate_permutation_crypto(
    candidates: &[Candidate],
    seed: u32,
    num_round: u32,
) -> Vec<Candidate> {
    let mut data: Vec<(String, &Candidate)> = candidates
        .iter()
        .map(|c| {
            let key = format!("{:08}{:08}{}", seed, num_round, c.name());
            (sha256::digest(key.as_str()), c)
        })
        .collect();
    // Candidates with the same name get the same hash.
    data.sort_by(|(h1, c1), (h2, c2)| h1.cmp(h2).then_with(|| c1.cmp(c2)));
    data.into_iter().map(|(_, c)| c.clone()).collect()
}
