use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{self, Display};

use crate::candidate::{Candidate, CandidateSet};
use crate::config::VotingErrors;

/// The rank given to a candidate on a ballot. Lower ranks are preferred.
///
/// Only the order between the ranks of a ballot matters, not their values:
/// `1, 2, 3` and `-4.5, 0, 10` express the same preferences.
#[derive(Debug, Clone, Copy)]
pub struct Rank(f64);

impl Rank {
    pub fn new(value: f64) -> Rank {
        // -0 and 0 are the same rank.
        Rank(if value == 0.0 { 0.0 } else { value })
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<f64> for Rank {
    fn from(x: f64) -> Self {
        Rank::new(x)
    }
}

impl From<i32> for Rank {
    fn from(x: i32) -> Self {
        Rank(x as f64)
    }
}

impl From<u32> for Rank {
    fn from(x: u32) -> Self {
        Rank(x as f64)
    }
}

impl From<i64> for Rank {
    fn from(x: i64) -> Self {
        Rank(x as f64)
    }
}

/// A ballot, containing the ranked preferences of one voter.
///
/// Several candidates may share the same rank. A candidate that is not ranked
/// is placed after all the ranked candidates, tied with all the other
/// candidates that are not ranked. A ballot without any preference is
/// therefore indifferent between all the candidates.
///
/// A ballot is filled with [`Ballot::add_preference`] and then frozen with
/// [`Ballot::cast`], which ties it to the candidates of an election.
#[derive(Debug, Clone, Default)]
pub struct Ballot {
    ranks: HashMap<Candidate, Rank>,
    cast_against: Option<CandidateSet>,
}

impl Ballot {
    pub fn new() -> Ballot {
        Ballot::default()
    }

    /// Records the rank of a candidate, replacing any previous rank for this candidate.
    pub fn add_preference(
        &mut self,
        candidate: &Candidate,
        rank: impl Into<Rank>,
    ) -> Result<(), VotingErrors> {
        if self.cast_against.is_some() {
            return Err(VotingErrors::InvalidState(format!(
                "cannot rank {} on a ballot that was already cast",
                candidate
            )));
        }
        let rank: Rank = rank.into();
        if rank.0.is_nan() {
            return Err(VotingErrors::InvalidRank(format!(
                "the rank of {} is not a number",
                candidate
            )));
        }
        self.ranks.insert(candidate.clone(), rank);
        Ok(())
    }

    /// Freezes the ballot for an election between the given candidates.
    ///
    /// Fails without changing the ballot if it ranks a candidate outside of
    /// `candidates`. Casting again against the same candidates does nothing,
    /// casting against other candidates fails.
    pub fn cast(&mut self, candidates: &CandidateSet) -> Result<(), VotingErrors> {
        if let Some(previous) = &self.cast_against {
            if previous == candidates {
                return Ok(());
            }
            return Err(VotingErrors::InvalidState(
                "the ballot was already cast for another set of candidates".to_string(),
            ));
        }
        if let Some(unknown) = self.voted().iter().find(|c| !candidates.contains(c)) {
            return Err(VotingErrors::UnknownCandidate(unknown.name().to_string()));
        }
        self.cast_against = Some(candidates.clone());
        Ok(())
    }

    pub fn is_cast(&self) -> bool {
        self.cast_against.is_some()
    }

    /// The candidates this ballot was cast for, if it was cast.
    pub fn candidate_set(&self) -> Option<&CandidateSet> {
        self.cast_against.as_ref()
    }

    pub fn rank_of(&self, candidate: &Candidate) -> Option<Rank> {
        self.ranks.get(candidate).copied()
    }

    /// The candidates explicitly ranked on this ballot, most preferred first.
    pub fn voted(&self) -> Vec<Candidate> {
        let mut ranked: Vec<(&Candidate, &Rank)> = self.ranks.iter().collect();
        ranked.sort_by(|(c1, r1), (c2, r2)| r1.cmp(r2).then_with(|| c1.cmp(c2)));
        ranked.into_iter().map(|(c, _)| c.clone()).collect()
    }

    /// The candidates grouped by rank, most preferred first.
    ///
    /// Once the ballot is cast, the candidates it does not rank form the last group.
    pub fn preference_groups(&self) -> Vec<Vec<Candidate>> {
        let mut groups: Vec<Vec<Candidate>> = Vec::new();
        let mut cur_rank: Option<Rank> = None;
        for c in self.voted() {
            let rank = self.ranks.get(&c).copied();
            if cur_rank.is_some() && cur_rank == rank {
                if let Some(group) = groups.last_mut() {
                    group.push(c);
                }
            } else {
                cur_rank = rank;
                groups.push(vec![c]);
            }
        }
        if let Some(cands) = &self.cast_against {
            let unranked: Vec<Candidate> = cands
                .iter()
                .filter(|c| !self.ranks.contains_key(c))
                .cloned()
                .collect();
            if !unranked.is_empty() {
                groups.push(unranked);
            }
        }
        groups
    }

    /// The most preferred candidates among `active_candidates`.
    ///
    /// When the ballot ranks none of them, they are all tied. The result
    /// follows the order of `active_candidates`.
    pub fn top_choice(&self, active_candidates: &[Candidate]) -> Vec<Candidate> {
        let best: Option<&Rank> = active_candidates
            .iter()
            .filter_map(|c| self.ranks.get(c))
            .min();
        match best {
            Some(best) => active_candidates
                .iter()
                .filter(|c| self.ranks.get(c) == Some(best))
                .cloned()
                .collect(),
            None => active_candidates.to_vec(),
        }
    }
}

impl Display for Ballot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .preference_groups()
            .iter()
            .enumerate()
            .map(|(idx, group)| {
                let names: Vec<&str> = group.iter().map(|c| c.name()).collect();
                format!("{}. {}", idx + 1, names.join(", "))
            })
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}
