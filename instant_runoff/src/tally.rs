use std::collections::HashMap;
use std::fmt::{self, Display};
use std::ops::{Add, AddAssign};

use log::debug;
use num::{BigInt, BigRational, ToPrimitive, Zero};

use crate::ballot::Ballot;
use crate::candidate::Candidate;

/// A number of votes.
///
/// A ballot that ranks several candidates first gives an equal share of its
/// vote to each of them, so the counts are exact fractions. The denominators
/// grow with the sizes of the ties, hence the arbitrary precision.
#[derive(Eq, PartialEq, Debug, Clone, PartialOrd, Ord, Hash)]
pub struct VoteCount(BigRational);

impl VoteCount {
    pub fn zero() -> VoteCount {
        VoteCount(BigRational::zero())
    }

    pub fn whole(votes: u64) -> VoteCount {
        VoteCount(BigRational::from_integer(BigInt::from(votes)))
    }

    /// `numer / denom` votes. Panics if `denom` is zero.
    pub fn fraction(numer: u64, denom: u64) -> VoteCount {
        VoteCount(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn half(&self) -> VoteCount {
        VoteCount(self.0.clone() / BigInt::from(2))
    }

    /// Strictly more than half of `total`.
    pub fn is_majority_of(&self, total: &VoteCount) -> bool {
        self.0.clone() * BigInt::from(2) > total.0
    }

    /// Approximate value, for display.
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl Display for VoteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(VoteCount::zero(), |acc, vc| acc + vc)
    }
}

impl<'a> std::iter::Sum<&'a VoteCount> for VoteCount {
    fn sum<I: Iterator<Item = &'a VoteCount>>(iter: I) -> Self {
        iter.fold(VoteCount::zero(), |mut acc, vc| {
            acc += vc;
            acc
        })
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

impl<'a> AddAssign<&'a VoteCount> for VoteCount {
    fn add_assign(&mut self, rhs: &'a VoteCount) {
        self.0 += &rhs.0;
    }
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0 + rhs.0)
    }
}

/// The first-preference votes of the active candidates for one round.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundTally {
    // In the order of the active candidates.
    counts: Vec<(Candidate, VoteCount)>,
}

/// Counts the first-preference votes of the active candidates.
///
/// Every ballot gives exactly one vote, split equally between the candidates
/// of its [`Ballot::top_choice`]. All the active candidates are in the tally,
/// even without any vote.
pub fn tally(active_candidates: &[Candidate], ballots: &[Ballot]) -> RoundTally {
    let mut counts: HashMap<&Candidate, VoteCount> = active_candidates
        .iter()
        .map(|c| (c, VoteCount::zero()))
        .collect();
    for ballot in ballots.iter() {
        let top = ballot.top_choice(active_candidates);
        if top.is_empty() {
            continue;
        }
        let share = VoteCount::fraction(1, top.len() as u64);
        for c in top.iter() {
            if let Some(vc) = counts.get_mut(c) {
                *vc += &share;
            }
        }
    }
    let res = RoundTally {
        counts: active_candidates
            .iter()
            .map(|c| (c.clone(), counts.remove(c).unwrap_or_else(VoteCount::zero)))
            .collect(),
    };
    debug!("tally: {:?}", res.counts);
    res
}

impl RoundTally {
    pub fn counts(&self) -> &[(Candidate, VoteCount)] {
        &self.counts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Candidate, VoteCount)> {
        self.counts.iter()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn score(&self, candidate: &Candidate) -> Option<VoteCount> {
        self.counts
            .iter()
            .find(|(c, _)| c == candidate)
            .map(|(_, vc)| vc.clone())
    }

    pub fn total(&self) -> VoteCount {
        self.counts.iter().map(|(_, vc)| vc).sum()
    }

    /// A candidate needs strictly more votes than this to win.
    pub fn threshold(&self) -> VoteCount {
        self.total().half()
    }

    pub fn min_count(&self) -> Option<&VoteCount> {
        self.counts.iter().map(|(_, vc)| vc).min()
    }

    pub fn max_count(&self) -> Option<&VoteCount> {
        self.counts.iter().map(|(_, vc)| vc).max()
    }

    /// The candidates tied for the fewest votes.
    pub fn bottom_candidates(&self) -> Vec<Candidate> {
        self.with_count(self.min_count())
    }

    /// The candidates tied for the most votes.
    pub fn top_candidates(&self) -> Vec<Candidate> {
        self.with_count(self.max_count())
    }

    /// The candidate with strictly more than half of the votes, if any.
    pub fn majority_winner(&self) -> Option<Candidate> {
        let total = self.total();
        self.counts
            .iter()
            .find(|(_, vc)| vc.is_majority_of(&total))
            .map(|(c, _)| c.clone())
    }

    /// The share of the votes of each candidate, in percent, most voted first.
    ///
    /// Candidates with the same count keep their order. Only meant for
    /// display: decisions are made on the exact counts.
    pub fn standings(&self) -> Vec<(Candidate, f64)> {
        let total = self.total();
        let mut sorted: Vec<&(Candidate, VoteCount)> = self.counts.iter().collect();
        sorted.sort_by(|(_, vc1), (_, vc2)| vc2.cmp(vc1));
        sorted
            .into_iter()
            .map(|(c, vc)| {
                let pct = if total.is_zero() {
                    0.0
                } else {
                    100.0 * vc.as_f64() / total.as_f64()
                };
                (c.clone(), pct)
            })
            .collect()
    }

    fn with_count(&self, count: Option<&VoteCount>) -> Vec<Candidate> {
        match count {
            Some(count) => self
                .counts
                .iter()
                .filter(|(_, vc)| vc == count)
                .map(|(c, _)| c.clone())
                .collect(),
            None => vec![],
        }
    }
}
