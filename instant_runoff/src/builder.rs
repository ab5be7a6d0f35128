use std::collections::HashMap;

pub use crate::config::*;
use crate::{Ballot, Candidate, CandidateSet, Election, Rank};

/// A builder for elections where candidates are known by their names.
///
/// This is what readers of spreadsheets or forms use: each name gets one
/// [`Candidate`], and each vote becomes a cast [`Ballot`].
///
/// ```
/// pub use instant_runoff::builder::Builder;
/// pub use instant_runoff::{ElectionRules, Outcome};
/// # use instant_runoff::VotingErrors;
///
/// let mut builder = Builder::new(&ElectionRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string(), "Clara".to_string()])?;
///
/// builder.add_vote_simple(&["Anna".to_string(), "Clara".to_string()])?;
/// // Bob and Clara share the first rank.
/// builder.add_vote(&[("Bob", 1), ("Clara", 1)])?;
/// builder.add_vote(&[("Anna", 2.5)])?;
///
/// let anna = builder.candidate("Anna").cloned();
/// let election = builder.build()?;
/// assert_eq!(election.instant_runoff().outcome.winner(), anna.as_ref());
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: ElectionRules,
    pub(crate) _candidates: CandidateSet,
    pub(crate) _by_name: HashMap<String, Candidate>,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new(rules: &ElectionRules) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: CandidateSet::new(&[]),
            _by_name: HashMap::new(),
            _ballots: Vec::new(),
        })
    }

    /// Registers the candidates, in order. Their names must be distinct.
    ///
    /// Votes already added are discarded.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        let mut by_name: HashMap<String, Candidate> = HashMap::new();
        let mut ordered: Vec<Candidate> = Vec::new();
        for name in cands.iter() {
            if by_name.contains_key(name) {
                return Err(VotingErrors::DuplicateCandidate(name.clone()));
            }
            let c = Candidate::new(name.clone());
            by_name.insert(name.clone(), c.clone());
            ordered.push(c);
        }
        Ok(Builder {
            _rules: self._rules,
            _candidates: CandidateSet::new(&ordered),
            _by_name: by_name,
            _ballots: Vec::new(),
        })
    }

    pub fn candidate(&self, name: &str) -> Option<&Candidate> {
        self._by_name.get(name)
    }

    pub fn candidate_set(&self) -> &CandidateSet {
        &self._candidates
    }

    pub fn num_ballots(&self) -> usize {
        self._ballots.len()
    }

    /// Adds a vote that ranks the given candidates in order: the first one
    /// gets rank 1, the second one rank 2, and so on.
    ///
    /// It is the simplest use case for most cases.
    pub fn add_vote_simple(&mut self, candidates: &[String]) -> Result<(), VotingErrors> {
        let ranks: Vec<(&str, u32)> = candidates
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), (idx + 1) as u32))
            .collect();
        self.add_vote(&ranks)
    }

    /// Adds a vote with an explicit rank for each named candidate.
    ///
    /// Candidates may share a rank. Candidates that are not named are ranked
    /// last. An empty list is a vote that does not prefer any candidate.
    pub fn add_vote<S, R>(&mut self, ranks: &[(S, R)]) -> Result<(), VotingErrors>
    where
        S: AsRef<str>,
        R: Into<Rank> + Copy,
    {
        let mut ballot = Ballot::new();
        for (name, rank) in ranks.iter() {
            let c = self
                ._by_name
                .get(name.as_ref())
                .ok_or_else(|| VotingErrors::UnknownCandidate(name.as_ref().to_string()))?;
            ballot.add_preference(c, *rank)?;
        }
        self.add_ballot(ballot)
    }

    /// Adds a ballot built outside of the builder. It must only rank candidates of this builder.
    pub fn add_ballot(&mut self, mut ballot: Ballot) -> Result<(), VotingErrors> {
        ballot.cast(&self._candidates)?;
        self._ballots.push(ballot);
        Ok(())
    }

    pub fn build(self) -> Result<Election, VotingErrors> {
        Election::new(self._candidates, self._ballots, &self._rules)
    }
}
