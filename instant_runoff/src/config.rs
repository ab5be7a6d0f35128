// ********* Errors ***********

use std::error::Error;
use std::fmt::Display;

use crate::candidate::Candidate;
use crate::tally::{RoundTally, VoteCount};

/// Errors that prevent an election from being set up.
///
/// A tie is not an error: it is reported through [`Outcome::Tie`].
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    /// A ballot was modified after being cast, or cast against another set of candidates.
    InvalidState(String),
    /// A ballot refers to a candidate that does not run in the election.
    UnknownCandidate(String),
    /// There is no candidate in the election.
    EmptyElection,
    /// A rank that cannot be ordered (NaN).
    InvalidRank(String),
    /// The same candidate name was registered twice in a builder.
    DuplicateCandidate(String),
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::InvalidState(msg) => write!(f, "invalid ballot state: {}", msg),
            VotingErrors::UnknownCandidate(name) => {
                write!(f, "unknown candidate {:?}: not part of this election", name)
            }
            VotingErrors::EmptyElection => write!(f, "the election has no candidates"),
            VotingErrors::InvalidRank(msg) => write!(f, "invalid rank: {}", msg),
            VotingErrors::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} is declared more than once", name)
            }
        }
    }
}

// ********* Configuration **********

/// How to resolve a tie between the candidates with the fewest votes.
///
/// Based on https://electowiki.org/wiki/Instant-runoff_voting#Handling_ties_in_IRV_elections
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TieBreakMode {
    /// Never picks a candidate arbitrarily. All the candidates tied for the
    /// last place are eliminated together. If they are all the remaining
    /// candidates, the election ends in a tie.
    Refuse,
    /// The tied candidate that comes last in the order of the candidates is eliminated.
    UseCandidateOrder,
    /// Eliminates one of the tied candidates at random. The draw only depends
    /// on the seed, the round and the names of the candidates.
    Random(u32),
    /// Random voter hierarchy: a strict order of all the candidates is drawn
    /// once from the seed, and the tied candidate that comes first in it is eliminated.
    RandomVoterHierarchy(u32),
}

impl TieBreakMode {
    pub fn name(&self) -> &'static str {
        match self {
            TieBreakMode::Refuse => "refuse",
            TieBreakMode::UseCandidateOrder => "useCandidateOrder",
            TieBreakMode::Random(_) => "random",
            TieBreakMode::RandomVoterHierarchy(_) => "randomVoterHierarchy",
        }
    }

    pub fn seed(&self) -> Option<u32> {
        match self {
            TieBreakMode::Random(seed) | TieBreakMode::RandomVoterHierarchy(seed) => Some(*seed),
            _ => None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionRules {
    pub tiebreak_mode: TieBreakMode,
}

impl ElectionRules {
    /// The default rules refuse to break ties: an election in which all the
    /// remaining candidates are tied ends with [`Outcome::Tie`] instead of a
    /// winner picked by chance or by position.
    pub const DEFAULT_RULES: ElectionRules = ElectionRules {
        tiebreak_mode: TieBreakMode::Refuse,
    };

    pub fn with_tiebreak(tiebreak_mode: TieBreakMode) -> ElectionRules {
        ElectionRules { tiebreak_mode }
    }
}

impl Default for ElectionRules {
    fn default() -> Self {
        ElectionRules::DEFAULT_RULES
    }
}

// ******** Output data structures *********

/// Statistics for one round
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    /// The first-preference votes of the candidates still running, in candidate order.
    pub tally: RoundTally,
    /// A candidate needs strictly more votes than this to win the round.
    pub threshold: VoteCount,
    pub elected: Option<Candidate>,
    pub eliminated: Vec<Candidate>,
    /// True if several candidates were tied for the last place.
    pub tiebreak: bool,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Outcome {
    Winner(Candidate),
    /// All the remaining candidates are tied, in candidate order.
    Tie(Vec<Candidate>),
}

impl Outcome {
    pub fn winner(&self) -> Option<&Candidate> {
        match self {
            Outcome::Winner(c) => Some(c),
            Outcome::Tie(_) => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, Outcome::Tie(_))
    }

    /// The winner, or all the tied candidates.
    pub fn candidates(&self) -> Vec<Candidate> {
        match self {
            Outcome::Winner(c) => vec![c.clone()],
            Outcome::Tie(cs) => cs.clone(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionResult {
    pub outcome: Outcome,
    pub round_stats: Vec<RoundStats>,
}

impl ElectionResult {
    pub fn num_rounds(&self) -> u32 {
        self.round_stats.len() as u32
    }
}
