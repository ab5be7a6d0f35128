/*!
Instant-runoff voting with tied and partial rankings.

Each ballot ranks some of the candidates, possibly several at the same rank.
In every round, each ballot gives one vote to its most preferred candidates
still running, split equally between them when they are tied. A candidate with
strictly more than half of the votes wins; otherwise the candidate with the
fewest votes is eliminated and the count starts again.

```
use instant_runoff::*;

// There are two candidates in this election
let alice = Candidate::new("Alice");
let bob = Candidate::new("Bob");
let candidates = CandidateSet::new(&[alice.clone(), bob.clone()]);
// The first voter ranks Alice first and Bob second
let mut ballot1 = Ballot::new();
ballot1.add_preference(&alice, 1)?;
ballot1.add_preference(&bob, 2)?;
ballot1.cast(&candidates)?;
// The second voter does not express any preference,
// which is equivalent to ranking all candidates equally
let mut ballot2 = Ballot::new();
ballot2.cast(&candidates)?;

let election = Election::new(candidates, vec![ballot1, ballot2], &ElectionRules::DEFAULT_RULES)?;
let result = election.instant_runoff();
// Alice has 1.5 votes out of 2
assert_eq!(result.outcome, Outcome::Winner(alice));
# Ok::<(), VotingErrors>(())
```
*/

mod ballot;
pub mod builder;
mod candidate;
mod config;
pub mod manual;
mod tally;
mod tiebreak;

use log::{debug, info};

pub use crate::ballot::*;
pub use crate::candidate::*;
pub use crate::config::*;
pub use crate::tally::*;
pub use crate::tiebreak::*;

/// An election between a fixed set of candidates.
///
/// All the ballots are cast against the candidates of the election.
#[derive(Debug, Clone)]
pub struct Election {
    candidates: CandidateSet,
    ballots: Vec<Ballot>,
    rules: ElectionRules,
}

impl Election {
    /// Creates an election.
    ///
    /// The ballots that have not been cast yet are cast against `candidates`.
    /// Fails if there is no candidate, if a ballot ranks a candidate not in
    /// `candidates`, or if a ballot was already cast for other candidates.
    pub fn new(
        candidates: CandidateSet,
        ballots: Vec<Ballot>,
        rules: &ElectionRules,
    ) -> Result<Election, VotingErrors> {
        if candidates.is_empty() {
            return Err(VotingErrors::EmptyElection);
        }
        let mut cast_ballots: Vec<Ballot> = Vec::with_capacity(ballots.len());
        for mut ballot in ballots {
            ballot.cast(&candidates)?;
            cast_ballots.push(ballot);
        }
        debug!(
            "Election::new: {} candidates, {} ballots, rules: {:?}",
            candidates.len(),
            cast_ballots.len(),
            rules
        );
        Ok(Election {
            candidates,
            ballots: cast_ballots,
            rules: rules.clone(),
        })
    }

    /// Creates an election between the candidates that appear on the ballots,
    /// in the order in which the candidates were created.
    pub fn from_ballots(
        ballots: Vec<Ballot>,
        rules: &ElectionRules,
    ) -> Result<Election, VotingErrors> {
        let mut all: Vec<Candidate> = ballots.iter().flat_map(|b| b.voted()).collect();
        all.sort();
        all.dedup();
        Election::new(all.into_iter().collect(), ballots, rules)
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn rules(&self) -> &ElectionRules {
        &self.rules
    }

    /// Runs the instant-runoff count.
    ///
    /// The election is not modified: running it again gives the same result.
    /// There are at most as many rounds as candidates.
    pub fn instant_runoff(&self) -> ElectionResult {
        info!(
            "Processing {:?} ballots, {} candidates, tiebreak mode: {:?}",
            self.ballots.len(),
            self.candidates.len(),
            self.rules.tiebreak_mode
        );
        for (idx, c) in self.candidates.iter().enumerate() {
            info!("Candidate: {}: {}", idx + 1, c);
        }

        let candidate_order = self.candidates.as_slice();
        // The candidates that are still running, in candidate order.
        let mut active: Vec<Candidate> = candidate_order.to_vec();
        let mut round_stats: Vec<RoundStats> = Vec::new();
        let mut round_id: u32 = 1;

        loop {
            let scores = tally(&active, &self.ballots);
            let threshold = scores.threshold();
            info!("Round {} (winning threshold: more than {})", round_id, threshold);
            for (c, vc) in scores.iter() {
                info!("{:>8} {}", vc.to_string(), c);
            }
            let mut stats = RoundStats {
                round: round_id,
                tally: scores.clone(),
                threshold,
                elected: None,
                eliminated: Vec::new(),
                tiebreak: false,
            };

            // Only one candidate. It is the winner by any standard.
            let winner = if active.len() == 1 {
                Some(active[0].clone())
            } else {
                scores.majority_winner()
            };
            if let Some(winner) = winner {
                info!("Round {}: {} -> elected", round_id, winner);
                stats.elected = Some(winner.clone());
                round_stats.push(stats);
                return ElectionResult {
                    outcome: Outcome::Winner(winner),
                    round_stats,
                };
            }

            let losers = scores.bottom_candidates();
            debug!("instant_runoff: round {}: losers: {:?}", round_id, losers);
            stats.tiebreak = losers.len() > 1;
            let context = TieBreakContext {
                candidate_order,
                active: &active,
                round: round_id,
            };
            let eliminated = match self.rules.tiebreak_mode.break_tie(&losers, &context) {
                TieBreak::Eliminate(eliminated) if eliminated.len() < active.len() => eliminated,
                // Nobody would be left.
                _ => {
                    info!("Round {}: all remaining candidates are tied: {:?}", round_id, active);
                    round_stats.push(stats);
                    return ElectionResult {
                        outcome: Outcome::Tie(active),
                        round_stats,
                    };
                }
            };
            assert!(!eliminated.is_empty(), "No candidate eliminated");
            for c in eliminated.iter() {
                info!("Round {}: {} -> eliminated", round_id, c);
            }

            let num_before = active.len();
            active.retain(|c| !eliminated.contains(c));
            // Invariant: the number of candidates decreased.
            assert!(
                active.len() < num_before,
                "The number of candidates did not decrease: {:?}",
                active
            );
            stats.eliminated = eliminated;
            round_stats.push(stats);
            round_id += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ballot(ranks: &[(&Candidate, f64)]) -> Ballot {
        let mut b = Ballot::new();
        for (c, r) in ranks {
            b.add_preference(c, *r).unwrap();
        }
        b
    }

    fn ballot_first(c: &Candidate) -> Ballot {
        ballot(&[(c, 1.0)])
    }

    fn election(cands: &[Candidate], ballots: Vec<Ballot>, mode: TieBreakMode) -> Election {
        Election::new(
            CandidateSet::new(cands),
            ballots,
            &ElectionRules::with_tiebreak(mode),
        )
        .unwrap()
    }

    // Four cities, see https://electowiki.org/wiki/Instant-runoff_voting
    fn tennessee() -> (Vec<Candidate>, Vec<Ballot>) {
        let m = Candidate::new("Memphis");
        let n = Candidate::new("Nashville");
        let c = Candidate::new("Chattanooga");
        let k = Candidate::new("Knoxville");
        let mut ballots = Vec::new();
        for _ in 0..42 {
            ballots.push(ballot(&[(&m, 1.0), (&n, 2.0), (&c, 3.0), (&k, 4.0)]));
        }
        for _ in 0..26 {
            ballots.push(ballot(&[(&n, 1.0), (&c, 2.0), (&k, 3.0), (&m, 4.0)]));
        }
        for _ in 0..15 {
            ballots.push(ballot(&[(&c, 1.0), (&k, 2.0), (&m, 3.0), (&n, 4.0)]));
        }
        for _ in 0..17 {
            ballots.push(ballot(&[(&k, 1.0), (&c, 2.0), (&n, 3.0), (&m, 4.0)]));
        }
        (vec![c, k, m, n], ballots)
    }

    #[test]
    fn empty_election() {
        let res = Election::new(
            CandidateSet::new(&[]),
            vec![],
            &ElectionRules::DEFAULT_RULES,
        );
        assert!(matches!(res, Err(VotingErrors::EmptyElection)));
    }

    #[test]
    fn new_casts_ballots() {
        let a = Candidate::new("A");
        let b = Candidate::new("B");
        let e = election(&[a.clone(), b.clone()], vec![ballot_first(&a)], TieBreakMode::Refuse);
        assert!(e.ballots().iter().all(|b| b.is_cast()));

        let res = Election::new(
            CandidateSet::new(&[a.clone()]),
            vec![ballot_first(&b)],
            &ElectionRules::DEFAULT_RULES,
        );
        assert_eq!(res.err(), Some(VotingErrors::UnknownCandidate("B".to_string())));
    }

    #[test]
    fn new_rejects_ballot_from_other_election() {
        let a = Candidate::new("A");
        let b = Candidate::new("B");
        let mut other = ballot_first(&a);
        other.cast(&CandidateSet::new(&[a.clone()])).unwrap();
        let res = Election::new(
            CandidateSet::new(&[a, b]),
            vec![other],
            &ElectionRules::DEFAULT_RULES,
        );
        assert!(matches!(res, Err(VotingErrors::InvalidState(_))));
    }

    #[test]
    fn from_ballots() {
        let a = Candidate::new("A");
        let b = Candidate::new("B");
        let c = Candidate::new("C");
        let e = Election::from_ballots(
            vec![ballot(&[(&c, 1.0), (&a, 2.0)]), ballot_first(&b)],
            &ElectionRules::DEFAULT_RULES,
        )
        .unwrap();
        assert_eq!(e.candidates().as_slice(), &[a, b, c]);
    }

    #[test]
    fn single_candidate() {
        let a = Candidate::new("A");
        let e = election(&[a.clone()], vec![], TieBreakMode::Refuse);
        let res = e.instant_runoff();
        assert_eq!(res.outcome, Outcome::Winner(a));
        assert_eq!(res.num_rounds(), 1);
    }

    #[test]
    fn scenario_empty_ballot_splits_its_vote() {
        init_logs();
        let alice = Candidate::new("Alice");
        let bob = Candidate::new("Bob");
        let e = election(
            &[alice.clone(), bob.clone()],
            vec![ballot(&[(&alice, 1.0), (&bob, 2.0)]), Ballot::new()],
            TieBreakMode::Refuse,
        );
        let res = e.instant_runoff();
        assert_eq!(res.outcome, Outcome::Winner(alice.clone()));
        assert_eq!(res.num_rounds(), 1);
        let round = &res.round_stats[0];
        assert_eq!(
            round.tally.counts().to_vec(),
            vec![
                (alice.clone(), VoteCount::fraction(3, 2)),
                (bob, VoteCount::fraction(1, 2))
            ]
        );
        assert_eq!(round.threshold, VoteCount::whole(1));
        assert_eq!(round.elected, Some(alice));
    }

    #[test]
    fn scenario_three_way_tie_refused() {
        let cs: Vec<Candidate> = ["A", "B", "C"].iter().map(|n| Candidate::new(*n)).collect();
        let ballots: Vec<Ballot> = cs.iter().map(ballot_first).collect();
        let e = election(&cs, ballots, TieBreakMode::Refuse);
        let res = e.instant_runoff();
        assert_eq!(res.outcome, Outcome::Tie(cs.clone()));
        assert!(res.outcome.winner().is_none());
        assert_eq!(res.num_rounds(), 1);
        assert!(res.round_stats[0].tiebreak);
        assert!(res.round_stats[0].eliminated.is_empty());
    }

    #[test]
    fn scenario_three_way_tie_candidate_order() {
        let cs: Vec<Candidate> = ["A", "B", "C"].iter().map(|n| Candidate::new(*n)).collect();
        let ballots: Vec<Ballot> = cs.iter().map(ballot_first).collect();
        let e = election(&cs, ballots, TieBreakMode::UseCandidateOrder);
        let res = e.instant_runoff();
        // C goes first, then A and B are tied 1-1 with one abstention (1.5 each), B goes.
        assert_eq!(res.round_stats[0].eliminated, vec![cs[2].clone()]);
        assert_eq!(res.round_stats[1].eliminated, vec![cs[1].clone()]);
        assert_eq!(res.outcome, Outcome::Winner(cs[0].clone()));
        assert_eq!(res.num_rounds(), 3);
    }

    #[test]
    fn scenario_three_way_tie_random() {
        let cs: Vec<Candidate> = ["A", "B", "C"].iter().map(|n| Candidate::new(*n)).collect();
        let ballots: Vec<Ballot> = cs.iter().map(ballot_first).collect();
        for mode in [TieBreakMode::Random(5), TieBreakMode::RandomVoterHierarchy(5)] {
            let e = election(&cs, ballots.clone(), mode);
            let res = e.instant_runoff();
            assert_eq!(res.round_stats[0].eliminated.len(), 1);
            assert_eq!(res.round_stats[1].tally.len(), 2);
            assert!(res.outcome.winner().is_some());
        }
    }

    #[test]
    fn refuse_eliminates_tied_group() {
        let a = Candidate::new("A");
        let b = Candidate::new("B");
        let c = Candidate::new("C");
        let d = Candidate::new("D");
        let mut ballots = vec![
            ballot(&[(&a, 1.0), (&b, 2.0)]),
            ballot(&[(&a, 1.0), (&b, 2.0)]),
            ballot(&[(&b, 1.0)]),
            ballot(&[(&b, 1.0)]),
        ];
        ballots.push(ballot(&[(&c, 1.0), (&a, 2.0)]));
        ballots.push(ballot(&[(&d, 1.0), (&a, 2.0)]));
        let e = election(&[a.clone(), b.clone(), c.clone(), d.clone()], ballots, TieBreakMode::Refuse);
        let res = e.instant_runoff();
        assert_eq!(res.round_stats[0].eliminated, vec![c, d]);
        assert!(res.round_stats[0].tiebreak);
        assert_eq!(res.outcome, Outcome::Winner(a));
        assert_eq!(res.num_rounds(), 2);
    }

    #[test]
    fn no_ballots() {
        let cs: Vec<Candidate> = ["A", "B", "C"].iter().map(|n| Candidate::new(*n)).collect();
        let refused = election(&cs, vec![], TieBreakMode::Refuse).instant_runoff();
        assert_eq!(refused.outcome, Outcome::Tie(cs.clone()));
        assert_eq!(refused.round_stats[0].threshold, VoteCount::zero());

        let ordered = election(&cs, vec![], TieBreakMode::UseCandidateOrder).instant_runoff();
        assert_eq!(ordered.outcome, Outcome::Winner(cs[0].clone()));
        assert_eq!(ordered.num_rounds(), 3);
    }

    #[test]
    fn tennessee_election() {
        init_logs();
        let (cands, ballots) = tennessee();
        let (c, k, m, n) = (&cands[0], &cands[1], &cands[2], &cands[3]);
        let e = election(&cands, ballots, TieBreakMode::Refuse);
        let res = e.instant_runoff();
        assert_eq!(res.num_rounds(), 3);
        assert_eq!(res.round_stats[0].eliminated, vec![c.clone()]);
        assert_eq!(res.round_stats[1].eliminated, vec![n.clone()]);
        assert_eq!(res.outcome, Outcome::Winner(k.clone()));
        let last = &res.round_stats[2];
        assert_eq!(
            last.tally.counts().to_vec(),
            vec![(k.clone(), VoteCount::whole(58)), (m.clone(), VoteCount::whole(42))]
        );
        assert!(res.round_stats.iter().all(|r| !r.tiebreak));
    }

    #[test]
    fn majority_in_first_round() {
        let (cands, mut ballots) = tennessee();
        let m = cands[2].clone();
        // 62 votes out of 120
        for _ in 0..20 {
            ballots.push(ballot_first(&m));
        }
        for mode in [TieBreakMode::Refuse, TieBreakMode::UseCandidateOrder, TieBreakMode::Random(1)] {
            let res = election(&cands, ballots.clone(), mode).instant_runoff();
            assert_eq!(res.outcome, Outcome::Winner(m.clone()));
            assert_eq!(res.num_rounds(), 1);
        }
    }

    #[test]
    fn exactly_half_is_not_a_majority() {
        let a = Candidate::new("A");
        let b = Candidate::new("B");
        let c = Candidate::new("C");
        let ballots = vec![
            ballot_first(&a),
            ballot_first(&a),
            ballot(&[(&b, 1.0), (&c, 2.0)]),
            ballot(&[(&c, 1.0), (&b, 2.0)]),
        ];
        let res = election(
            &[a.clone(), b.clone(), c],
            ballots,
            TieBreakMode::UseCandidateOrder,
        )
        .instant_runoff();
        assert_eq!(res.round_stats[0].elected, None);
        // B and C tied at the bottom: C goes and transfers to B, A and B tied at 2.
        assert_eq!(res.round_stats[1].elected, None);
        assert_eq!(res.round_stats[1].eliminated, vec![b]);
        assert_eq!(res.num_rounds(), 3);
        assert_eq!(res.outcome, Outcome::Winner(a));
    }

    #[test]
    fn idempotent() {
        let (cands, ballots) = tennessee();
        for mode in [
            TieBreakMode::Refuse,
            TieBreakMode::UseCandidateOrder,
            TieBreakMode::Random(11),
            TieBreakMode::RandomVoterHierarchy(11),
        ] {
            let e = election(&cands, ballots.clone(), mode);
            assert_eq!(e.instant_runoff(), e.instant_runoff());
        }
    }

    #[test]
    fn random_elections_terminate() {
        // A small deterministic generator is enough to vary the ballots.
        let mut state: u64 = 12345;
        let mut next = move |m: u64| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) % m
        };
        for trial in 0..30 {
            let cands: Vec<Candidate> = (0..8).map(|i| Candidate::new(format!("C{}", i))).collect();
            let mut ballots = Vec::new();
            for _ in 0..50 {
                let mut b = Ballot::new();
                for c in cands.iter() {
                    if next(20) == 0 {
                        continue;
                    }
                    b.add_preference(c, next(8) as u32).unwrap();
                }
                ballots.push(b);
            }
            let mode = match trial % 3 {
                0 => TieBreakMode::Refuse,
                1 => TieBreakMode::UseCandidateOrder,
                _ => TieBreakMode::Random(trial),
            };
            let res = election(&cands, ballots, mode).instant_runoff();
            assert!(res.num_rounds() as usize <= cands.len());
            assert!(!res.outcome.candidates().is_empty());
            for r in res.round_stats.iter() {
                assert_eq!(r.tally.total(), VoteCount::whole(50));
            }
        }
    }
}
