use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

static NEXT_CANDIDATE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(u64);

/// A candidate in an election.
///
/// Every call to [`Candidate::new`] creates a new identity, and clones share it.
/// Candidates are compared and hashed by identity only: two candidates created
/// separately with the same name are different candidates.
///
/// ```
/// use instant_runoff::Candidate;
///
/// let alice = Candidate::new("Alice");
/// assert_eq!(alice, alice.clone());
/// assert_ne!(alice, Candidate::new("Alice"));
/// ```
#[derive(Clone)]
pub struct Candidate {
    id: CandidateId,
    name: Arc<str>,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Candidate {
        let id = CandidateId(NEXT_CANDIDATE_ID.fetch_add(1, AtomicOrdering::Relaxed));
        let name: String = name.into();
        Candidate {
            id,
            name: Arc::from(name),
        }
    }

    pub fn id(&self) -> CandidateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Candidate {}

impl Hash for Candidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// Creation order.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Candidate({}: {})", self.id.0, self.name)
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The candidates running in an election.
///
/// The order in which the candidates are given is kept: it is the order used by
/// [`crate::TieBreakMode::UseCandidateOrder`], and the order of all the reports.
/// A candidate given more than once is only kept at its first position.
/// Two sets are equal if they hold the same candidates, in any order.
#[derive(Clone, Debug)]
pub struct CandidateSet {
    members: Arc<[Candidate]>,
}

impl CandidateSet {
    pub fn new(candidates: &[Candidate]) -> CandidateSet {
        candidates.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, candidate: &Candidate) -> bool {
        self.members.contains(candidate)
    }

    pub fn position(&self, candidate: &Candidate) -> Option<usize> {
        self.members.iter().position(|c| c == candidate)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.members.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.members
    }
}

impl FromIterator<Candidate> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        let mut members: Vec<Candidate> = Vec::new();
        for c in iter {
            if !members.contains(&c) {
                members.push(c);
            }
        }
        CandidateSet {
            members: Arc::from(members),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl PartialEq for CandidateSet {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.members, &other.members)
            || (self.len() == other.len() && self.iter().all(|c| other.contains(c)))
    }
}

impl Eq for CandidateSet {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identity_not_name() {
        let a1 = Candidate::new("Alice");
        let a2 = Candidate::new("Alice");
        assert_ne!(a1, a2);
        assert_eq!(a1.name(), a2.name());
        let set: HashSet<Candidate> = [a1.clone(), a2, a1.clone()].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(format!("{}", a1), "Alice");
    }

    #[test]
    fn creation_order() {
        let a = Candidate::new("Zoe");
        let b = Candidate::new("Adam");
        assert!(a < b);
    }

    #[test]
    fn set_keeps_order_and_drops_duplicates() {
        let a = Candidate::new("A");
        let b = Candidate::new("B");
        let c = Candidate::new("C");
        let set = CandidateSet::new(&[c.clone(), a.clone(), c.clone(), b.clone()]);
        assert_eq!(set.as_slice(), &[c.clone(), a.clone(), b.clone()]);
        assert_eq!(set.position(&b), Some(2));
        assert!(!set.contains(&Candidate::new("A")));
    }

    #[test]
    fn set_equality_ignores_order() {
        let a = Candidate::new("A");
        let b = Candidate::new("B");
        let s1 = CandidateSet::new(&[a.clone(), b.clone()]);
        let s2 = CandidateSet::new(&[b.clone(), a.clone()]);
        let s3 = CandidateSet::new(&[a.clone()]);
        assert_eq!(s1, s2);
        assert_ne!(s1, s3);
    }
}
