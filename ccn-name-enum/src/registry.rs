//! Bookkeeping shared by the consumer and responder engines.
//!
//! The consumer tracks one [`EnumerationRequest`] per registered prefix in a
//! [`RequestRegistry`]. The responder tracks one [`HandledResponse`] per
//! answered prefix in a [`ResponseTable`]. Both are insertion-ordered maps
//! keyed by prefix; neither is synchronized, the owning engine holds them
//! behind its lock.

use ccn_name::{ContentName, Interest};
use indexmap::IndexMap;

/// An enumeration in progress for one prefix.
///
/// Holds the discovery interests currently outstanding for the prefix.
/// Normally there is exactly one; the list tolerates overlap while an
/// interest is being renewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationRequest {
    prefix: ContentName,
    interests: Vec<Interest>,
}

impl EnumerationRequest {
    /// Creates a request with no outstanding interests.
    #[must_use]
    pub fn new(prefix: ContentName) -> Self {
        Self {
            prefix,
            interests: Vec::new(),
        }
    }

    /// Returns the enumerated prefix.
    #[must_use]
    pub fn prefix(&self) -> &ContentName {
        &self.prefix
    }

    /// Returns the outstanding interests.
    #[must_use]
    pub fn interests(&self) -> &[Interest] {
        &self.interests
    }

    /// Adds an interest unless an equal one is outstanding.
    ///
    /// Returns true if the interest was added.
    pub fn add_interest(&mut self, interest: Interest) -> bool {
        if self.interests.contains(&interest) {
            return false;
        }
        self.interests.push(interest);
        true
    }

    /// Removes an interest. Returns true if it was outstanding.
    pub fn remove_interest(&mut self, interest: &Interest) -> bool {
        let before = self.interests.len();
        self.interests.retain(|i| i != interest);
        self.interests.len() != before
    }

    /// Replaces `satisfied` with `continuation`.
    pub fn renew(&mut self, satisfied: &Interest, continuation: Interest) {
        self.remove_interest(satisfied);
        self.add_interest(continuation);
    }

    /// Removes and returns every outstanding interest.
    pub fn take_interests(&mut self) -> Vec<Interest> {
        std::mem::take(&mut self.interests)
    }
}

/// Active enumeration requests keyed by prefix.
#[derive(Debug, Clone, Default)]
pub struct RequestRegistry {
    requests: IndexMap<ContentName, EnumerationRequest>,
}

impl RequestRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the request for `prefix`, creating it if absent.
    pub fn get_or_insert(&mut self, prefix: &ContentName) -> &mut EnumerationRequest {
        self.requests
            .entry(prefix.clone())
            .or_insert_with(|| EnumerationRequest::new(prefix.clone()))
    }

    /// Returns the request for `prefix`.
    #[must_use]
    pub fn get(&self, prefix: &ContentName) -> Option<&EnumerationRequest> {
        self.requests.get(prefix)
    }

    /// Returns the request for `prefix` mutably.
    pub fn get_mut(&mut self, prefix: &ContentName) -> Option<&mut EnumerationRequest> {
        self.requests.get_mut(prefix)
    }

    /// Removes and returns the request for `prefix`.
    pub fn remove(&mut self, prefix: &ContentName) -> Option<EnumerationRequest> {
        self.requests.shift_remove(prefix)
    }

    /// Returns true if `prefix` has a request.
    #[must_use]
    pub fn contains(&self, prefix: &ContentName) -> bool {
        self.requests.contains_key(prefix)
    }

    /// Returns the registered prefixes in registration order.
    pub fn prefixes(&self) -> impl Iterator<Item = &ContentName> {
        self.requests.keys()
    }

    /// Returns the number of requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns true if there are no requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Returns the number of outstanding interests across all requests.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.requests.values().map(|r| r.interests.len()).sum()
    }
}

/// Whether a prefix's last answer is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResponseState {
    /// The next matching query must recompute and publish an answer.
    Dirty,
    /// The last answer is current; matching queries are skipped.
    Clean,
}

impl ResponseState {
    /// Returns true if the state is `Dirty`.
    #[must_use]
    pub const fn is_dirty(self) -> bool {
        matches!(self, Self::Dirty)
    }
}

/// A prefix the responder has been asked about, and whether its answer is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledResponse {
    prefix: ContentName,
    state: ResponseState,
}

impl HandledResponse {
    /// Creates a dirty entry; every prefix is answered at least once.
    #[must_use]
    pub fn new(prefix: ContentName) -> Self {
        Self {
            prefix,
            state: ResponseState::Dirty,
        }
    }

    /// Returns the queried prefix.
    #[must_use]
    pub fn prefix(&self) -> &ContentName {
        &self.prefix
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ResponseState {
        self.state
    }
}

/// Handled responses keyed by prefix.
///
/// Entries are created on first query and live as long as the table.
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    responses: IndexMap<ContentName, HandledResponse>,
}

impl ResponseTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the right to answer `prefix`.
    ///
    /// Creates a dirty entry if none exists. A dirty entry is set clean and
    /// `true` returned; the caller must then answer, and call
    /// [`ResponseTable::mark_dirty`] if publishing fails. A clean entry
    /// returns `false`.
    pub fn claim(&mut self, prefix: &ContentName) -> bool {
        let entry = self
            .responses
            .entry(prefix.clone())
            .or_insert_with(|| HandledResponse::new(prefix.clone()));
        if entry.state.is_dirty() {
            entry.state = ResponseState::Clean;
            true
        } else {
            false
        }
    }

    /// Sets the entry for `prefix` dirty, if it exists.
    pub fn mark_dirty(&mut self, prefix: &ContentName) {
        if let Some(entry) = self.responses.get_mut(prefix) {
            entry.state = ResponseState::Dirty;
        }
    }

    /// Sets dirty every entry whose prefix is a prefix of `name`.
    ///
    /// Returns the number of entries that changed from clean to dirty.
    pub fn invalidate(&mut self, name: &ContentName) -> usize {
        let mut changed = 0;
        for entry in self.responses.values_mut() {
            if entry.prefix.is_prefix_of(name) && !entry.state.is_dirty() {
                entry.state = ResponseState::Dirty;
                changed += 1;
            }
        }
        changed
    }

    /// Returns the state for `prefix`, if it has been queried.
    #[must_use]
    pub fn state(&self, prefix: &ContentName) -> Option<ResponseState> {
        self.responses.get(prefix).map(HandledResponse::state)
    }

    /// Returns the number of handled prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Returns true if no prefix has been queried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Returns the number of dirty entries.
    #[must_use]
    pub fn dirty(&self) -> usize {
        self.responses
            .values()
            .filter(|r| r.state.is_dirty())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use ccn_name::ContentDigest;

    use super::*;

    fn name(s: &str) -> ContentName {
        ContentName::parse(s).unwrap()
    }

    #[test]
    fn request_adds_interest_once() {
        let mut request = EnumerationRequest::new(name("/a"));
        let interest = Interest::new(name("/a/%FE"));
        assert!(request.add_interest(interest.clone()));
        assert!(!request.add_interest(interest));
        assert_eq!(request.interests().len(), 1);
    }

    #[test]
    fn request_renew_replaces_interest() {
        let mut request = EnumerationRequest::new(name("/a"));
        let first = Interest::new(name("/a/%FE"));
        request.add_interest(first.clone());

        let next = first.continue_after(ContentDigest::from_bytes([7; 32]));
        request.renew(&first, next.clone());
        assert_eq!(request.interests(), &[next]);
    }

    #[test]
    fn registry_get_or_insert_is_idempotent() {
        let mut registry = RequestRegistry::new();
        registry
            .get_or_insert(&name("/a"))
            .add_interest(Interest::new(name("/a/%FE")));
        registry
            .get_or_insert(&name("/a"))
            .add_interest(Interest::new(name("/a/%FE")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.outstanding(), 1);
    }

    #[test]
    fn registry_remove_preserves_order() {
        let mut registry = RequestRegistry::new();
        for p in ["/a", "/b", "/c"] {
            registry.get_or_insert(&name(p));
        }
        assert!(registry.remove(&name("/b")).is_some());
        assert!(registry.remove(&name("/b")).is_none());

        let prefixes: Vec<_> = registry.prefixes().cloned().collect();
        assert_eq!(prefixes, vec![name("/a"), name("/c")]);
    }

    #[test]
    fn new_response_is_dirty_and_claimed_once() {
        let mut table = ResponseTable::new();
        assert_eq!(table.state(&name("/a")), None);

        assert!(table.claim(&name("/a")));
        assert_eq!(table.state(&name("/a")), Some(ResponseState::Clean));
        assert!(!table.claim(&name("/a")));
    }

    #[test]
    fn failed_publish_reverts_to_dirty() {
        let mut table = ResponseTable::new();
        assert!(table.claim(&name("/a")));
        table.mark_dirty(&name("/a"));
        assert_eq!(table.dirty(), 1);
        assert!(table.claim(&name("/a")));
    }

    #[test]
    fn invalidate_marks_covering_prefixes() {
        let mut table = ResponseTable::new();
        for p in ["/", "/a", "/a/b", "/c"] {
            table.claim(&name(p));
        }

        assert_eq!(table.invalidate(&name("/a/b/x")), 3);
        assert_eq!(table.state(&name("/")), Some(ResponseState::Dirty));
        assert_eq!(table.state(&name("/a")), Some(ResponseState::Dirty));
        assert_eq!(table.state(&name("/a/b")), Some(ResponseState::Dirty));
        assert_eq!(table.state(&name("/c")), Some(ResponseState::Clean));

        // Already dirty entries are not counted again
        assert_eq!(table.invalidate(&name("/a/b/y")), 0);
    }
}
