//! Producer side: answering discovery queries from registered names.

use std::sync::{Arc, Weak};

use ccn_name::{Collection, ContentName, Interest, Link};
use indexmap::IndexSet;
use parking_lot::Mutex;

use crate::error::EnumerationError;
use crate::marker;
use crate::registry::{ResponseState, ResponseTable};
use crate::stats::ResponderStats;
use crate::transport::{FilterListener, Transport};

/// Answers discovery queries for registered namespaces.
///
/// Namespaces are registered as transport filters; discovery queries under
/// them are answered with the one-level children of the queried prefix,
/// drawn from the names registered for responses. Each prefix is answered
/// once, and again only after a newly registered name falls under it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use ccn_name::ContentName;
/// use ccn_name_enum::{NameEnumerationResponder, ResponseState, SimulatedTransport};
///
/// let transport = Arc::new(SimulatedTransport::new());
/// let responder = NameEnumerationResponder::new(transport);
///
/// responder.register_namespace(&ContentName::parse("/parc.com").unwrap()).unwrap();
/// responder.register_name_for_responses(&ContentName::parse("/parc.com/files/a.txt").unwrap());
///
/// assert!(responder.contains_registered_name(&ContentName::parse("/parc.com/files/a.txt").unwrap()));
/// assert_eq!(responder.response_state(&ContentName::parse("/parc.com").unwrap()), None);
/// ```
#[derive(Clone)]
pub struct NameEnumerationResponder {
    core: Arc<ResponderCore>,
}

struct ResponderCore {
    this: Weak<ResponderCore>,
    transport: Arc<dyn Transport>,
    state: Mutex<ResponderState>,
}

#[derive(Default)]
struct ResponderState {
    namespaces: IndexSet<ContentName>,
    names: IndexSet<ContentName>,
    responses: ResponseTable,
    answers_published: u64,
    publish_failures: u64,
    clean_skips: u64,
}

impl NameEnumerationResponder {
    /// Creates a responder publishing through `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let core = Arc::new_cyclic(|this| ResponderCore {
            this: this.clone(),
            transport,
            state: Mutex::new(ResponderState::default()),
        });
        Self { core }
    }

    /// Accepts discovery queries under `name`.
    ///
    /// Registers `name` as a transport filter the first time it is seen. If
    /// the transport refuses the filter, the namespace is forgotten so a
    /// later call can retry.
    ///
    /// # Errors
    ///
    /// Returns `EnumerationError::ReservedMarker` if `name` contains the
    /// enumeration marker, and `EnumerationError::Transport` if the filter
    /// cannot be registered.
    pub fn register_namespace(&self, name: &ContentName) -> Result<(), EnumerationError> {
        if marker::is_marked(name) {
            return Err(EnumerationError::reserved_marker(name.to_string()));
        }
        if !self.core.state.lock().namespaces.insert(name.clone()) {
            return Ok(());
        }

        if let Err(e) = self
            .core
            .transport
            .register_filter(name, self.core.as_listener())
        {
            log::warn!("[responder] failed to register namespace {name}: {e}");
            self.core.state.lock().namespaces.shift_remove(name);
            return Err(e.into());
        }
        log::debug!("[responder] registered namespace {name}");
        Ok(())
    }

    /// Exposes `name` as an enumerable child of its prefixes.
    ///
    /// No filter is registered; an enclosing namespace is expected to cover
    /// `name`. Every answered prefix of `name` is marked dirty, including
    /// when `name` was already registered. The root name and names containing
    /// the enumeration marker are ignored with a warning.
    pub fn register_name_for_responses(&self, name: &ContentName) {
        if name.is_root() || marker::is_marked(name) {
            log::warn!("[responder] refusing to register {name} for responses");
            return;
        }

        let mut state = self.core.state.lock();
        if state.names.insert(name.clone()) {
            log::trace!("[responder] registered {name} for responses");
        }
        let invalidated = state.responses.invalidate(name);
        if invalidated > 0 {
            log::debug!("[responder] {name} invalidated {invalidated} answered prefixes");
        }
    }

    /// Returns true if `name` has been registered for responses.
    #[must_use]
    pub fn contains_registered_name(&self, name: &ContentName) -> bool {
        self.core.state.lock().names.contains(name)
    }

    /// Returns the names registered for responses, in registration order.
    #[must_use]
    pub fn registered_names(&self) -> Vec<ContentName> {
        self.core.state.lock().names.iter().cloned().collect()
    }

    /// Returns the registered namespaces, in registration order.
    #[must_use]
    pub fn namespaces(&self) -> Vec<ContentName> {
        self.core.state.lock().namespaces.iter().cloned().collect()
    }

    /// Returns whether the answer for `prefix` is current.
    ///
    /// `None` means `prefix` has never been queried.
    #[must_use]
    pub fn response_state(&self, prefix: &ContentName) -> Option<ResponseState> {
        self.core.state.lock().responses.state(prefix)
    }

    /// Returns a snapshot of the responder's counters.
    #[must_use]
    pub fn stats(&self) -> ResponderStats {
        let state = self.core.state.lock();
        ResponderStats {
            namespaces: state.namespaces.len(),
            registered_names: state.names.len(),
            handled_prefixes: state.responses.len(),
            dirty_prefixes: state.responses.dirty(),
            answers_published: state.answers_published,
            publish_failures: state.publish_failures,
            clean_skips: state.clean_skips,
        }
    }

    /// Returns the listener the responder registers its filters with.
    #[must_use]
    pub fn filter_listener(&self) -> Arc<dyn FilterListener> {
        self.core.as_listener()
    }
}

impl std::fmt::Debug for NameEnumerationResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameEnumerationResponder")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Builds the answer for `prefix`: the distinct next components of every
/// name strictly under it, in registration order.
fn children_of(names: &IndexSet<ContentName>, prefix: &ContentName) -> Collection {
    let mut answer = Collection::new();
    for name in names {
        if !prefix.is_prefix_of(name) {
            continue;
        }
        if let Some(child) = name.component(prefix.count()) {
            answer.add_unique(Link::new(ContentName::from(child.clone())));
        }
    }
    answer
}

impl ResponderCore {
    fn as_listener(&self) -> Arc<dyn FilterListener> {
        if let Some(core) = self.this.upgrade() {
            return core;
        }
        Arc::new(Detached)
    }

    fn answer(&self, prefix: &ContentName) {
        let answer = {
            let mut state = self.state.lock();
            if !state.responses.claim(prefix) {
                state.clean_skips += 1;
                log::debug!("[responder] answer for {prefix} is current; skipping");
                return;
            }
            children_of(&state.names, prefix)
        };

        if answer.is_empty() {
            log::debug!("[responder] nothing registered under {prefix}");
            return;
        }

        let published = marker::mark(prefix)
            .map_err(EnumerationError::from)
            .and_then(|name| {
                self.transport
                    .put(&name, &answer)
                    .map_err(EnumerationError::from)
            });

        let mut state = self.state.lock();
        match published {
            Ok(digest) => {
                state.answers_published += 1;
                log::debug!(
                    "[responder] published {} children of {prefix} ({digest})",
                    answer.len()
                );
            }
            Err(e) => {
                state.publish_failures += 1;
                state.responses.mark_dirty(prefix);
                log::warn!("[responder] failed to publish answer for {prefix}: {e}");
            }
        }
    }
}

impl FilterListener for ResponderCore {
    fn handle_interests(&self, interests: Vec<Interest>) -> usize {
        let mut processed = 0;
        for interest in &interests {
            let Some(prefix) = marker::unmark(interest.name()) else {
                log::trace!("[responder] ignoring {interest}");
                continue;
            };
            self.answer(&prefix);
            processed += 1;
        }
        processed
    }
}

/// Stand-in listener handed out once the responder is being dropped.
struct Detached;

impl FilterListener for Detached {
    fn handle_interests(&self, _interests: Vec<Interest>) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use ccn_name::ContentDigest;

    use super::*;
    use crate::error::TransportError;
    use crate::transport::InterestListener;

    /// Records filters and puts, and fails on demand.
    #[derive(Default)]
    struct RecordingTransport {
        filters: Mutex<Vec<ContentName>>,
        puts: Mutex<Vec<(ContentName, Collection)>>,
        fail_filter: Mutex<bool>,
        fail_put: Mutex<bool>,
    }

    impl Transport for RecordingTransport {
        fn express_interest(
            &self,
            _interest: Interest,
            _listener: Arc<dyn InterestListener>,
        ) -> Result<(), TransportError> {
            Ok(())
        }

        fn cancel_interest(
            &self,
            _interest: &Interest,
            _listener: &Arc<dyn InterestListener>,
        ) -> Result<(), TransportError> {
            Ok(())
        }

        fn register_filter(
            &self,
            prefix: &ContentName,
            _listener: Arc<dyn FilterListener>,
        ) -> Result<(), TransportError> {
            if *self.fail_filter.lock() {
                return Err(TransportError::Offline);
            }
            self.filters.lock().push(prefix.clone());
            Ok(())
        }

        fn put(
            &self,
            name: &ContentName,
            collection: &Collection,
        ) -> Result<ContentDigest, TransportError> {
            if *self.fail_put.lock() {
                return Err(TransportError::signing("no key"));
            }
            self.puts.lock().push((name.clone(), collection.clone()));
            let object = collection
                .to_content(name.clone())
                .map_err(|e| TransportError::io(e.to_string()))?;
            Ok(object.digest())
        }
    }

    fn name(s: &str) -> ContentName {
        ContentName::parse(s).unwrap()
    }

    fn query(prefix: &str) -> Interest {
        let prefix = name(prefix);
        Interest::new(marker::mark(&prefix).unwrap()).with_name_component_count(prefix.count() + 1)
    }

    fn setup() -> (Arc<RecordingTransport>, NameEnumerationResponder) {
        let _ = env_logger::builder().is_test(true).try_init();
        let transport = Arc::new(RecordingTransport::default());
        let responder = NameEnumerationResponder::new(transport.clone());
        (transport, responder)
    }

    fn children(collection: &Collection) -> Vec<String> {
        collection
            .links()
            .iter()
            .map(|l| l.target().to_string())
            .collect()
    }

    #[test]
    fn namespace_registers_filter_once() {
        let (transport, responder) = setup();
        responder.register_namespace(&name("/a")).unwrap();
        responder.register_namespace(&name("/a")).unwrap();

        assert_eq!(transport.filters.lock().as_slice(), &[name("/a")]);
        assert_eq!(responder.namespaces(), vec![name("/a")]);
    }

    #[test]
    fn namespace_failure_rolls_back() {
        let (transport, responder) = setup();
        *transport.fail_filter.lock() = true;
        assert!(responder.register_namespace(&name("/a")).is_err());
        assert!(responder.namespaces().is_empty());

        *transport.fail_filter.lock() = false;
        responder.register_namespace(&name("/a")).unwrap();
        assert_eq!(transport.filters.lock().len(), 1);
    }

    #[test]
    fn marked_namespace_is_an_error() {
        let (transport, responder) = setup();
        let err = responder.register_namespace(&name("/a/%FE")).unwrap_err();
        assert!(matches!(err, EnumerationError::ReservedMarker { .. }));
        assert!(transport.filters.lock().is_empty());
    }

    #[test]
    fn refused_names_are_ignored() {
        let (_, responder) = setup();
        responder.register_name_for_responses(&ContentName::root());
        responder.register_name_for_responses(&name("/a/%FE/x"));
        assert!(responder.registered_names().is_empty());
    }

    #[test]
    fn answer_deduplicates_children() {
        let (transport, responder) = setup();
        responder.register_name_for_responses(&name("/a/x"));
        responder.register_name_for_responses(&name("/a/y"));
        responder.register_name_for_responses(&name("/a/x"));
        responder.register_name_for_responses(&name("/a/x/deeper"));

        assert_eq!(responder.filter_listener().handle_interests(vec![query("/a")]), 1);

        let puts = transport.puts.lock();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, name("/a/%FE"));
        assert_eq!(children(&puts[0].1), vec!["/x", "/y"]);
        assert_eq!(responder.response_state(&name("/a")), Some(ResponseState::Clean));
    }

    #[test]
    fn answer_follows_registration_order() {
        let (transport, responder) = setup();
        for n in ["/a/c", "/a/b", "/a/a"] {
            responder.register_name_for_responses(&name(n));
        }
        responder.filter_listener().handle_interests(vec![query("/a")]);
        assert_eq!(children(&transport.puts.lock()[0].1), vec!["/c", "/b", "/a"]);
    }

    #[test]
    fn prefix_itself_is_not_a_child() {
        let (transport, responder) = setup();
        responder.register_name_for_responses(&name("/a"));
        responder.filter_listener().handle_interests(vec![query("/a")]);

        assert!(transport.puts.lock().is_empty());
        assert_eq!(responder.response_state(&name("/a")), Some(ResponseState::Clean));
    }

    #[test]
    fn empty_answer_marks_clean_without_publishing() {
        let (transport, responder) = setup();
        let listener = responder.filter_listener();
        listener.handle_interests(vec![query("/a")]);
        listener.handle_interests(vec![query("/a")]);

        assert!(transport.puts.lock().is_empty());
        assert_eq!(responder.response_state(&name("/a")), Some(ResponseState::Clean));
        assert_eq!(responder.stats().clean_skips(), 1);
    }

    #[test]
    fn new_name_invalidates_answered_prefix() {
        let (transport, responder) = setup();
        let listener = responder.filter_listener();
        responder.register_name_for_responses(&name("/a/x"));
        listener.handle_interests(vec![query("/a")]);

        responder.register_name_for_responses(&name("/a/z"));
        assert_eq!(responder.response_state(&name("/a")), Some(ResponseState::Dirty));

        listener.handle_interests(vec![query("/a")]);
        let puts = transport.puts.lock();
        assert_eq!(puts.len(), 2);
        assert_eq!(children(&puts[1].1), vec!["/x", "/z"]);
    }

    #[test]
    fn duplicate_registration_still_invalidates() {
        let (_, responder) = setup();
        responder.register_name_for_responses(&name("/a/x"));
        responder.filter_listener().handle_interests(vec![query("/a")]);
        responder.register_name_for_responses(&name("/a/x"));
        assert_eq!(responder.response_state(&name("/a")), Some(ResponseState::Dirty));
    }

    #[test]
    fn unrelated_name_leaves_prefix_clean() {
        let (_, responder) = setup();
        responder.filter_listener().handle_interests(vec![query("/a")]);
        responder.register_name_for_responses(&name("/b/x"));
        assert_eq!(responder.response_state(&name("/a")), Some(ResponseState::Clean));
    }

    #[test]
    fn publish_failure_leaves_entry_dirty() {
        let (transport, responder) = setup();
        let listener = responder.filter_listener();
        responder.register_name_for_responses(&name("/a/x"));

        *transport.fail_put.lock() = true;
        listener.handle_interests(vec![query("/a")]);
        assert_eq!(responder.response_state(&name("/a")), Some(ResponseState::Dirty));
        assert_eq!(responder.stats().publish_failures, 1);

        *transport.fail_put.lock() = false;
        listener.handle_interests(vec![query("/a")]);
        assert_eq!(transport.puts.lock().len(), 1);
        assert_eq!(responder.response_state(&name("/a")), Some(ResponseState::Clean));
    }

    #[test]
    fn second_query_in_batch_is_skipped() {
        let (transport, responder) = setup();
        responder.register_name_for_responses(&name("/a/x"));
        let processed = responder
            .filter_listener()
            .handle_interests(vec![query("/a"), query("/a")]);

        assert_eq!(processed, 2);
        assert_eq!(transport.puts.lock().len(), 1);
        assert_eq!(responder.stats().clean_skips(), 1);
    }

    #[test]
    fn unmarked_interest_is_ignored() {
        let (transport, responder) = setup();
        responder.register_name_for_responses(&name("/a/x"));
        let processed = responder
            .filter_listener()
            .handle_interests(vec![Interest::new(name("/a"))]);

        assert_eq!(processed, 0);
        assert!(transport.puts.lock().is_empty());
        assert_eq!(responder.response_state(&name("/a")), None);
    }

    #[test]
    fn root_prefix_lists_top_level() {
        let (transport, responder) = setup();
        responder.register_name_for_responses(&name("/a/x"));
        responder.register_name_for_responses(&name("/b"));
        responder.filter_listener().handle_interests(vec![query("/")]);
        assert_eq!(children(&transport.puts.lock()[0].1), vec!["/a", "/b"]);
    }

    #[test]
    fn stats_snapshot() {
        let (_, responder) = setup();
        responder.register_namespace(&name("/a")).unwrap();
        responder.register_name_for_responses(&name("/a/x"));
        responder.filter_listener().handle_interests(vec![query("/a"), query("/b")]);

        let stats = responder.stats();
        assert_eq!(stats.namespaces, 1);
        assert_eq!(stats.registered_names, 1);
        assert_eq!(stats.handled_prefixes, 2);
        assert_eq!(stats.dirty_prefixes, 0);
        assert_eq!(stats.answers_published(), 1);
    }
}
