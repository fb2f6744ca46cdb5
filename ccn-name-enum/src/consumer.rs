//! Consumer side: enumerating the children of registered prefixes.

use std::sync::{Arc, Weak};

use ccn_name::{Collection, ContentDigest, ContentName, ContentObject, Interest};
use indexmap::IndexSet;
use parking_lot::Mutex;

use crate::config::EnumeratorConfig;
use crate::error::{EnumerationError, TransportError};
use crate::marker;
use crate::registry::RequestRegistry;
use crate::stats::EnumeratorStats;
use crate::transport::{InterestListener, NameEnumeratorListener, Renewal, Transport};

/// Enumerates the one-level children of registered prefixes.
///
/// For every registered prefix the enumerator keeps one discovery interest
/// outstanding. Each answer is decoded, passed to the application listener
/// with the marker stripped, and replaced by a continuation anchored past the
/// answer, so later answers keep arriving until the prefix is canceled.
///
/// Children delivered in one call may contain duplicates when several
/// producers answer the same prefix; enable
/// [`EnumeratorConfig::dedup_children`] to drop them.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use ccn_name::ContentName;
/// use ccn_name_enum::{NameEnumerator, SimulatedTransport};
///
/// let transport = Arc::new(SimulatedTransport::new());
/// let enumerator = NameEnumerator::new(
///     transport,
///     Arc::new(|prefix: &ContentName, names: Vec<ContentName>| {
///         println!("{prefix}: {names:?}");
///     }),
/// );
///
/// let prefix = ContentName::parse("/parc.com/files").unwrap();
/// enumerator.register_prefix(&prefix).unwrap();
/// assert!(enumerator.contains_registered_name(&prefix));
/// assert!(enumerator.cancel_prefix(&prefix).unwrap());
/// ```
#[derive(Clone)]
pub struct NameEnumerator {
    core: Arc<EnumeratorCore>,
}

struct EnumeratorCore {
    this: Weak<EnumeratorCore>,
    transport: Arc<dyn Transport>,
    listener: Arc<dyn NameEnumeratorListener>,
    config: EnumeratorConfig,
    state: Mutex<ConsumerState>,
}

#[derive(Default)]
struct ConsumerState {
    requests: RequestRegistry,
    stats: EnumeratorStats,
}

impl NameEnumerator {
    /// Creates an enumerator with the default configuration.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        listener: Arc<dyn NameEnumeratorListener>,
    ) -> Self {
        Self::with_config(transport, listener, EnumeratorConfig::default())
    }

    /// Creates an enumerator with a custom configuration.
    #[must_use]
    pub fn with_config(
        transport: Arc<dyn Transport>,
        listener: Arc<dyn NameEnumeratorListener>,
        config: EnumeratorConfig,
    ) -> Self {
        let core = Arc::new_cyclic(|this| EnumeratorCore {
            this: this.clone(),
            transport,
            listener,
            config,
            state: Mutex::new(ConsumerState::default()),
        });
        Self { core }
    }

    /// Creates an enumerator and registers `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `EnumerationError` if the prefix cannot be registered.
    pub fn with_prefix(
        prefix: &ContentName,
        transport: Arc<dyn Transport>,
        listener: Arc<dyn NameEnumeratorListener>,
    ) -> Result<Self, EnumerationError> {
        let enumerator = Self::new(transport, listener);
        enumerator.register_prefix(prefix)?;
        Ok(enumerator)
    }

    /// Starts enumerating `prefix`.
    ///
    /// Registering a prefix that already has a discovery interest
    /// outstanding does nothing. If the transport refuses the interest, the
    /// prefix stays registered without an outstanding interest, and a later
    /// call retries. If `prefix` is canceled while the interest is being
    /// expressed, the interest is withdrawn again.
    ///
    /// # Errors
    ///
    /// Returns `EnumerationError::ReservedMarker` if `prefix` contains the
    /// enumeration marker, `EnumerationError::InvalidName` if the marked name
    /// would be too long, and `EnumerationError::Transport` if the transport
    /// refuses the interest or fails to withdraw it after a concurrent cancel.
    pub fn register_prefix(&self, prefix: &ContentName) -> Result<(), EnumerationError> {
        if marker::is_marked(prefix) {
            return Err(EnumerationError::reserved_marker(prefix.to_string()));
        }

        let query = Interest::new(marker::mark(prefix)?)
            .with_order_preference(self.core.config.order_preference)
            .with_name_component_count(prefix.count() + 1);

        {
            let mut state = self.core.state.lock();
            let request = state.requests.get_or_insert(prefix);
            if !request.interests().is_empty() {
                log::debug!("[enumerator] {prefix} already has an outstanding query");
                return Ok(());
            }
            request.add_interest(query.clone());
        }

        log::debug!("[enumerator] expressing {query}");
        if let Err(e) = self
            .core
            .transport
            .express_interest(query.clone(), self.core.as_listener())
        {
            log::warn!("[enumerator] failed to express {query}: {e}");
            if let Some(request) = self.core.state.lock().requests.get_mut(prefix) {
                request.remove_interest(&query);
            }
            return Err(e.into());
        }

        // A cancel may have run while the interest was in flight
        if !self.core.state.lock().requests.contains(prefix) {
            log::debug!("[enumerator] {prefix} canceled meanwhile; withdrawing {query}");
            self.core
                .transport
                .cancel_interest(&query, &self.core.as_listener())?;
        }
        Ok(())
    }

    /// Stops enumerating `prefix`.
    ///
    /// Every outstanding interest is canceled and the prefix removed, even if
    /// some cancellations fail. Returns `Ok(false)` if `prefix` was not
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns the first `EnumerationError::Transport` raised while
    /// canceling. The prefix has been removed regardless.
    pub fn cancel_prefix(&self, prefix: &ContentName) -> Result<bool, EnumerationError> {
        let Some(mut request) = self.core.state.lock().requests.remove(prefix) else {
            return Ok(false);
        };

        let listener = self.core.as_listener();
        let mut first_error: Option<TransportError> = None;
        for interest in request.take_interests() {
            if let Err(e) = self.core.transport.cancel_interest(&interest, &listener) {
                log::warn!("[enumerator] failed to cancel {interest}: {e}");
                first_error.get_or_insert(e);
            }
        }
        log::debug!("[enumerator] canceled {prefix}");

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(true),
        }
    }

    /// Returns true if `name` is a registered prefix.
    #[must_use]
    pub fn contains_registered_name(&self, name: &ContentName) -> bool {
        self.core.state.lock().requests.contains(name)
    }

    /// Returns the registered prefixes in registration order.
    #[must_use]
    pub fn registered_prefixes(&self) -> Vec<ContentName> {
        self.core.state.lock().requests.prefixes().cloned().collect()
    }

    /// Returns the discovery interests outstanding for `prefix`.
    #[must_use]
    pub fn outstanding_interests(&self, prefix: &ContentName) -> Vec<Interest> {
        self.core
            .state
            .lock()
            .requests
            .get(prefix)
            .map(|r| r.interests().to_vec())
            .unwrap_or_default()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EnumeratorConfig {
        &self.core.config
    }

    /// Returns a snapshot of the enumerator's counters.
    #[must_use]
    pub fn stats(&self) -> EnumeratorStats {
        let state = self.core.state.lock();
        EnumeratorStats {
            registered_prefixes: state.requests.len(),
            outstanding_interests: state.requests.outstanding(),
            ..state.stats.clone()
        }
    }

    /// Returns the listener the enumerator expresses its interests with.
    ///
    /// Transports deliver answers through this handle.
    #[must_use]
    pub fn interest_listener(&self) -> Arc<dyn InterestListener> {
        self.core.as_listener()
    }
}

impl std::fmt::Debug for NameEnumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameEnumerator")
            .field("config", &self.core.config)
            .field("registered_prefixes", &self.registered_prefixes())
            .finish_non_exhaustive()
    }
}

impl EnumeratorCore {
    fn as_listener(&self) -> Arc<dyn InterestListener> {
        if let Some(core) = self.this.upgrade() {
            return core;
        }
        Arc::new(Detached)
    }

    /// Decodes every object, skipping the ones that fail.
    ///
    /// Returns the children found and the digest of the last decoded object,
    /// which the continuation anchors at.
    fn decode(&self, objects: &[ContentObject]) -> (Vec<ContentName>, Option<ContentDigest>) {
        let mut names = Vec::new();
        let mut seen = IndexSet::new();
        let mut last = None;
        let mut decoded = 0u64;
        let mut failures = 0u64;

        for object in objects {
            match Collection::from_content(object) {
                Ok(collection) => {
                    log::trace!(
                        "[enumerator] {} links in {}",
                        collection.len(),
                        object.name()
                    );
                    for name in collection.into_targets() {
                        if !self.config.dedup_children || seen.insert(name.clone()) {
                            names.push(name);
                        }
                    }
                    decoded += 1;
                    last = Some(object.digest());
                }
                Err(e) => {
                    log::warn!("[enumerator] skipping undecodable answer: {e}");
                    failures += 1;
                }
            }
        }

        let mut state = self.state.lock();
        state.stats.deliveries += 1;
        state.stats.decode_failures += failures;
        state.stats.messages_decoded += decoded;
        if decoded > 0 {
            state.stats.names_delivered += names.len() as u64;
        }
        (names, last)
    }
}

impl InterestListener for EnumeratorCore {
    fn handle_content(&self, objects: Vec<ContentObject>, interest: &Interest) -> Renewal {
        let Some(prefix) = marker::unmark(interest.name()) else {
            log::warn!(
                "[enumerator] content for {} lacks the enumeration marker; canceling",
                interest.name()
            );
            if let Err(e) = self
                .transport
                .cancel_interest(interest, &self.as_listener())
            {
                log::warn!("[enumerator] failed to cancel {interest}: {e}");
            }
            return Renewal::Stop;
        };

        let (names, anchor) = self.decode(&objects);
        let Some(anchor) = anchor else {
            let registered = self.state.lock().requests.contains(&prefix);
            return if registered {
                Renewal::Retain
            } else {
                Renewal::Stop
            };
        };

        self.listener.handle_names(&prefix, names);

        let continuation = interest.continue_after(anchor);
        let mut state = self.state.lock();
        match state.requests.get_mut(&prefix) {
            Some(request) => {
                request.renew(interest, continuation.clone());
                log::debug!("[enumerator] renewed {prefix} as {continuation}");
                Renewal::Continue(continuation)
            }
            None => {
                state.stats.continuations_discarded += 1;
                log::debug!("[enumerator] {prefix} is no longer registered; dropping continuation");
                Renewal::Stop
            }
        }
    }
}

/// Stand-in listener handed out once the enumerator is being dropped.
struct Detached;

impl InterestListener for Detached {
    fn handle_content(&self, _objects: Vec<ContentObject>, _interest: &Interest) -> Renewal {
        Renewal::Stop
    }
}
