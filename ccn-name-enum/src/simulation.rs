//! In-memory transport for tests, benches and single-process use.

use std::collections::VecDeque;
use std::sync::Arc;

use ccn_name::{Collection, ContentDigest, ContentName, ContentObject, Interest};
use parking_lot::Mutex;

use crate::config::SimulationConfig;
use crate::error::TransportError;
use crate::stats::TransportStats;
use crate::transport::{FilterListener, InterestListener, Renewal, Transport, same_listener};

/// Simulated interest/content transport.
///
/// Single-process, in-memory implementation that models a forwarder with a
/// pending interest table, a filter table and a bounded content store.
///
/// - An expressed interest is answered from the content store if possible,
///   and otherwise forwarded to every filter whose prefix covers it.
/// - A continuation interest is answered by the first matching object stored
///   after its anchor object.
/// - Published content is stored and delivered to every pending interest it
///   satisfies; the listener's [`Renewal`] decides what stays pending.
///
/// Pending interests are not forwarded again on their own; call
/// [`SimulatedTransport::reexpress_pending`] to model periodic re-expression.
///
/// # Thread Safety
///
/// State sits behind one `parking_lot::Mutex`. No listener is called while it
/// is held, so listeners may call back into the transport.
///
/// # Examples
///
/// ```
/// use ccn_name::{Collection, ContentName, Link};
/// use ccn_name_enum::{SimulatedTransport, Transport};
///
/// let transport = SimulatedTransport::new();
/// let answer: Collection = [Link::new(ContentName::parse("/x").unwrap())]
///     .into_iter()
///     .collect();
///
/// transport.put(&ContentName::parse("/a/%FE").unwrap(), &answer).unwrap();
/// assert_eq!(transport.stats().stored_objects, 1);
/// ```
pub struct SimulatedTransport {
    state: Mutex<SimState>,
    config: SimulationConfig,
}

struct Pending {
    interest: Interest,
    listener: Arc<dyn InterestListener>,
}

struct Filter {
    prefix: ContentName,
    listener: Arc<dyn FilterListener>,
}

/// Interests routed to one filter listener.
type Batch = (Arc<dyn FilterListener>, Vec<Interest>);

#[derive(Default)]
struct SimState {
    offline: bool,
    pending: Vec<Pending>,
    filters: Vec<Filter>,
    store: VecDeque<ContentObject>,
    stats: TransportStats,
}

impl SimState {
    fn check_online(&self) -> Result<(), TransportError> {
        if self.offline {
            Err(TransportError::Offline)
        } else {
            Ok(())
        }
    }

    /// Finds stored content for `interest`, honouring its anchor.
    fn lookup(&self, interest: &Interest) -> Option<ContentObject> {
        let start = interest.after().map_or(0, |anchor| {
            self.store
                .iter()
                .position(|o| o.digest() == anchor)
                .map_or(0, |i| i + 1)
        });
        self.store
            .iter()
            .skip(start)
            .find(|o| interest.matches(o))
            .cloned()
    }

    fn cache(&mut self, object: ContentObject, capacity: usize) {
        if capacity == 0 {
            return;
        }
        while self.store.len() >= capacity {
            self.store.pop_front();
        }
        self.store.push_back(object);
    }

    /// Groups `interests` by the filters that cover them.
    fn route(&mut self, interests: &[Interest]) -> Vec<Batch> {
        let mut batches = Vec::new();
        for filter in &self.filters {
            let batch: Vec<Interest> = interests
                .iter()
                .filter(|i| filter.prefix.is_prefix_of(i.name()))
                .cloned()
                .collect();
            if !batch.is_empty() {
                self.stats.interests_forwarded += batch.len() as u64;
                batches.push((Arc::clone(&filter.listener), batch));
            }
        }
        batches
    }
}

impl SimulatedTransport {
    /// Creates a transport with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a transport with the given configuration.
    #[must_use]
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            state: Mutex::new(SimState {
                offline: config.offline,
                ..SimState::default()
            }),
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Takes the transport offline or brings it back.
    ///
    /// While offline every operation fails with `TransportError::Offline`.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Returns true if the transport is offline.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.state.lock().offline
    }

    /// Returns the pending interests in arrival order.
    #[must_use]
    pub fn pending_interests(&self) -> Vec<Interest> {
        self.state
            .lock()
            .pending
            .iter()
            .map(|p| p.interest.clone())
            .collect()
    }

    /// Returns the stored content in arrival order.
    #[must_use]
    pub fn stored_objects(&self) -> Vec<ContentObject> {
        self.state.lock().store.iter().cloned().collect()
    }

    /// Forwards every pending interest to the filters again.
    ///
    /// Returns the number of interests forwarded.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Offline` if the transport is offline.
    pub fn reexpress_pending(&self) -> Result<usize, TransportError> {
        let interests: Vec<Interest> = {
            let state = self.state.lock();
            state.check_online()?;
            state.pending.iter().map(|p| p.interest.clone()).collect()
        };
        Ok(self.forward(&interests))
    }

    /// Returns a snapshot of the transport's counters.
    #[must_use]
    pub fn stats(&self) -> TransportStats {
        let state = self.state.lock();
        TransportStats {
            pending_interests: state.pending.len(),
            filters: state.filters.len(),
            stored_objects: state.store.len(),
            ..state.stats.clone()
        }
    }

    fn forward(&self, interests: &[Interest]) -> usize {
        let batches = self.state.lock().route(interests);
        let mut forwarded = 0;
        for (listener, batch) in batches {
            forwarded += batch.len();
            listener.handle_interests(batch);
        }
        forwarded
    }

    /// Answers `interest` from the store, following continuations, and
    /// leaves the final interest pending and forwarded.
    fn dispatch(&self, mut interest: Interest, listener: Arc<dyn InterestListener>) {
        loop {
            let found = {
                let mut state = self.state.lock();
                state.stats.interests_expressed += 1;
                let found = state.lookup(&interest);
                match found {
                    Some(_) => state.stats.deliveries += 1,
                    None => state.pending.push(Pending {
                        interest: interest.clone(),
                        listener: Arc::clone(&listener),
                    }),
                }
                found
            };

            let Some(object) = found else {
                self.forward(std::slice::from_ref(&interest));
                return;
            };

            log::trace!("[sim] {interest} satisfied from store by {}", object.name());
            match listener.handle_content(vec![object], &interest) {
                Renewal::Continue(next) => interest = next,
                Renewal::Retain => {
                    self.state.lock().pending.push(Pending { interest, listener });
                    return;
                }
                Renewal::Stop => return,
            }
        }
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimulatedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedTransport")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Transport for SimulatedTransport {
    fn express_interest(
        &self,
        interest: Interest,
        listener: Arc<dyn InterestListener>,
    ) -> Result<(), TransportError> {
        self.state.lock().check_online()?;
        self.dispatch(interest, listener);
        Ok(())
    }

    fn cancel_interest(
        &self,
        interest: &Interest,
        listener: &Arc<dyn InterestListener>,
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.check_online()?;
        let before = state.pending.len();
        state
            .pending
            .retain(|p| !(p.interest == *interest && same_listener(&p.listener, listener)));
        let removed = before - state.pending.len();
        state.stats.interests_canceled += removed as u64;
        Ok(())
    }

    fn register_filter(
        &self,
        prefix: &ContentName,
        listener: Arc<dyn FilterListener>,
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.check_online()?;
        let known = state
            .filters
            .iter()
            .any(|f| f.prefix == *prefix && same_listener(&f.listener, &listener));
        if !known {
            state.filters.push(Filter {
                prefix: prefix.clone(),
                listener,
            });
        }
        Ok(())
    }

    fn put(
        &self,
        name: &ContentName,
        collection: &Collection,
    ) -> Result<ContentDigest, TransportError> {
        let object = collection
            .to_content(name.clone())
            .map_err(|e| TransportError::io(e.to_string()))?;
        let digest = object.digest();

        let satisfied: Vec<Pending> = {
            let mut state = self.state.lock();
            state.check_online()?;
            state.cache(object.clone(), self.config.content_store_capacity);
            state.stats.objects_put += 1;

            let (satisfied, pending): (Vec<Pending>, Vec<Pending>) = std::mem::take(&mut state.pending)
                .into_iter()
                .partition(|p| p.interest.matches(&object));
            state.pending = pending;
            state.stats.deliveries += satisfied.len() as u64;
            satisfied
        };
        log::trace!("[sim] put {name} ({digest}) to {} interests", satisfied.len());

        for Pending { interest, listener } in satisfied {
            match listener.handle_content(vec![object.clone()], &interest) {
                Renewal::Continue(next) => self.dispatch(next, listener),
                Renewal::Retain => self.state.lock().pending.push(Pending { interest, listener }),
                Renewal::Stop => {}
            }
        }
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use ccn_name::Link;

    use super::*;

    fn name(s: &str) -> ContentName {
        ContentName::parse(s).unwrap()
    }

    fn collection(children: &[&str]) -> Collection {
        children.iter().map(|c| Link::new(name(c))).collect()
    }

    /// Records deliveries and answers with a fixed renewal policy.
    struct Recorder {
        received: Mutex<Vec<(Interest, ContentObject)>>,
        renew: bool,
    }

    impl Recorder {
        fn new(renew: bool) -> Arc<Self> {
            Arc::new(Self {
                received: Mutex::new(Vec::new()),
                renew,
            })
        }
    }

    impl InterestListener for Recorder {
        fn handle_content(&self, objects: Vec<ContentObject>, interest: &Interest) -> Renewal {
            let last = objects[objects.len() - 1].digest();
            for object in objects {
                self.received.lock().push((interest.clone(), object));
            }
            if self.renew {
                Renewal::Continue(interest.continue_after(last))
            } else {
                Renewal::Stop
            }
        }
    }

    #[derive(Default)]
    struct FilterRecorder {
        seen: Mutex<Vec<Interest>>,
    }

    impl FilterListener for FilterRecorder {
        fn handle_interests(&self, interests: Vec<Interest>) -> usize {
            let n = interests.len();
            self.seen.lock().extend(interests);
            n
        }
    }

    #[test]
    fn interest_waits_then_receives_put() {
        let transport = SimulatedTransport::new();
        let recorder = Recorder::new(false);
        transport
            .express_interest(Interest::new(name("/a/%FE")), recorder.clone())
            .unwrap();
        assert_eq!(transport.stats().pending_interests(), 1);

        transport.put(&name("/a/%FE"), &collection(&["/x"])).unwrap();

        assert_eq!(recorder.received.lock().len(), 1);
        assert_eq!(transport.stats().pending_interests(), 0);
    }

    #[test]
    fn stored_content_answers_new_interest() {
        let transport = SimulatedTransport::new();
        transport.put(&name("/a/%FE"), &collection(&["/x"])).unwrap();

        let recorder = Recorder::new(false);
        transport
            .express_interest(Interest::new(name("/a/%FE")), recorder.clone())
            .unwrap();
        assert_eq!(recorder.received.lock().len(), 1);
    }

    #[test]
    fn continuation_walks_the_store_in_order() {
        let transport = SimulatedTransport::new();
        let first = transport.put(&name("/a/%FE"), &collection(&["/x"])).unwrap();
        let second = transport.put(&name("/a/%FE"), &collection(&["/y"])).unwrap();

        let recorder = Recorder::new(true);
        transport
            .express_interest(Interest::new(name("/a/%FE")), recorder.clone())
            .unwrap();

        let received = recorder.received.lock();
        let digests: Vec<_> = received.iter().map(|(_, o)| o.digest()).collect();
        assert_eq!(digests, vec![first, second]);
        assert_eq!(received[1].0.after(), Some(first));

        // The last continuation stays pending
        let pending = transport.pending_interests();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].after(), Some(second));
    }

    #[test]
    fn unanswered_interest_is_forwarded_to_covering_filters() {
        let transport = SimulatedTransport::new();
        let covering = Arc::new(FilterRecorder::default());
        let elsewhere = Arc::new(FilterRecorder::default());
        transport.register_filter(&name("/a"), covering.clone()).unwrap();
        transport.register_filter(&name("/b"), elsewhere.clone()).unwrap();

        transport
            .express_interest(Interest::new(name("/a/%FE")), Recorder::new(false))
            .unwrap();

        assert_eq!(covering.seen.lock().len(), 1);
        assert!(elsewhere.seen.lock().is_empty());
        assert_eq!(transport.stats().interests_forwarded, 1);
    }

    #[test]
    fn reexpress_forwards_pending_again() {
        let transport = SimulatedTransport::new();
        let filter = Arc::new(FilterRecorder::default());
        transport
            .express_interest(Interest::new(name("/a/%FE")), Recorder::new(false))
            .unwrap();
        transport.register_filter(&name("/a"), filter.clone()).unwrap();
        assert!(filter.seen.lock().is_empty());

        assert_eq!(transport.reexpress_pending().unwrap(), 1);
        assert_eq!(filter.seen.lock().len(), 1);
    }

    #[test]
    fn cancel_removes_only_that_listener() {
        let transport = SimulatedTransport::new();
        let interest = Interest::new(name("/a/%FE"));
        let one: Arc<dyn InterestListener> = Recorder::new(false);
        let two: Arc<dyn InterestListener> = Recorder::new(false);
        transport.express_interest(interest.clone(), one.clone()).unwrap();
        transport.express_interest(interest.clone(), two.clone()).unwrap();

        transport.cancel_interest(&interest, &one).unwrap();
        assert_eq!(transport.pending_interests(), vec![interest]);
        assert_eq!(transport.stats().interests_canceled, 1);
    }

    #[test]
    fn content_store_evicts_oldest() {
        let transport =
            SimulatedTransport::with_config(SimulationConfig::new().with_content_store_capacity(2));
        for child in ["/x", "/y", "/z"] {
            transport.put(&name("/a/%FE"), &collection(&[child])).unwrap();
        }
        let stored = transport.stored_objects();
        assert_eq!(stored.len(), 2);
        assert_eq!(
            Collection::from_content(&stored[0]).unwrap(),
            collection(&["/y"])
        );
    }

    #[test]
    fn offline_fails_every_operation() {
        let transport = SimulatedTransport::with_config(SimulationConfig::new().with_offline(true));
        let listener: Arc<dyn InterestListener> = Recorder::new(false);
        let interest = Interest::new(name("/a/%FE"));

        assert_eq!(
            transport.express_interest(interest.clone(), listener.clone()),
            Err(TransportError::Offline)
        );
        assert_eq!(
            transport.cancel_interest(&interest, &listener),
            Err(TransportError::Offline)
        );
        assert!(transport
            .register_filter(&name("/a"), Arc::new(FilterRecorder::default()))
            .is_err());
        assert!(transport.put(&name("/a/%FE"), &collection(&["/x"])).is_err());
        assert!(transport.reexpress_pending().is_err());

        transport.set_offline(false);
        assert!(!transport.is_offline());
        transport.express_interest(interest, listener).unwrap();
    }
}
