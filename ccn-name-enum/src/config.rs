//! Configuration for the enumeration engines and the simulated transport.

use ccn_name::OrderPreference;

/// Configuration for a [`NameEnumerator`](crate::NameEnumerator).
#[derive(Debug, Clone)]
pub struct EnumeratorConfig {
    /// Order preference placed on discovery queries.
    ///
    /// Default: `Lexicographic`
    pub order_preference: OrderPreference,

    /// Whether to drop duplicate children across the messages of one delivery.
    ///
    /// Several producers may answer the same prefix, so one delivery can name
    /// a child more than once. By default those duplicates reach the
    /// application unchanged.
    /// Default: false
    pub dedup_children: bool,
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        Self {
            order_preference: OrderPreference::Lexicographic,
            dedup_children: false,
        }
    }
}

impl EnumeratorConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order preference for discovery queries.
    #[must_use]
    pub const fn with_order_preference(mut self, order_preference: OrderPreference) -> Self {
        self.order_preference = order_preference;
        self
    }

    /// Enables or disables duplicate suppression within one delivery.
    #[must_use]
    pub const fn with_dedup_children(mut self, dedup: bool) -> Self {
        self.dedup_children = dedup;
        self
    }
}

/// Configuration for the [`SimulatedTransport`](crate::SimulatedTransport).
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Maximum number of content objects kept in the content store.
    ///
    /// The oldest object is evicted first.
    /// Default: 1024
    pub content_store_capacity: usize,

    /// Whether the transport starts without a network connection.
    ///
    /// Default: false
    pub offline: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            content_store_capacity: 1024,
            offline: false,
        }
    }
}

impl SimulationConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content store capacity.
    #[must_use]
    pub const fn with_content_store_capacity(mut self, capacity: usize) -> Self {
        self.content_store_capacity = capacity;
        self
    }

    /// Starts the transport offline or online.
    #[must_use]
    pub const fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}
