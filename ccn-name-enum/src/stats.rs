//! Statistics snapshots for the engines and the simulated transport.

/// Snapshot of a [`NameEnumerator`](crate::NameEnumerator).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumeratorStats {
    /// Number of registered prefixes.
    pub registered_prefixes: usize,
    /// Number of discovery interests outstanding across all prefixes.
    pub outstanding_interests: usize,
    /// Number of content deliveries handled.
    pub deliveries: u64,
    /// Number of answer messages decoded.
    pub messages_decoded: u64,
    /// Number of answer messages that failed to decode.
    pub decode_failures: u64,
    /// Number of child names passed to the application.
    pub names_delivered: u64,
    /// Number of continuations discarded because the prefix was gone.
    pub continuations_discarded: u64,
}

impl EnumeratorStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered prefixes.
    #[must_use]
    pub const fn registered_prefixes(&self) -> usize {
        self.registered_prefixes
    }

    /// Returns the number of outstanding interests.
    #[must_use]
    pub const fn outstanding_interests(&self) -> usize {
        self.outstanding_interests
    }

    /// Returns the number of child names delivered.
    #[must_use]
    pub const fn names_delivered(&self) -> u64 {
        self.names_delivered
    }
}

/// Snapshot of a [`NameEnumerationResponder`](crate::NameEnumerationResponder).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponderStats {
    /// Number of registered namespaces.
    pub namespaces: usize,
    /// Number of names registered for responses.
    pub registered_names: usize,
    /// Number of prefixes that have been queried.
    pub handled_prefixes: usize,
    /// Number of handled prefixes awaiting a fresh answer.
    pub dirty_prefixes: usize,
    /// Number of answers published.
    pub answers_published: u64,
    /// Number of answers whose publication failed.
    pub publish_failures: u64,
    /// Number of queries skipped because the answer was current.
    pub clean_skips: u64,
}

impl ResponderStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of answers published.
    #[must_use]
    pub const fn answers_published(&self) -> u64 {
        self.answers_published
    }

    /// Returns the number of queries skipped as clean.
    #[must_use]
    pub const fn clean_skips(&self) -> u64 {
        self.clean_skips
    }
}

/// Snapshot of a [`SimulatedTransport`](crate::SimulatedTransport).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportStats {
    /// Interests currently pending.
    pub pending_interests: usize,
    /// Registered filters.
    pub filters: usize,
    /// Objects in the content store.
    pub stored_objects: usize,
    /// Interests expressed, including re-expressed continuations.
    pub interests_expressed: u64,
    /// Interests canceled.
    pub interests_canceled: u64,
    /// Interests forwarded to filter listeners.
    pub interests_forwarded: u64,
    /// Objects published.
    pub objects_put: u64,
    /// Content deliveries to interest listeners.
    pub deliveries: u64,
}

impl TransportStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pending interests.
    #[must_use]
    pub const fn pending_interests(&self) -> usize {
        self.pending_interests
    }

    /// Returns the number of objects published.
    #[must_use]
    pub const fn objects_put(&self) -> u64 {
        self.objects_put
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats() {
        assert_eq!(EnumeratorStats::new().names_delivered(), 0);
        assert_eq!(ResponderStats::new().answers_published(), 0);
        assert_eq!(TransportStats::new().pending_interests(), 0);
    }
}
