//! Transport seam and listener traits.

use std::sync::Arc;

use ccn_name::{Collection, ContentDigest, ContentName, ContentObject, Interest};

use crate::TransportError;

/// What the transport should do with an interest after delivering content to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renewal {
    /// Replace the satisfied interest with this continuation.
    Continue(Interest),
    /// Keep the satisfied interest outstanding as is.
    Retain,
    /// Drop the satisfied interest.
    Stop,
}

impl Renewal {
    /// Returns the continuation interest, if any.
    #[must_use]
    pub const fn continuation(&self) -> Option<&Interest> {
        match self {
            Self::Continue(interest) => Some(interest),
            Self::Retain | Self::Stop => None,
        }
    }
}

/// Receives content delivered for an expressed interest.
pub trait InterestListener: Send + Sync {
    /// Handles content objects that satisfy `interest`.
    ///
    /// The returned [`Renewal`] tells the transport what replaces `interest`
    /// in its pending interest table.
    fn handle_content(&self, objects: Vec<ContentObject>, interest: &Interest) -> Renewal;
}

/// Receives interests that arrive under a registered filter prefix.
pub trait FilterListener: Send + Sync {
    /// Handles a batch of incoming interests.
    ///
    /// Returns the number of interests processed. The count is informational.
    fn handle_interests(&self, interests: Vec<Interest>) -> usize;
}

/// Application callback receiving enumerated child names.
///
/// Implemented for any `Fn(&ContentName, Vec<ContentName>) + Send + Sync`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use ccn_name::ContentName;
/// use ccn_name_enum::NameEnumeratorListener;
///
/// let listener: Arc<dyn NameEnumeratorListener> =
///     Arc::new(|prefix: &ContentName, names: Vec<ContentName>| {
///         println!("{prefix}: {} children", names.len());
///     });
/// # let _ = listener;
/// ```
pub trait NameEnumeratorListener: Send + Sync {
    /// Handles the children found under `prefix`.
    ///
    /// `prefix` never carries the enumeration marker. Each child is a
    /// one-component name.
    fn handle_names(&self, prefix: &ContentName, names: Vec<ContentName>);
}

impl<F> NameEnumeratorListener for F
where
    F: Fn(&ContentName, Vec<ContentName>) + Send + Sync,
{
    fn handle_names(&self, prefix: &ContentName, names: Vec<ContentName>) {
        self(prefix, names);
    }
}

/// Interest/content transport operations.
///
/// This trait is the only way the enumeration engines reach the network.
/// Implementations may talk to a forwarding daemon or, as
/// [`SimulatedTransport`](crate::SimulatedTransport) does, deliver in-process.
///
/// # Async Considerations
///
/// Methods are synchronous. An implementation backed by an async client may
/// deliver content from its own threads; the listeners are `Send + Sync` for
/// that reason.
pub trait Transport: Send + Sync {
    /// Expresses `interest`, delivering matching content to `listener`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the interest cannot be sent.
    fn express_interest(
        &self,
        interest: Interest,
        listener: Arc<dyn InterestListener>,
    ) -> Result<(), TransportError>;

    /// Withdraws an interest previously expressed with `listener`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the cancellation cannot be sent.
    fn cancel_interest(
        &self,
        interest: &Interest,
        listener: &Arc<dyn InterestListener>,
    ) -> Result<(), TransportError>;

    /// Registers `listener` to receive interests under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the filter cannot be registered.
    fn register_filter(
        &self,
        prefix: &ContentName,
        listener: Arc<dyn FilterListener>,
    ) -> Result<(), TransportError>;

    /// Publishes `collection` as content named `name`.
    ///
    /// Returns the digest of the published object.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` or `TransportError::Signing` if the
    /// content cannot be encoded, signed or stored.
    fn put(&self, name: &ContentName, collection: &Collection)
    -> Result<ContentDigest, TransportError>;
}

/// Returns true if both handles point at the same listener.
pub(crate) fn same_listener<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
