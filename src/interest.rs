//! Interests: requests for named content.

use std::fmt;

use crate::content::ContentObject;
use crate::digest::ContentDigest;
use crate::name::ContentName;

/// Order in which a responder or cache should pick among matching content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderPreference {
    /// No preference; content is served in arrival order.
    #[default]
    Arrival,
    /// Component-lexicographic traversal of matching names.
    Lexicographic,
}

/// An immutable request for content under a name.
///
/// An interest matches a content object when the first
/// `name_component_count` components of the interest name (all of them, if
/// unset) are a prefix of the object's name. A continuation interest also
/// carries an anchor digest and never matches the anchored object itself, so
/// a consumer that renews with [`Interest::continue_after`] does not receive
/// the same answer twice.
///
/// Interests are never mutated once built; every `with_*` method consumes the
/// interest and returns a new one.
///
/// # Examples
///
/// ```
/// use ccn_name::{ContentName, ContentObject, Interest, OrderPreference};
///
/// let interest = Interest::new(ContentName::parse("/a/%FE").unwrap())
///     .with_order_preference(OrderPreference::Lexicographic)
///     .with_name_component_count(2);
///
/// let answer = ContentObject::new(ContentName::parse("/a/%FE").unwrap(), b"{}".to_vec());
/// assert!(interest.matches(&answer));
///
/// // The continuation skips the answer it was anchored at
/// let next = interest.continue_after(answer.digest());
/// assert!(!next.matches(&answer));
/// assert_eq!(next.name_component_count(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interest {
    name: ContentName,
    order_preference: OrderPreference,
    name_component_count: Option<usize>,
    after: Option<ContentDigest>,
}

impl Interest {
    /// Creates an interest in `name` with no constraints.
    #[must_use]
    pub fn new(name: ContentName) -> Self {
        Self {
            name,
            order_preference: OrderPreference::default(),
            name_component_count: None,
            after: None,
        }
    }

    /// Sets the order preference.
    #[must_use]
    pub const fn with_order_preference(mut self, order_preference: OrderPreference) -> Self {
        self.order_preference = order_preference;
        self
    }

    /// Sets how many leading components of the name must match.
    #[must_use]
    pub const fn with_name_component_count(mut self, count: usize) -> Self {
        self.name_component_count = Some(count);
        self
    }

    /// Derives the interest for "the next answer after `digest`".
    ///
    /// Name, order preference and component count are preserved.
    #[must_use]
    pub fn continue_after(&self, digest: ContentDigest) -> Self {
        Self {
            name: self.name.clone(),
            order_preference: self.order_preference,
            name_component_count: self.name_component_count,
            after: Some(digest),
        }
    }

    /// Returns the interest name.
    #[must_use]
    pub fn name(&self) -> &ContentName {
        &self.name
    }

    /// Returns the order preference.
    #[must_use]
    pub const fn order_preference(&self) -> OrderPreference {
        self.order_preference
    }

    /// Returns the required component count, if set.
    #[must_use]
    pub const fn name_component_count(&self) -> Option<usize> {
        self.name_component_count
    }

    /// Returns the continuation anchor, if any.
    #[must_use]
    pub const fn after(&self) -> Option<ContentDigest> {
        self.after
    }

    /// Returns true if this interest was derived with [`Interest::continue_after`].
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.after.is_some()
    }

    /// Returns the portion of the name that content must start with.
    #[must_use]
    pub fn match_prefix(&self) -> ContentName {
        match self.name_component_count {
            Some(count) => self.name.prefix(count),
            None => self.name.clone(),
        }
    }

    /// Returns true if `object` satisfies this interest.
    #[must_use]
    pub fn matches(&self, object: &ContentObject) -> bool {
        if self.after == Some(object.digest()) {
            return false;
        }
        self.match_prefix().is_prefix_of(object.name())
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(count) = self.name_component_count {
            write!(f, " [count={count}]")?;
        }
        if let Some(after) = self.after {
            write!(f, " [after={after}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ContentName {
        ContentName::parse(s).unwrap()
    }

    #[test]
    fn new_interest_has_no_constraints() {
        let interest = Interest::new(name("/a"));
        assert_eq!(interest.order_preference(), OrderPreference::Arrival);
        assert!(interest.name_component_count().is_none());
        assert!(!interest.is_continuation());
    }

    #[test]
    fn matches_longer_names_under_prefix() {
        let interest = Interest::new(name("/a/b"));
        assert!(interest.matches(&ContentObject::new(name("/a/b/c"), vec![])));
        assert!(interest.matches(&ContentObject::new(name("/a/b"), vec![])));
        assert!(!interest.matches(&ContentObject::new(name("/a/c"), vec![])));
    }

    #[test]
    fn component_count_limits_the_matched_prefix() {
        let interest = Interest::new(name("/a/b/c")).with_name_component_count(1);
        assert_eq!(interest.match_prefix(), name("/a"));
        assert!(interest.matches(&ContentObject::new(name("/a/z"), vec![])));
    }

    #[test]
    fn continuation_differs_from_original() {
        let original = Interest::new(name("/a/%FE"))
            .with_order_preference(OrderPreference::Lexicographic)
            .with_name_component_count(2);
        let answer = ContentObject::new(name("/a/%FE"), b"x".to_vec());
        let next = original.continue_after(answer.digest());

        assert_ne!(next, original);
        assert_eq!(next.name(), original.name());
        assert_eq!(next.order_preference(), OrderPreference::Lexicographic);
        assert_eq!(next.after(), Some(answer.digest()));
    }

    #[test]
    fn continuation_still_matches_newer_answers() {
        let first = ContentObject::new(name("/a/%FE"), b"1".to_vec());
        let second = ContentObject::new(name("/a/%FE"), b"2".to_vec());
        let next = Interest::new(name("/a/%FE")).continue_after(first.digest());

        assert!(!next.matches(&first));
        assert!(next.matches(&second));
    }
}
