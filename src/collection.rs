//! Link references and collections of links.

use serde::{Deserialize, Serialize};

use crate::content::ContentObject;
use crate::error::CollectionError;
use crate::name::ContentName;

/// A reference to another name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    target: ContentName,
}

impl Link {
    /// Creates a link to `target`.
    #[must_use]
    pub fn new(target: ContentName) -> Self {
        Self { target }
    }

    /// Returns the target name.
    #[must_use]
    pub fn target(&self) -> &ContentName {
        &self.target
    }

    /// Consumes the link and returns its target.
    #[must_use]
    pub fn into_target(self) -> ContentName {
        self.target
    }
}

/// An ordered list of links, published as the payload of a content object.
///
/// # Examples
///
/// ```
/// use ccn_name::{Collection, ContentName, Link};
///
/// let mut collection = Collection::new();
/// collection.add(Link::new(ContentName::parse("/x").unwrap()));
/// collection.add_unique(Link::new(ContentName::parse("/x").unwrap()));
/// assert_eq!(collection.len(), 1);
///
/// let object = collection.to_content(ContentName::parse("/a/%FE").unwrap()).unwrap();
/// let decoded = Collection::from_content(&object).unwrap();
/// assert_eq!(decoded, collection);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    links: Vec<Link>,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a link, even if an equal one is present.
    pub fn add(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Appends a link unless an equal one is present.
    ///
    /// Returns true if the link was added.
    pub fn add_unique(&mut self, link: Link) -> bool {
        if self.links.contains(&link) {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Returns true if an equal link is present.
    #[must_use]
    pub fn contains(&self, link: &Link) -> bool {
        self.links.contains(link)
    }

    /// Returns the links in order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Returns the number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if there are no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Consumes the collection and returns the link targets in order.
    #[must_use]
    pub fn into_targets(self) -> Vec<ContentName> {
        self.links.into_iter().map(Link::into_target).collect()
    }

    /// Encodes the collection as a payload.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::Encode` if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, CollectionError> {
        serde_json::to_vec(self).map_err(|e| CollectionError::Encode {
            reason: e.to_string(),
        })
    }

    /// Encodes the collection into a content object named `name`.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::Encode` if serialization fails.
    pub fn to_content(&self, name: ContentName) -> Result<ContentObject, CollectionError> {
        Ok(ContentObject::new(name, self.encode()?))
    }

    /// Decodes the payload of a content object as a collection.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::Malformed` if the payload is not a collection.
    pub fn from_content(object: &ContentObject) -> Result<Self, CollectionError> {
        serde_json::from_slice(object.content()).map_err(|e| CollectionError::Malformed {
            name: object.name().to_string(),
            reason: e.to_string(),
        })
    }
}

impl FromIterator<Link> for Collection {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().collect(),
        }
    }
}
