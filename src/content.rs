//! Named content objects.

use crate::digest::ContentDigest;
use crate::error::NameError;
use crate::name::ContentName;

/// A named, immutable piece of content.
///
/// The digest is computed once at construction and identifies this exact
/// object among others published under the same name.
///
/// # Examples
///
/// ```
/// use ccn_name::{ContentName, ContentObject};
///
/// let name = ContentName::parse("/a/%FE").unwrap();
/// let object = ContentObject::new(name.clone(), b"payload".to_vec());
///
/// assert_eq!(object.name(), &name);
/// assert_eq!(object.content(), b"payload");
/// assert_eq!(object.full_name().unwrap().count(), name.count() + 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentObject {
    name: ContentName,
    content: Vec<u8>,
    digest: ContentDigest,
}

impl ContentObject {
    /// Creates a content object and computes its digest.
    #[must_use]
    pub fn new(name: ContentName, content: Vec<u8>) -> Self {
        let digest = ContentDigest::compute(&name, &content);
        Self {
            name,
            content,
            digest,
        }
    }

    /// Returns the name the object was published under.
    #[must_use]
    pub fn name(&self) -> &ContentName {
        &self.name
    }

    /// Returns the payload.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the content digest.
    #[must_use]
    pub const fn digest(&self) -> ContentDigest {
        self.digest
    }

    /// Returns the name extended with the digest as its last component.
    ///
    /// # Errors
    ///
    /// Returns `NameError::TooManyComponents` if the name has no room left.
    pub fn full_name(&self) -> Result<ContentName, NameError> {
        self.name.append(self.digest.to_component())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_depends_on_content() {
        let name = ContentName::parse("/a").unwrap();
        let a = ContentObject::new(name.clone(), b"a".to_vec());
        let b = ContentObject::new(name, b"b".to_vec());
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn full_name_ends_with_digest() {
        let object = ContentObject::new(ContentName::parse("/a/b").unwrap(), vec![1, 2, 3]);
        let full = object.full_name().unwrap();
        assert_eq!(full.count(), 3);
        assert_eq!(
            full.component(2).unwrap().as_bytes(),
            object.digest().as_bytes()
        );
        assert!(object.name().is_prefix_of(&full));
    }
}
