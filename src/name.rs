//! Hierarchical content names.

use std::fmt;
use std::str::FromStr;

use crate::component::NameComponent;
use crate::constants::{MAX_NAME_COMPONENTS, SCHEME};
use crate::error::NameError;

/// A hierarchical content name.
///
/// A name is an ordered sequence of [`NameComponent`]s. Equality, prefix
/// tests and ordering are all component-wise. The name with zero components
/// is the root name, written `/`.
///
/// # Constraints
///
/// - Maximum 64 components
/// - Each component: 1-1024 bytes
///
/// # Examples
///
/// ```
/// use ccn_name::ContentName;
///
/// let name = ContentName::parse("/test/smetters/intro.html").unwrap();
/// assert_eq!(name.count(), 3);
/// assert_eq!(name.component(1).unwrap().as_bytes(), b"smetters");
///
/// let prefix = ContentName::parse("/test").unwrap();
/// assert!(prefix.is_prefix_of(&name));
///
/// // The scheme is accepted and dropped
/// let same = ContentName::parse("ccnx:/test/smetters/intro.html").unwrap();
/// assert_eq!(name, same);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentName {
    components: Vec<NameComponent>,
}

impl ContentName {
    /// Returns the root name (no components).
    #[must_use]
    pub const fn root() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Parses a name from its URI form.
    ///
    /// # Errors
    ///
    /// Returns `NameError` if:
    /// - The input is empty
    /// - The name does not start with '/' (after an optional `ccnx:` scheme)
    /// - The name has more than 64 components
    /// - Any component is invalid, including an empty one (`/a//b`)
    pub fn parse(input: &str) -> Result<Self, NameError> {
        if input.is_empty() {
            return Err(NameError::Empty);
        }

        let path = input.strip_prefix(SCHEME).unwrap_or(input);
        let Some(rest) = path.strip_prefix('/') else {
            return Err(NameError::MissingLeadingSlash {
                input: input.to_string(),
            });
        };

        let rest = rest.strip_suffix('/').unwrap_or(rest);
        if rest.is_empty() {
            return Ok(Self::root());
        }

        let component_strs: Vec<&str> = rest.split('/').collect();
        if component_strs.len() > MAX_NAME_COMPONENTS {
            return Err(NameError::TooManyComponents {
                max: MAX_NAME_COMPONENTS,
                actual: component_strs.len(),
            });
        }

        let mut components = Vec::with_capacity(component_strs.len());
        for (i, comp_str) in component_strs.iter().enumerate() {
            let component =
                NameComponent::parse(comp_str).map_err(|e| NameError::InvalidComponent {
                    component: (*comp_str).to_string(),
                    index: i,
                    reason: e,
                })?;
            components.push(component);
        }

        Ok(Self { components })
    }

    /// Builds a name from already validated components.
    ///
    /// # Errors
    ///
    /// Returns `NameError::TooManyComponents` if there are more than 64.
    pub fn from_components(
        components: impl IntoIterator<Item = NameComponent>,
    ) -> Result<Self, NameError> {
        let components: Vec<NameComponent> = components.into_iter().collect();
        if components.len() > MAX_NAME_COMPONENTS {
            return Err(NameError::TooManyComponents {
                max: MAX_NAME_COMPONENTS,
                actual: components.len(),
            });
        }
        Ok(Self { components })
    }

    /// Returns the components.
    #[must_use]
    pub fn components(&self) -> &[NameComponent] {
        &self.components
    }

    /// Returns the component at `index`, if any.
    #[must_use]
    pub fn component(&self, index: usize) -> Option<&NameComponent> {
        self.components.get(index)
    }

    /// Returns the number of components.
    #[must_use]
    pub fn count(&self) -> usize {
        self.components.len()
    }

    /// Returns true if this is the root name.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns a new name with `component` appended.
    ///
    /// # Errors
    ///
    /// Returns `NameError::TooManyComponents` if the name is already full.
    pub fn append(&self, component: NameComponent) -> Result<Self, NameError> {
        if self.components.len() >= MAX_NAME_COMPONENTS {
            return Err(NameError::TooManyComponents {
                max: MAX_NAME_COMPONENTS,
                actual: self.components.len() + 1,
            });
        }
        let mut components = self.components.clone();
        components.push(component);
        Ok(Self { components })
    }

    /// Returns the first `count` components as a name.
    ///
    /// Returns a clone of the whole name if `count` exceeds its length.
    #[must_use]
    pub fn prefix(&self, count: usize) -> Self {
        let end = count.min(self.components.len());
        Self {
            components: self.components[..end].to_vec(),
        }
    }

    /// Returns true if this name is a prefix of `other`.
    ///
    /// Every name is a prefix of itself, and the root name is a prefix of
    /// every name.
    #[must_use]
    pub fn is_prefix_of(&self, other: &ContentName) -> bool {
        self.components.len() <= other.components.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| a == b)
    }

    /// Returns true if any component equals `component`.
    #[must_use]
    pub fn contains(&self, component: &NameComponent) -> bool {
        self.components.contains(component)
    }

    /// Returns the components before the first occurrence of `component`.
    ///
    /// If `component` does not occur, the whole name is returned.
    ///
    /// ```
    /// use ccn_name::{ContentName, NameComponent};
    ///
    /// let name = ContentName::parse("/a/b/%FE/c").unwrap();
    /// let marker = NameComponent::parse("%FE").unwrap();
    /// assert_eq!(name.cut(&marker), ContentName::parse("/a/b").unwrap());
    /// ```
    #[must_use]
    pub fn cut(&self, component: &NameComponent) -> Self {
        let end = self
            .components
            .iter()
            .position(|c| c == component)
            .unwrap_or(self.components.len());
        self.prefix(end)
    }
}

impl From<NameComponent> for ContentName {
    fn from(component: NameComponent) -> Self {
        Self {
            components: vec![component],
        }
    }
}

impl fmt::Display for ContentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "/");
        }
        for component in &self.components {
            write!(f, "/{component}")?;
        }
        Ok(())
    }
}

impl FromStr for ContentName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for ContentName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ContentName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let uri = String::deserialize(deserializer)?;
        Self::parse(&uri).map_err(serde::de::Error::custom)
    }
}
