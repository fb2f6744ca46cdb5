//! Name component type for content names.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_COMPONENT_LENGTH;
use crate::error::ComponentError;

/// A single component of a content name.
///
/// Components are opaque byte strings between 1 and 1024 bytes long. In URI
/// form, any byte outside the unreserved set `[A-Za-z0-9-._~]` is written as
/// `%XX`.
///
/// # Ordering
///
/// Components follow the canonical CCN order: a shorter component sorts
/// before a longer one, and components of equal length compare bytewise.
///
/// # Examples
///
/// ```
/// use ccn_name::NameComponent;
///
/// let comp = NameComponent::parse("intro.html").unwrap();
/// assert_eq!(comp.as_bytes(), b"intro.html");
///
/// let marker = NameComponent::parse("%FE").unwrap();
/// assert_eq!(marker.as_bytes(), &[0xFE]);
/// assert_eq!(marker.to_string(), "%FE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameComponent(Vec<u8>);

impl NameComponent {
    /// Creates a component from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `ComponentError` if the bytes are empty or longer than 1024.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ComponentError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ComponentError::Empty);
        }
        if bytes.len() > MAX_COMPONENT_LENGTH {
            return Err(ComponentError::TooLong {
                max: MAX_COMPONENT_LENGTH,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    /// Wraps bytes already known to be within the length limits.
    pub(crate) fn from_raw(bytes: Vec<u8>) -> Self {
        debug_assert!(!bytes.is_empty() && bytes.len() <= MAX_COMPONENT_LENGTH);
        Self(bytes)
    }

    /// Creates a one-byte component. Marker components are built this way.
    ///
    /// ```
    /// use ccn_name::NameComponent;
    ///
    /// assert_eq!(NameComponent::from_byte(0xFE).to_string(), "%FE");
    /// ```
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        Self(vec![byte])
    }

    /// Parses a component from its URI form, decoding `%XX` escapes.
    ///
    /// # Errors
    ///
    /// Returns `ComponentError` if:
    /// - The component is empty
    /// - A `%` is not followed by two hex digits
    /// - The input contains '/', whitespace or a control character
    /// - The decoded component exceeds 1024 bytes
    pub fn parse(input: &str) -> Result<Self, ComponentError> {
        if input.is_empty() {
            return Err(ComponentError::Empty);
        }

        let raw = input.as_bytes();
        let mut decoded = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            let b = raw[i];
            if b == b'%' {
                let byte = raw
                    .get(i + 1..i + 3)
                    .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                    .ok_or(ComponentError::InvalidPercentEncoding { position: i })?;
                decoded.push(byte);
                i += 3;
            } else if b == b'/' || b.is_ascii_whitespace() || b.is_ascii_control() {
                return Err(ComponentError::InvalidChar {
                    char: char::from(b),
                    position: i,
                });
            } else {
                decoded.push(b);
                i += 1;
            }
        }

        Self::new(decoded)
    }

    /// Returns the raw bytes of the component.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the component in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; components are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the byte can appear unescaped in URI form.
    #[must_use]
    pub const fn is_unreserved(b: u8) -> bool {
        b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
    }
}

impl Ord for NameComponent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for NameComponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if Self::is_unreserved(b) {
                write!(f, "{}", char::from(b))?;
            } else {
                write!(f, "%{b:02X}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for NameComponent {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for NameComponent {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
