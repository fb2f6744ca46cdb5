//! Error types for content names and collections.

use std::fmt;

/// Errors for content name parsing and construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Input is empty
    Empty,
    /// Name does not start with '/' after the optional scheme
    MissingLeadingSlash {
        /// The input that was rejected
        input: String,
    },
    /// Too many components
    TooManyComponents {
        /// Maximum allowed components
        max: usize,
        /// Actual component count
        actual: usize,
    },
    /// Invalid component
    InvalidComponent {
        /// The invalid component as written
        component: String,
        /// Index of the component
        index: usize,
        /// Reason for invalidity
        reason: ComponentError,
    },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "name cannot be empty; use '/' for the root name"),
            Self::MissingLeadingSlash { input } => {
                write!(f, "name '{input}' must start with '/'")
            }
            Self::TooManyComponents { max, actual } => {
                write!(f, "name has {actual} components, maximum is {max}")
            }
            Self::InvalidComponent {
                component,
                index,
                reason,
            } => {
                write!(
                    f,
                    "invalid component '{component}' at index {index}: {reason}"
                )
            }
        }
    }
}

impl std::error::Error for NameError {}

/// Errors for name component parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// Component is empty
    Empty,
    /// Component exceeds maximum length
    TooLong {
        /// Maximum allowed length in bytes
        max: usize,
        /// Actual length in bytes
        actual: usize,
    },
    /// Invalid percent encoding
    InvalidPercentEncoding {
        /// Position of the offending '%'
        position: usize,
    },
    /// Character that must be percent-encoded appeared literally
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position in the input
        position: usize,
    },
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "component cannot be empty"),
            Self::TooLong { max, actual } => {
                write!(f, "component length {actual} exceeds maximum {max}")
            }
            Self::InvalidPercentEncoding { position } => {
                write!(f, "invalid percent encoding at position {position}")
            }
            Self::InvalidChar { char, position } => {
                write!(
                    f,
                    "invalid character '{char}' at position {position}; escape it as %XX"
                )
            }
        }
    }
}

impl std::error::Error for ComponentError {}

/// Errors for encoding and decoding link collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Content could not be decoded as a collection
    Malformed {
        /// Name of the content object that failed to decode
        name: String,
        /// Decoder message
        reason: String,
    },
    /// Collection could not be encoded
    Encode {
        /// Encoder message
        reason: String,
    },
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { name, reason } => {
                write!(f, "content '{name}' is not a link collection: {reason}")
            }
            Self::Encode { reason } => write!(f, "failed to encode collection: {reason}"),
        }
    }
}

impl std::error::Error for CollectionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_component_display_includes_reason() {
        let err = NameError::InvalidComponent {
            component: "a%G".to_string(),
            index: 2,
            reason: ComponentError::InvalidPercentEncoding { position: 1 },
        };
        let msg = err.to_string();
        assert!(msg.contains("index 2"));
        assert!(msg.contains("percent encoding"));
    }

    #[test]
    fn malformed_collection_display() {
        let err = CollectionError::Malformed {
            name: "/a/%FE".to_string(),
            reason: "expected value".to_string(),
        };
        assert!(err.to_string().contains("/a/%FE"));
    }
}
