//! Constants for content name validation.

/// Maximum number of components in a content name.
pub const MAX_NAME_COMPONENTS: usize = 64;

/// Maximum length of a single name component in bytes.
pub const MAX_COMPONENT_LENGTH: usize = 1024;

/// Length of a content digest in bytes (SHA-256).
pub const DIGEST_LENGTH: usize = 32;

/// The URI scheme accepted (and omitted on output) when parsing names.
pub const SCHEME: &str = "ccnx:";
