//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use ccn_name::prelude::*;
//!
//! let name = ContentName::parse("/a/b").unwrap();
//! let interest = Interest::new(name);
//! ```

pub use crate::{
    // Core types
    Collection, ContentDigest, ContentName, ContentObject, Interest, Link, NameComponent,
    OrderPreference,
    // Errors
    CollectionError, ComponentError, NameError,
    // Constants
    DIGEST_LENGTH, MAX_COMPONENT_LENGTH, MAX_NAME_COMPONENTS, SCHEME,
};
