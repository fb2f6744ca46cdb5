//! Hierarchical content names for content-centric networking.
//!
//! This crate provides the naming and messaging primitives that name
//! enumeration and other content-centric protocols are built on.
//!
//! # Overview
//!
//! Content is requested by name rather than by location. A name is a
//! sequence of opaque byte-string components, written in URI form:
//!
//! ```text
//! [ccnx:]/<component>/<component>/...
//! ```
//!
//! Consumers express an [`Interest`] in a name; any node holding a matching
//! [`ContentObject`] may answer it. Objects are identified by a
//! [`ContentDigest`], and a [`Collection`] of [`Link`]s is the payload used to
//! answer listing-style queries.
//!
//! # Quick Start
//!
//! ```rust
//! use ccn_name::{Collection, ContentName, Interest, Link, NameComponent};
//!
//! // Parse a name
//! let prefix = ContentName::parse("/parc.com/files").unwrap();
//! assert_eq!(prefix.count(), 2);
//!
//! // Append a raw component
//! let marker = NameComponent::new(vec![0xFE]).unwrap();
//! let query_name = prefix.append(marker.clone()).unwrap();
//! assert_eq!(query_name.to_string(), "/parc.com/files/%FE");
//! assert_eq!(query_name.cut(&marker), prefix);
//!
//! // Answer with a collection and check that it satisfies the interest
//! let interest = Interest::new(query_name.clone()).with_name_component_count(3);
//! let collection: Collection = [Link::new(ContentName::parse("/a.txt").unwrap())]
//!     .into_iter()
//!     .collect();
//! let answer = collection.to_content(query_name).unwrap();
//! assert!(interest.matches(&answer));
//! ```
//!
//! # Length Constraints
//!
//! | Item | Maximum |
//! |------|---------|
//! | Components per name | 64 |
//! | Bytes per component | 1024 |

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod collection;
mod component;
mod constants;
mod content;
mod digest;
mod error;
mod interest;
mod name;
pub mod prelude;

pub use collection::{Collection, Link};
pub use component::NameComponent;
pub use constants::{DIGEST_LENGTH, MAX_COMPONENT_LENGTH, MAX_NAME_COMPONENTS, SCHEME};
pub use content::ContentObject;
pub use digest::ContentDigest;
pub use error::{CollectionError, ComponentError, NameError};
pub use interest::{Interest, OrderPreference};
pub use name::ContentName;
