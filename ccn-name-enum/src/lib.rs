//! Name enumeration for content-centric networking.
//!
//! Name enumeration is a one-level directory listing built on interests and
//! content. It includes:
//!
//! - **Consumer engine**: [`NameEnumerator`] keeps a discovery interest
//!   outstanding per registered prefix and hands decoded children to the
//!   application
//! - **Responder engine**: [`NameEnumerationResponder`] answers discovery
//!   queries from locally registered names, once per change
//! - **Registry**: [`RequestRegistry`] and [`ResponseTable`], the bookkeeping
//!   both engines keep
//! - **Transport seam**: the [`Transport`] trait and the listener traits it
//!   calls back into
//! - **In-memory simulation**: [`SimulatedTransport`] for tests and
//!   single-process use
//!
//! # Overview
//!
//! A discovery query for a prefix is an interest in the prefix followed by
//! the marker component [`NE_MARKER`]:
//!
//! ```text
//! /parc.com/files        prefix
//! /parc.com/files/%FE    query name, component count = prefix + 1
//! ```
//!
//! A responder answers with a [`Collection`](ccn_name::Collection) of links,
//! one per distinct child, published under the query name. The consumer
//! renews its interest past every answer it receives, so answers published
//! later are delivered without registering again.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use ccn_name::ContentName;
//! use ccn_name_enum::{NameEnumerationResponder, NameEnumerator, SimulatedTransport};
//!
//! let transport = Arc::new(SimulatedTransport::new());
//!
//! // Producer side
//! let responder = NameEnumerationResponder::new(transport.clone());
//! responder.register_namespace(&ContentName::parse("/parc.com").unwrap()).unwrap();
//! responder.register_name_for_responses(&ContentName::parse("/parc.com/files/a.txt").unwrap());
//! responder.register_name_for_responses(&ContentName::parse("/parc.com/files/b.txt").unwrap());
//!
//! // Consumer side
//! let found = Arc::new(Mutex::new(Vec::new()));
//! let sink = found.clone();
//! let enumerator = NameEnumerator::new(
//!     transport,
//!     Arc::new(move |_prefix: &ContentName, names: Vec<ContentName>| {
//!         sink.lock().extend(names);
//!     }),
//! );
//! enumerator.register_prefix(&ContentName::parse("/parc.com/files").unwrap()).unwrap();
//!
//! let names: Vec<String> = found.lock().iter().map(ToString::to_string).collect();
//! assert_eq!(names, vec!["/a.txt", "/b.txt"]);
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod consumer;
mod error;
mod marker;
mod registry;
mod responder;
mod simulation;
mod stats;
mod transport;

pub use config::{EnumeratorConfig, SimulationConfig};
pub use consumer::NameEnumerator;
pub use error::{EnumerationError, TransportError};
pub use marker::{NE_MARKER, is_marked, mark, marker, unmark};
pub use registry::{
    EnumerationRequest, HandledResponse, RequestRegistry, ResponseState, ResponseTable,
};
pub use responder::NameEnumerationResponder;
pub use simulation::SimulatedTransport;
pub use stats::{EnumeratorStats, ResponderStats, TransportStats};
pub use transport::{FilterListener, InterestListener, NameEnumeratorListener, Renewal, Transport};
