#![warn(missing_docs)]

//! A small linked-data model for the documents a pod browser reads and
//! writes: ACLs, Access Control Resources, policies and profiles.
//!
//! A [Dataset] is a set of [Thing]s, each a subject with its predicates and
//! [Term] objects. Datasets travel as expanded JSON-LD, which every Solid
//! server can produce and accept, so no RDF syntax beyond JSON is needed.
//!
//! ```rust
//! use pod_dataset::{Dataset, Thing};
//! use pod_common::vocab::{acl, rdf};
//!
//! let mut dataset = Dataset::new();
//! dataset.set_thing(
//!     Thing::new("https://pod.example/cat.jpg.acl#owner")
//!         .with_iri(rdf::TYPE, acl::AUTHORIZATION)
//!         .with_iri(acl::AGENT, "https://pod.example/alice#me")
//!         .with_iri(acl::MODE, acl::READ),
//! );
//!
//! let bytes = dataset.to_json_ld().unwrap();
//! let parsed = Dataset::from_json_ld(&bytes, None).unwrap();
//! assert_eq!(parsed, dataset);
//! ```

mod error;
pub use error::*;

mod term;
pub use term::*;

mod thing;
pub use thing::*;

mod dataset;
pub use dataset::*;

mod json_ld;

mod io;
pub use io::*;
