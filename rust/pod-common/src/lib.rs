#![warn(missing_docs)]

//! Light weight helpers shared by the pod access crates: cross-target
//! bounds for async code, a validated [Iri] type and the linked-data
//! vocabularies that access control is expressed in.

mod sync;
pub use sync::*;

mod iri;
pub use iri::*;

pub mod vocab;
