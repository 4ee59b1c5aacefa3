#![warn(missing_docs)]

//! HTTP plumbing for talking to Solid pods.
//!
//! Everything that touches the network goes through a [Fetch]
//! implementation handed in by the caller, the same way a browser app hands
//! its authenticated `fetch` function to a client library. [HttpFetch] is the
//! `reqwest` backed implementation; with the `helpers` feature enabled,
//! [helpers::MemoryPod] provides an in-memory pod for tests.
//!
//! On top of [Fetch], this crate discovers [ResourceInfo]: the metadata a
//! server advertises about a resource through its `Link`, `Content-Type` and
//! `WAC-Allow` headers, including where its access control lives.

mod error;
pub use error::*;

mod fetch;
pub use fetch::*;

mod client;
pub use client::*;

mod header;
pub use header::*;

mod resource;
pub use resource::*;

#[cfg(any(test, feature = "helpers"))]
pub mod helpers;
