//! Test doubles for pods.
//!
//! [MemoryPod] answers requests the way a Solid server would, keeping every
//! resource in memory; [PodServer] exposes one over a local HTTP listener so
//! real clients can be exercised against it.

mod memory;
pub use memory::*;

#[cfg(not(target_arch = "wasm32"))]
mod server;
#[cfg(not(target_arch = "wasm32"))]
pub use server::*;
