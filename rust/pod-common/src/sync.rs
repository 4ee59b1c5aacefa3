//! Cross-target bound compatibility traits
//!
//! Pod access runs inside a browser (`wasm32-unknown-unknown`, single
//! threaded) as well as in native tools where a fetch implementation may be
//! shared across threads.

/// `Send + Sync` on native targets, no bound at all on wasm.
///
/// Fetch implementations and access control strategies require it, so their
/// `async_trait` futures can be polled by a multi-threaded runtime.
#[cfg(not(target_arch = "wasm32"))]
pub trait ConditionalSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> ConditionalSync for T where T: Send + Sync {}

/// `Send + Sync` on native targets, no bound at all on wasm.
#[cfg(target_arch = "wasm32")]
pub trait ConditionalSync {}

#[cfg(target_arch = "wasm32")]
impl<T> ConditionalSync for T {}
