#![warn(missing_docs)]

//! Permission management for resources in Solid pods.
//!
//! Pods protect their resources with one of two mutually incompatible
//! protocols: Web Access Control (WAC), where an ACL document lists
//! authorizations per agent, or Access Control Policies (ACP), where an
//! Access Control Resource (ACR) applies reusable policies. This crate detects
//! which protocol governs a resource and hides the difference behind the
//! [AccessControlStrategy] trait.
//!
//! ```no_run
//! use pod_access::{AccessControlStrategy, AccessMap, get_access_control_for};
//! use pod_common::Iri;
//! use pod_fetch::{AuthMethod, HttpFetch, HttpFetchConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetch = HttpFetch::new(
//!     HttpFetchConfig::new().with_auth(AuthMethod::Bearer("token".into())),
//! );
//! let resource = Iri::parse("https://pod.example/photos/cat.jpg")?;
//!
//! let access_control = get_access_control_for(&resource, None, fetch).await?;
//! println!("{} governs {}", access_control.protocol(), resource);
//!
//! let bob = Iri::parse("https://bob.example/profile#me")?;
//! access_control
//!     .save_permissions_for_agent(&bob, AccessMap::new(true, false, false, false))
//!     .await?;
//!
//! for permission in access_control.get_permissions().await? {
//!     println!("{}: {}", permission.web_id, permission.alias);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Every operation reports failures through [AccessControlError]; nothing in
//! this crate panics on a failed request.

mod error;
pub use error::*;

mod access;
pub use access::*;

mod normalize;
pub use normalize::*;

mod profile;
pub use profile::*;

mod probe;
pub use probe::*;

mod strategy;
pub use strategy::*;

mod wac;
pub use wac::*;

mod acp;
pub use acp::*;

mod selector;
pub use selector::*;
