use async_trait::async_trait;
use pod_common::{ConditionalSync, Iri};
use pod_fetch::ResourceInfo;

use crate::{AccessControlError, AccessMap, NormalizedPermission};

/// Permission management for one resource, independent of the protocol that
/// protects it.
///
/// Implementations hold no state between calls: every operation reads the
/// current documents from the pod, and every write is complete when the
/// returned future resolves. Concurrent writes for different agents are not
/// coordinated; the last write to reach the pod wins.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait AccessControlStrategy: ConditionalSync {
    /// The resource whose access is managed
    fn resource(&self) -> &ResourceInfo;

    /// Every agent holding access to the resource, ordered by ascending WebID
    async fn get_permissions(&self) -> Result<Vec<NormalizedPermission>, AccessControlError>;

    /// Access granted to the members of a container. `None` when the
    /// resource is not a container or the protocol has no such notion.
    async fn get_default_permissions(
        &self,
    ) -> Result<Option<Vec<NormalizedPermission>>, AccessControlError>;

    /// Replace the access `web_id` holds on the resource with `access`.
    ///
    /// An empty `access` revokes everything the agent held. Guarding against
    /// accidental revocation (including of one's own control access) is up
    /// to the caller.
    async fn save_permissions_for_agent(
        &self,
        web_id: &Iri,
        access: AccessMap,
    ) -> Result<NormalizedPermission, AccessControlError>;

    /// Replace the access `web_id` holds on the members of the container.
    /// `None` when the resource is not a container or the protocol has no
    /// such notion; nothing is written in that case.
    async fn save_default_permissions(
        &self,
        web_id: &Iri,
        access: AccessMap,
    ) -> Result<Option<NormalizedPermission>, AccessControlError>;

    /// Delete the resource itself
    async fn delete_file(&self) -> Result<(), AccessControlError>;
}
