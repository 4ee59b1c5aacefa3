use std::fmt::{Debug, Display};

use async_trait::async_trait;
use pod_common::Iri;
use pod_fetch::{Fetch, ResourceInfo, get_resource_info};
use tracing::debug;

use crate::{
    AccessControlError, AccessControlStrategy, AccessMap, AcpAccessControl, NormalizedPermission,
    WacAccessControl, has_accessible_acl, has_linked_acr,
};

/// The access control protocol governing a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Web Access Control
    Wac,
    /// Access Control Policies
    Acp,
}

impl Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Wac => write!(f, "WAC"),
            Protocol::Acp => write!(f, "ACP"),
        }
    }
}

/// The strategy selected for a resource by [get_access_control]
pub enum AccessControl<F> {
    /// The resource is governed by an ACL
    Wac(WacAccessControl<F>),
    /// The resource is governed by an ACR
    Acp(AcpAccessControl<F>),
}

impl<F> Debug for AccessControl<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wac(strategy) => f.debug_tuple("Wac").field(strategy).finish(),
            Self::Acp(strategy) => f.debug_tuple("Acp").field(strategy).finish(),
        }
    }
}

impl<F> AccessControl<F> {
    /// The protocol of the selected strategy
    pub fn protocol(&self) -> Protocol {
        match self {
            Self::Wac(_) => Protocol::Wac,
            Self::Acp(_) => Protocol::Acp,
        }
    }
}

impl<F> From<WacAccessControl<F>> for AccessControl<F> {
    fn from(strategy: WacAccessControl<F>) -> Self {
        Self::Wac(strategy)
    }
}

impl<F> From<AcpAccessControl<F>> for AccessControl<F> {
    fn from(strategy: AcpAccessControl<F>) -> Self {
        Self::Acp(strategy)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<F> AccessControlStrategy for AccessControl<F>
where
    F: Fetch,
{
    fn resource(&self) -> &ResourceInfo {
        match self {
            Self::Wac(strategy) => strategy.resource(),
            Self::Acp(strategy) => strategy.resource(),
        }
    }

    async fn get_permissions(&self) -> Result<Vec<NormalizedPermission>, AccessControlError> {
        match self {
            Self::Wac(strategy) => strategy.get_permissions().await,
            Self::Acp(strategy) => strategy.get_permissions().await,
        }
    }

    async fn get_default_permissions(
        &self,
    ) -> Result<Option<Vec<NormalizedPermission>>, AccessControlError> {
        match self {
            Self::Wac(strategy) => strategy.get_default_permissions().await,
            Self::Acp(strategy) => strategy.get_default_permissions().await,
        }
    }

    async fn save_permissions_for_agent(
        &self,
        web_id: &Iri,
        access: AccessMap,
    ) -> Result<NormalizedPermission, AccessControlError> {
        match self {
            Self::Wac(strategy) => strategy.save_permissions_for_agent(web_id, access).await,
            Self::Acp(strategy) => strategy.save_permissions_for_agent(web_id, access).await,
        }
    }

    async fn save_default_permissions(
        &self,
        web_id: &Iri,
        access: AccessMap,
    ) -> Result<Option<NormalizedPermission>, AccessControlError> {
        match self {
            Self::Wac(strategy) => strategy.save_default_permissions(web_id, access).await,
            Self::Acp(strategy) => strategy.save_default_permissions(web_id, access).await,
        }
    }

    async fn delete_file(&self) -> Result<(), AccessControlError> {
        match self {
            Self::Wac(strategy) => strategy.delete_file().await,
            Self::Acp(strategy) => strategy.delete_file().await,
        }
    }
}

/// Pick the strategy for `resource`.
///
/// A linked ACR wins over an ACL, since servers advertising both enforce
/// ACP. A resource with neither yields [AccessControlError::NoAccessPolicy].
/// Failures while initializing the chosen strategy are returned unchanged.
pub async fn get_access_control<F>(
    resource: ResourceInfo,
    policies_container: Option<Iri>,
    fetch: F,
) -> Result<AccessControl<F>, AccessControlError>
where
    F: Fetch,
{
    if has_linked_acr(&resource) {
        debug!("{} links to an ACR", resource.iri);
        return Ok(AcpAccessControl::init(resource, policies_container, fetch)
            .await?
            .into());
    }

    if has_accessible_acl(&resource) {
        debug!("{} links to an ACL", resource.iri);
        return Ok(WacAccessControl::init(resource, fetch).await?.into());
    }

    debug!("{} advertises no access control", resource.iri);
    Err(AccessControlError::NoAccessPolicy)
}

/// Discover the metadata of `iri`, then [get_access_control] for it
pub async fn get_access_control_for<F>(
    iri: &Iri,
    policies_container: Option<Iri>,
    fetch: F,
) -> Result<AccessControl<F>, AccessControlError>
where
    F: Fetch,
{
    let resource = get_resource_info(iri, &fetch).await?;
    get_access_control(resource, policies_container, fetch).await
}
