//! Web Access Control: authorizations listed in an ACL document linked from
//! the resource.

use std::fmt::Debug;

use async_trait::async_trait;
use pod_common::Iri;
use pod_dataset::{Dataset, get_dataset_if_exists, save_dataset_at};
use pod_fetch::{Fetch, FetchError, ResourceInfo, delete_resource, get_resource_info};
use tracing::{debug, warn};

use crate::{
    AccessControlError, AccessControlStrategy, AccessMap, NormalizedPermission,
    normalize_permissions,
};

mod authorization;

/// [AccessControlStrategy] for resources protected by an ACL
pub struct WacAccessControl<F> {
    resource: ResourceInfo,
    acl: Iri,
    fetch: F,
}

impl<F> Debug for WacAccessControl<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WacAccessControl")
            .field("resource", &self.resource.iri)
            .field("acl", &self.acl)
            .finish_non_exhaustive()
    }
}

impl<F> WacAccessControl<F>
where
    F: Fetch,
{
    /// Manage access to `resource`, which must link to its ACL.
    ///
    /// The ACL itself is read on every operation, so it need not exist yet.
    pub async fn init(resource: ResourceInfo, fetch: F) -> Result<Self, AccessControlError> {
        let Some(acl) = resource.acl.clone() else {
            return Err(AccessControlError::MissingAcl(resource.iri.to_string()));
        };

        debug!("Managing {} through WAC, ACL at {}", resource.iri, acl);
        Ok(Self {
            resource,
            acl,
            fetch,
        })
    }

    /// The ACL document of the resource
    pub fn acl(&self) -> &Iri {
        &self.acl
    }

    /// The ACL to edit when the resource has none of its own: the default
    /// authorizations of the closest ancestor, rewritten to target the
    /// resource.
    async fn inherited_acl(&self) -> Result<Dataset, AccessControlError> {
        let mut candidate = self.resource.iri.parent();

        while let Some(container) = candidate {
            let info = match get_resource_info(&container, &self.fetch).await {
                Ok(info) => info,
                Err(error @ (FetchError::NotFound(_) | FetchError::UnexpectedStatus { .. })) => {
                    debug!("Skipping {} while looking for an ACL: {}", container, error);
                    candidate = container.parent();
                    continue;
                }
                Err(error) => return Err(error.into()),
            };

            if let Some(acl) = &info.acl {
                if let Some(ancestor) = get_dataset_if_exists(acl, &self.fetch).await? {
                    debug!("{} inherits its access from {}", self.resource.iri, acl);
                    return Ok(authorization::inherit(
                        &ancestor,
                        &container,
                        &self.acl,
                        &self.resource,
                    ));
                }
            }

            if info.is_storage_root {
                break;
            }
            candidate = container.parent();
        }

        warn!("No ACL governs {}, starting from an empty one", self.resource.iri);
        Ok(Dataset::new())
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<F> AccessControlStrategy for WacAccessControl<F>
where
    F: Fetch,
{
    fn resource(&self) -> &ResourceInfo {
        &self.resource
    }

    async fn get_permissions(&self) -> Result<Vec<NormalizedPermission>, AccessControlError> {
        let Some(acl) = get_dataset_if_exists(&self.acl, &self.fetch).await? else {
            debug!("{} has no ACL of its own", self.resource.iri);
            return Ok(Vec::new());
        };

        Ok(normalize_permissions(authorization::agent_access(
            &acl,
            self.resource.iri.as_str(),
        )))
    }

    async fn get_default_permissions(
        &self,
    ) -> Result<Option<Vec<NormalizedPermission>>, AccessControlError> {
        Ok(None)
    }

    async fn save_permissions_for_agent(
        &self,
        web_id: &Iri,
        access: AccessMap,
    ) -> Result<NormalizedPermission, AccessControlError> {
        let mut acl = match get_dataset_if_exists(&self.acl, &self.fetch).await? {
            Some(acl) => acl,
            None => self.inherited_acl().await?,
        };

        let resource = self.resource.iri.as_str();
        authorization::revoke(&mut acl, &self.acl, resource, web_id.as_str());
        if !access.is_empty() {
            authorization::grant(&mut acl, &self.acl, resource, web_id.as_str(), &access);
        }

        save_dataset_at(&self.acl, &acl, &self.fetch).await?;
        debug!("Saved {} access for {} to {}", access.name(), web_id, resource);

        Ok(NormalizedPermission::new(web_id.as_str(), access))
    }

    async fn save_default_permissions(
        &self,
        web_id: &Iri,
        _access: AccessMap,
    ) -> Result<Option<NormalizedPermission>, AccessControlError> {
        debug!(
            "Ignoring default access for {} on {}: not managed through WAC",
            web_id, self.resource.iri
        );
        Ok(None)
    }

    async fn delete_file(&self) -> Result<(), AccessControlError> {
        delete_resource(&self.resource.iri, &self.fetch).await?;
        Ok(())
    }
}
