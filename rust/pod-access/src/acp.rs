//! Access Control Policies: an Access Control Resource applies policies,
//! kept in a pod-wide policies container, to the resource.

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;
use pod_common::Iri;
use pod_dataset::{Dataset, get_dataset_if_exists, save_dataset_at};
use pod_fetch::{
    Fetch, FetchError, ResourceInfo, create_container_at, delete_resource, find_storage_root,
};
use tracing::{debug, warn};

use crate::{
    AccessControlError, AccessControlStrategy, AccessMap, NormalizedPermission,
    normalize_permissions,
};

mod acr;
mod policy;

use policy::Scope;

/// Path of the policies container, relative to the root of the pod
pub const POLICIES_CONTAINER_PATH: &str = "pb_policies/";

const POLICY_DOCUMENT_EXTENSION: &str = ".jsonld";

/// [AccessControlStrategy] for resources governed by an Access Control
/// Resource.
///
/// The policies it writes for a resource live in their own document inside
/// the policies container, at the resource's path within the pod. For
/// `<pod>/photos/cat.jpg` that is
/// `<pod>/pb_policies/photos/cat.jpg.jsonld`. The ACR then applies them
/// through two access controls of its own, `#managed-access` for the
/// resource and `#managed-member-access` for the members of a container.
pub struct AcpAccessControl<F> {
    resource: ResourceInfo,
    acr: Iri,
    policies_container: Iri,
    fetch: F,
}

impl<F> Debug for AcpAccessControl<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcpAccessControl")
            .field("resource", &self.resource.iri)
            .field("acr", &self.acr)
            .field("policies_container", &self.policies_container)
            .finish_non_exhaustive()
    }
}

impl<F> AcpAccessControl<F>
where
    F: Fetch,
{
    /// Manage access to `resource`, which must link to its ACR.
    ///
    /// Without a `policies_container`, the root of the resource's pod is
    /// discovered and its [POLICIES_CONTAINER_PATH] is used. The container
    /// is created if it does not exist yet; concurrent callers may race to
    /// do so safely.
    pub async fn init(
        resource: ResourceInfo,
        policies_container: Option<Iri>,
        fetch: F,
    ) -> Result<Self, AccessControlError> {
        let Some(acr) = resource.acr.clone() else {
            return Err(AccessControlError::MissingAcr(resource.iri.to_string()));
        };

        let policies_container = match policies_container {
            Some(container) => container,
            None => find_storage_root(&resource.iri, &fetch)
                .await?
                .ok_or_else(|| {
                    AccessControlError::MissingPoliciesContainer(resource.iri.to_string())
                })?
                .join(POLICIES_CONTAINER_PATH)?,
        };

        let within_pod = policies_container
            .parent()
            .is_some_and(|root| resource.iri.is_within(&root));
        if !policies_container.is_container() || !within_pod {
            return Err(AccessControlError::InvalidPoliciesContainer {
                container: policies_container.to_string(),
                resource: resource.iri.to_string(),
            });
        }

        if create_container_at(&policies_container, &fetch).await? {
            debug!("Created policies container {}", policies_container);
        }

        debug!("Managing {} through ACP, ACR at {}", resource.iri, acr);
        Ok(Self {
            resource,
            acr,
            policies_container,
            fetch,
        })
    }

    /// The Access Control Resource of the resource
    pub fn acr(&self) -> &Iri {
        &self.acr
    }

    /// The container holding the policies of the pod
    pub fn policies_container(&self) -> &Iri {
        &self.policies_container
    }

    /// The document holding the policies written for the resource
    pub fn policy_document(&self) -> Result<Iri, AccessControlError> {
        let invalid = || AccessControlError::InvalidPoliciesContainer {
            container: self.policies_container.to_string(),
            resource: self.resource.iri.to_string(),
        };

        let root = self.policies_container.parent().ok_or_else(invalid)?;
        let resource = self.resource.iri.without_fragment();
        let relative = resource.relative_to(&root).ok_or_else(invalid)?;

        Ok(self
            .policies_container
            .join(&format!("./{relative}{POLICY_DOCUMENT_EXTENSION}"))?)
    }

    async fn load_acr(&self) -> Result<Dataset, AccessControlError> {
        Ok(get_dataset_if_exists(&self.acr, &self.fetch)
            .await?
            .unwrap_or_default())
    }

    async fn permissions(
        &self,
        scope: Scope,
    ) -> Result<Vec<NormalizedPermission>, AccessControlError> {
        let acr = self.load_acr().await?;
        let acr_document = self.acr.without_fragment();
        let mut documents: BTreeMap<Iri, Option<Dataset>> = BTreeMap::new();

        let mut allowed: BTreeMap<String, AccessMap> = BTreeMap::new();
        let mut denied: BTreeMap<String, AccessMap> = BTreeMap::new();

        for policy in acr::applied_policies(&acr, scope.access_control_predicate()) {
            let document = if policy.starts_with("_:") {
                acr_document.clone()
            } else {
                match Iri::parse(&policy) {
                    Ok(iri) if iri.without_fragment() == acr_document => acr_document.clone(),
                    Ok(iri) if iri.is_within(&self.policies_container) => iri.without_fragment(),
                    Ok(_) => {
                        debug!(
                            "Skipping policy {} defined outside {}",
                            policy, self.policies_container
                        );
                        continue;
                    }
                    Err(error) => {
                        warn!("Skipping policy {}: {}", policy, error);
                        continue;
                    }
                }
            };

            let dataset = if document == acr_document {
                &acr
            } else {
                if !documents.contains_key(&document) {
                    let loaded = get_dataset_if_exists(&document, &self.fetch).await?;
                    if loaded.is_none() {
                        warn!("Policy document {} is missing", document);
                    }
                    documents.insert(document.clone(), loaded);
                }
                match documents.get(&document) {
                    Some(Some(dataset)) => dataset,
                    _ => continue,
                }
            };

            let Some(definition) = dataset.thing(&policy) else {
                debug!("Policy {} is not defined in {}", policy, document);
                continue;
            };

            let grant = policy::evaluate(dataset, definition);
            for agent in grant.agents {
                let allow = allowed.entry(agent.clone()).or_default();
                *allow = allow.union(grant.allow);
                let deny = denied.entry(agent).or_default();
                *deny = deny.union(grant.deny);
            }
        }

        Ok(normalize_permissions(allowed.into_iter().map(
            |(agent, access)| {
                let deny = denied.get(&agent).copied().unwrap_or_default();
                (agent, access.without(deny))
            },
        )))
    }

    /// Put the policy document back the way it was before a failed save
    async fn restore_policy_document(&self, document_iri: &Iri, previous: Option<Dataset>) {
        let restored = match previous {
            Some(previous) => save_dataset_at(document_iri, &previous, &self.fetch)
                .await
                .map_err(AccessControlError::from),
            None => match delete_resource(document_iri, &self.fetch).await {
                Ok(()) | Err(FetchError::NotFound(_)) => Ok(()),
                Err(error) => Err(error.into()),
            },
        };

        match restored {
            Ok(()) => debug!("Restored {} after a failed save", document_iri),
            Err(error) => warn!("Could not restore {}: {}", document_iri, error),
        }
    }

    async fn save(
        &self,
        scope: Scope,
        web_id: &Iri,
        access: AccessMap,
    ) -> Result<NormalizedPermission, AccessControlError> {
        let agent = web_id.as_str();
        let document_iri = self.policy_document()?;
        let previous = get_dataset_if_exists(&document_iri, &self.fetch).await?;
        let mut document = previous.clone().unwrap_or_default();

        policy::remove_agent(&mut document, &document_iri, scope, agent);
        if !access.is_empty() {
            policy::add_agent(&mut document, &document_iri, scope, &access, agent);
        }
        let surviving = policy::prune(&mut document, &document_iri, scope);

        let mut acr = self.load_acr().await?;
        acr::apply_managed(&mut acr, &self.acr, &self.resource.iri, scope, &surviving);

        save_dataset_at(&document_iri, &document, &self.fetch).await?;
        if let Err(error) = save_dataset_at(&self.acr, &acr, &self.fetch).await {
            self.restore_policy_document(&document_iri, previous).await;
            return Err(error.into());
        }

        debug!(
            "Saved {} access for {} to {} ({:?})",
            access.name(),
            agent,
            self.resource.iri,
            scope
        );
        Ok(NormalizedPermission::new(agent, access))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<F> AccessControlStrategy for AcpAccessControl<F>
where
    F: Fetch,
{
    fn resource(&self) -> &ResourceInfo {
        &self.resource
    }

    async fn get_permissions(&self) -> Result<Vec<NormalizedPermission>, AccessControlError> {
        self.permissions(Scope::Resource).await
    }

    async fn get_default_permissions(
        &self,
    ) -> Result<Option<Vec<NormalizedPermission>>, AccessControlError> {
        if !self.resource.is_container {
            return Ok(None);
        }
        Ok(Some(self.permissions(Scope::Members).await?))
    }

    async fn save_permissions_for_agent(
        &self,
        web_id: &Iri,
        access: AccessMap,
    ) -> Result<NormalizedPermission, AccessControlError> {
        self.save(Scope::Resource, web_id, access).await
    }

    async fn save_default_permissions(
        &self,
        web_id: &Iri,
        access: AccessMap,
    ) -> Result<Option<NormalizedPermission>, AccessControlError> {
        if !self.resource.is_container {
            debug!(
                "Ignoring default access for {} on {}: not a container",
                web_id, self.resource.iri
            );
            return Ok(None);
        }
        Ok(Some(self.save(Scope::Members, web_id, access).await?))
    }

    async fn delete_file(&self) -> Result<(), AccessControlError> {
        delete_resource(&self.resource.iri, &self.fetch).await?;

        let document = self.policy_document()?;
        match delete_resource(&document, &self.fetch).await {
            Ok(()) => debug!("Removed the policies of {}", self.resource.iri),
            Err(FetchError::NotFound(_)) => {}
            Err(error) => warn!(
                "Could not remove the policies of {}: {}",
                self.resource.iri, error
            ),
        }

        Ok(())
    }
}
