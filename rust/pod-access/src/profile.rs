use futures_util::future::join_all;
use pod_common::Iri;
use pod_common::vocab::{acl, acp, foaf, vcard};
use pod_dataset::get_dataset;
use pod_fetch::Fetch;
use tracing::debug;

use crate::{AccessControlError, NormalizedPermission};

/// What an agent's WebID profile says about them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// The WebID the profile was read from
    pub web_id: String,
    /// Display name (`foaf:name`, else `vcard:fn`)
    pub name: Option<String>,
    /// Picture (`vcard:hasPhoto`)
    pub avatar: Option<String>,
}

/// Read the profile document of `web_id`
pub async fn fetch_profile<F>(web_id: &str, fetch: &F) -> Result<Profile, AccessControlError>
where
    F: Fetch + ?Sized,
{
    let iri = Iri::parse(web_id)?;
    let dataset = get_dataset(&iri, fetch).await?;

    let mut profile = Profile {
        web_id: web_id.to_string(),
        ..Profile::default()
    };

    if let Some(agent) = dataset.thing(iri.as_str()) {
        profile.name = agent
            .literal(foaf::NAME)
            .or_else(|| agent.literal(vcard::FN))
            .map(str::to_string);
        profile.avatar = agent.iris(vcard::HAS_PHOTO).next().map(str::to_string);
    }

    Ok(profile)
}

/// Attach profiles to `permissions`, fetching them concurrently.
///
/// Agent classes have no profile, and agents whose profile cannot be read
/// keep `profile: None`.
pub async fn resolve_profiles<F>(
    permissions: Vec<NormalizedPermission>,
    fetch: &F,
) -> Vec<NormalizedPermission>
where
    F: Fetch + ?Sized,
{
    join_all(permissions.into_iter().map(|permission| async move {
        if is_agent_class(&permission.web_id) {
            return permission;
        }

        match fetch_profile(&permission.web_id, fetch).await {
            Ok(profile) => permission.with_profile(profile),
            Err(error) => {
                debug!("Profile of {} is unavailable: {}", permission.web_id, error);
                permission
            }
        }
    }))
    .await
}

fn is_agent_class(web_id: &str) -> bool {
    matches!(
        web_id,
        foaf::AGENT | acl::AUTHENTICATED_AGENT | acp::PUBLIC_AGENT | acp::AUTHENTICATED_AGENT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccessMap;
    use pod_fetch::JSON_LD;
    use pod_fetch::helpers::{AccessProtocol, MemoryPod};
    use pretty_assertions::assert_eq;

    const ALICE: &str = "https://pod.example/alice/profile/card#me";

    async fn pod_with_profile() -> anyhow::Result<MemoryPod> {
        let pod = MemoryPod::new("https://pod.example/", AccessProtocol::Wac)?;
        let card = format!(
            r##"[{{
                "@id": "#me",
                "{}": [{{ "@value": "Alice" }}],
                "{}": [{{ "@id": "../avatar.png" }}]
            }}]"##,
            vcard::FN,
            vcard::HAS_PHOTO
        );
        pod.initialize(
            "https://pod.example/alice/profile/card",
            JSON_LD,
            card.into_bytes(),
        )
        .await?;
        Ok(pod)
    }

    #[tokio::test]
    async fn it_reads_name_and_avatar() -> anyhow::Result<()> {
        let pod = pod_with_profile().await?;

        let profile = fetch_profile(ALICE, &pod).await?;

        assert_eq!(
            profile,
            Profile {
                web_id: ALICE.to_string(),
                name: Some("Alice".to_string()),
                avatar: Some("https://pod.example/alice/avatar.png".to_string()),
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn it_leaves_unreachable_profiles_out() -> anyhow::Result<()> {
        let pod = pod_with_profile().await?;
        let permissions = vec![
            NormalizedPermission::new(ALICE, AccessMap::FULL),
            NormalizedPermission::new("https://pod.example/bob/card#me", AccessMap::FULL),
            NormalizedPermission::new(foaf::AGENT, AccessMap::new(true, false, false, false)),
        ];

        let resolved = resolve_profiles(permissions, &pod).await;

        assert_eq!(
            resolved[0].profile.as_ref().and_then(|p| p.name.as_deref()),
            Some("Alice")
        );
        assert_eq!(resolved[1].profile, None);
        assert_eq!(resolved[2].profile, None);
        assert_eq!(resolved[1].web_id, "https://pod.example/bob/card#me");
        Ok(())
    }

    #[tokio::test]
    async fn it_does_not_look_up_agent_classes() -> anyhow::Result<()> {
        let pod = pod_with_profile().await?;
        pod.clear_requests().await;
        let view = AccessMap::new(true, false, false, false);
        let permissions = vec![
            NormalizedPermission::new(foaf::AGENT, view),
            NormalizedPermission::new(acl::AUTHENTICATED_AGENT, view),
            NormalizedPermission::new(acp::PUBLIC_AGENT, view),
            NormalizedPermission::new(acp::AUTHENTICATED_AGENT, view),
        ];

        let resolved = resolve_profiles(permissions, &pod).await;

        assert!(resolved.iter().all(|permission| permission.profile.is_none()));
        assert!(pod.requests().await.is_empty());
        Ok(())
    }
}
