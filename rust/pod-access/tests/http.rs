#![cfg(not(target_arch = "wasm32"))]

use anyhow::Result;
use pod_access::{
    AccessControlStrategy, AccessMap, Alias, Protocol, get_access_control_for, resolve_profiles,
};
use pod_common::vocab::foaf;
use pod_dataset::{Dataset, Thing};
use pod_fetch::helpers::{AccessProtocol, PodServer};
use pod_fetch::{AuthMethod, HttpFetch, HttpFetchConfig, JSON_LD};

fn client() -> HttpFetch {
    HttpFetch::new(
        HttpFetchConfig::new()
            .with_auth(AuthMethod::Bearer("test-token".into()))
            .with_timeout(5),
    )
}

#[test_log::test(tokio::test)]
async fn it_manages_acp_permissions_over_http() -> Result<()> {
    let server = PodServer::start(AccessProtocol::Acp).await?;
    let resource = server.iri("docs/notes.txt")?;
    let profile = server.iri("bob/profile/card")?;
    let bob = server.iri("bob/profile/card#me")?;
    server
        .pod()
        .initialize(resource.as_str(), "text/plain", b"hello".to_vec())
        .await?;
    let mut card = Dataset::new();
    card.set_thing(Thing::new(bob.as_str()).with_literal(foaf::NAME, "Bob"));
    server
        .pod()
        .initialize(profile.as_str(), JSON_LD, card.to_json_ld()?)
        .await?;

    let access_control = get_access_control_for(&resource, None, client()).await?;
    assert_eq!(access_control.protocol(), Protocol::Acp);

    access_control
        .save_permissions_for_agent(&bob, AccessMap::new(true, true, true, false))
        .await?;
    let permissions = resolve_profiles(access_control.get_permissions().await?, &client()).await;

    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0].web_id, bob.as_str());
    assert_eq!(permissions[0].alias, Alias::Edit);
    assert_eq!(
        permissions[0]
            .profile
            .as_ref()
            .and_then(|profile| profile.name.as_deref()),
        Some("Bob")
    );

    let requests = server.pod().requests().await;
    assert!(
        requests
            .iter()
            .all(|request| request.authorization.as_deref() == Some("Bearer test-token"))
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn it_manages_wac_permissions_over_http() -> Result<()> {
    let server = PodServer::start(AccessProtocol::Wac).await?;
    let resource = server.iri("docs/notes.txt")?;
    let alice = server.iri("alice/profile/card#me")?;
    server
        .pod()
        .initialize(resource.as_str(), "text/plain", b"hello".to_vec())
        .await?;

    let access_control = get_access_control_for(&resource, None, client()).await?;
    assert_eq!(access_control.protocol(), Protocol::Wac);

    access_control
        .save_permissions_for_agent(&alice, AccessMap::FULL)
        .await?;
    let permissions = access_control.get_permissions().await?;

    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0].alias, Alias::Control);

    access_control.delete_file().await?;
    assert!(server.pod().resource(resource.as_str()).await.is_none());
    Ok(())
}
