use anyhow::Result;
use http::{Method, StatusCode};
use pod_access::{
    AccessControl, AccessControlStrategy, AccessMap, Alias, NormalizedPermission, Protocol,
    get_access_control_for,
};
use pod_common::Iri;
use pod_common::vocab::{acl, foaf, rdf};
use pod_dataset::{Dataset, Thing, get_dataset};
use pod_fetch::JSON_LD;
use pod_fetch::helpers::{AccessProtocol, MemoryPod};
use pretty_assertions::assert_eq;

const ALICE: &str = "https://alice.example/profile/card#me";
const BOB: &str = "https://bob.example/profile/card#me";

const VIEW: AccessMap = AccessMap::new(true, false, false, false);
const EDIT: AccessMap = AccessMap::new(true, true, true, false);

async fn store(pod: &MemoryPod, iri: &str, things: Vec<Thing>) -> Result<()> {
    let mut dataset = Dataset::new();
    for thing in things {
        dataset.set_thing(thing);
    }
    pod.initialize(iri, JSON_LD, dataset.to_json_ld()?).await?;
    Ok(())
}

fn authorization(iri: &str, resource: &str, agent: &str, modes: &[&str]) -> Thing {
    let mut thing = Thing::new(iri)
        .with_iri(rdf::TYPE, acl::AUTHORIZATION)
        .with_iri(acl::ACCESS_TO, resource)
        .with_iri(acl::AGENT, agent);
    for mode in modes {
        thing.add_iri(acl::MODE, *mode);
    }
    thing
}

async fn pod_with(resource: &str) -> Result<(MemoryPod, Iri)> {
    let pod = MemoryPod::new("https://pod.example/", AccessProtocol::Wac)?;
    pod.initialize(resource, "text/plain", b"hello".to_vec()).await?;
    Ok((pod, Iri::parse(resource)?))
}

async fn strategy(pod: &MemoryPod, resource: &Iri) -> Result<AccessControl<MemoryPod>> {
    let access_control = get_access_control_for(resource, None, pod.clone()).await?;
    assert_eq!(access_control.protocol(), Protocol::Wac);
    Ok(access_control)
}

#[tokio::test]
async fn it_lists_the_agents_named_in_the_acl() -> Result<()> {
    let pod = MemoryPod::new("https://example.org/", AccessProtocol::Wac)?;
    pod.initialize("https://example.org/photo.jpg", "image/jpeg", vec![0xff, 0xd8])
        .await?;
    store(
        &pod,
        "https://example.org/photo.jpg.acl",
        vec![authorization(
            "https://example.org/photo.jpg.acl#alice",
            "https://example.org/photo.jpg",
            "https://alice.example.org/profile/card#me",
            &[acl::READ],
        )],
    )
    .await?;

    let resource = Iri::parse("https://example.org/photo.jpg")?;
    let permissions = strategy(&pod, &resource).await?.get_permissions().await?;

    assert_eq!(
        permissions,
        vec![NormalizedPermission::new(
            "https://alice.example.org/profile/card#me",
            VIEW
        )]
    );
    assert_eq!(permissions[0].alias, Alias::View);
    Ok(())
}

#[tokio::test]
async fn it_lists_nobody_when_the_acl_is_missing() -> Result<()> {
    let (pod, resource) = pod_with("https://pod.example/notes.txt").await?;

    let permissions = strategy(&pod, &resource).await?.get_permissions().await?;

    assert!(permissions.is_empty());
    Ok(())
}

#[tokio::test]
async fn it_saves_permissions_idempotently() -> Result<()> {
    let (pod, resource) = pod_with("https://pod.example/notes.txt").await?;
    let access_control = strategy(&pod, &resource).await?;
    let bob = Iri::parse(BOB)?;

    let saved = access_control.save_permissions_for_agent(&bob, EDIT).await?;
    let first = access_control.get_permissions().await?;
    access_control.save_permissions_for_agent(&bob, EDIT).await?;
    let second = access_control.get_permissions().await?;

    assert_eq!(saved.alias, Alias::Edit);
    assert_eq!(first, vec![NormalizedPermission::new(BOB, EDIT)]);
    assert_eq!(first, second);

    let acl = get_dataset(&Iri::parse("https://pod.example/notes.txt.acl")?, &pod).await?;
    assert_eq!(acl.things_of_type(acl::AUTHORIZATION).count(), 1);
    Ok(())
}

#[tokio::test]
async fn it_replaces_the_access_of_an_agent() -> Result<()> {
    let (pod, resource) = pod_with("https://pod.example/notes.txt").await?;
    store(
        &pod,
        "https://pod.example/notes.txt.acl",
        vec![
            authorization(
                "https://pod.example/notes.txt.acl#owner",
                resource.as_str(),
                ALICE,
                &[acl::READ, acl::WRITE, acl::APPEND, acl::CONTROL],
            ),
            authorization(
                "https://pod.example/notes.txt.acl#shared",
                resource.as_str(),
                BOB,
                &[acl::READ, acl::WRITE],
            ),
        ],
    )
    .await?;
    let access_control = strategy(&pod, &resource).await?;

    access_control
        .save_permissions_for_agent(&Iri::parse(BOB)?, VIEW)
        .await?;

    assert_eq!(
        access_control.get_permissions().await?,
        vec![
            NormalizedPermission::new(ALICE, AccessMap::FULL),
            NormalizedPermission::new(BOB, VIEW),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn it_revokes_everything_when_saving_empty_access() -> Result<()> {
    let (pod, resource) = pod_with("https://pod.example/notes.txt").await?;
    let access_control = strategy(&pod, &resource).await?;
    let alice = Iri::parse(ALICE)?;
    let bob = Iri::parse(BOB)?;

    access_control
        .save_permissions_for_agent(&alice, AccessMap::FULL)
        .await?;
    access_control.save_permissions_for_agent(&bob, VIEW).await?;
    let revoked = access_control
        .save_permissions_for_agent(&bob, AccessMap::EMPTY)
        .await?;

    assert_eq!(revoked.alias, Alias::None);
    assert_eq!(
        access_control.get_permissions().await?,
        vec![NormalizedPermission::new(ALICE, AccessMap::FULL)]
    );
    Ok(())
}

#[tokio::test]
async fn it_revokes_and_regrants_public_access() -> Result<()> {
    let (pod, resource) = pod_with("https://pod.example/notes.txt").await?;
    store(
        &pod,
        "https://pod.example/notes.txt.acl",
        vec![
            Thing::new("https://pod.example/notes.txt.acl#public")
                .with_iri(rdf::TYPE, acl::AUTHORIZATION)
                .with_iri(acl::ACCESS_TO, resource.as_str())
                .with_iri(acl::AGENT_CLASS, foaf::AGENT)
                .with_iri(acl::MODE, acl::READ),
        ],
    )
    .await?;
    let access_control = strategy(&pod, &resource).await?;

    let listed = access_control.get_permissions().await?;
    assert_eq!(listed, vec![NormalizedPermission::new(foaf::AGENT, VIEW)]);

    let public = Iri::parse(&listed[0].web_id)?;
    access_control
        .save_permissions_for_agent(&public, AccessMap::EMPTY)
        .await?;
    assert!(access_control.get_permissions().await?.is_empty());

    access_control.save_permissions_for_agent(&public, VIEW).await?;
    assert_eq!(
        access_control.get_permissions().await?,
        vec![NormalizedPermission::new(foaf::AGENT, VIEW)]
    );

    let acl = get_dataset(&Iri::parse("https://pod.example/notes.txt.acl")?, &pod).await?;
    let granted: Vec<_> = acl.things_of_type(acl::AUTHORIZATION).collect();
    assert_eq!(granted.len(), 1);
    assert!(granted[0].has_iri(acl::AGENT_CLASS, foaf::AGENT));
    assert!(granted[0].values(acl::AGENT).is_empty());
    Ok(())
}

#[tokio::test]
async fn it_seeds_a_new_acl_from_the_closest_ancestor() -> Result<()> {
    let (pod, resource) = pod_with("https://pod.example/docs/notes.txt").await?;
    store(
        &pod,
        "https://pod.example/.acl",
        vec![
            authorization(
                "https://pod.example/.acl#owner",
                "https://pod.example/",
                ALICE,
                &[acl::READ, acl::WRITE, acl::APPEND, acl::CONTROL],
            )
            .with_iri(acl::DEFAULT, "https://pod.example/"),
        ],
    )
    .await?;
    let access_control = strategy(&pod, &resource).await?;

    access_control
        .save_permissions_for_agent(&Iri::parse(BOB)?, VIEW)
        .await?;

    assert_eq!(
        access_control.get_permissions().await?,
        vec![
            NormalizedPermission::new(ALICE, AccessMap::FULL),
            NormalizedPermission::new(BOB, VIEW),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn it_surfaces_rejected_writes() -> Result<()> {
    let (pod, resource) = pod_with("https://pod.example/notes.txt").await?;
    let access_control = strategy(&pod, &resource).await?;
    pod.fail_next(Method::PUT, StatusCode::FORBIDDEN).await;

    let error = access_control
        .save_permissions_for_agent(&Iri::parse(BOB)?, VIEW)
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::FORBIDDEN));
    assert!(pod.resource("https://pod.example/notes.txt.acl").await.is_none());
    Ok(())
}

#[tokio::test]
async fn it_has_no_default_permissions() -> Result<()> {
    let (pod, _) = pod_with("https://pod.example/docs/notes.txt").await?;
    let container = Iri::parse("https://pod.example/docs/")?;
    let access_control = strategy(&pod, &container).await?;

    assert_eq!(access_control.get_default_permissions().await?, None);
    assert_eq!(
        access_control
            .save_default_permissions(&Iri::parse(BOB)?, VIEW)
            .await?,
        None
    );
    assert!(pod.resource("https://pod.example/docs/.acl").await.is_none());
    Ok(())
}

#[tokio::test]
async fn it_deletes_the_resource() -> Result<()> {
    let (pod, resource) = pod_with("https://pod.example/notes.txt").await?;
    let access_control = strategy(&pod, &resource).await?;

    access_control.delete_file().await?;

    assert!(pod.resource(resource.as_str()).await.is_none());
    Ok(())
}
