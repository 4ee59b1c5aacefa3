use pod_access::{
    AccessControlError, AccessControlStrategy, NO_ACCESS_POLICY_ERROR, Protocol,
    get_access_control, get_access_control_for,
};
use pod_common::Iri;
use pod_fetch::helpers::{AccessProtocol, MemoryPod};
use pod_fetch::{FetchError, ResourceInfo};
use testresult::TestResult;

const NOTES: &str = "https://pod.example/docs/notes.txt";

async fn pod(protocol: AccessProtocol) -> Result<MemoryPod, FetchError> {
    let pod = MemoryPod::new("https://pod.example/", protocol)?;
    pod.initialize(NOTES, "text/plain", b"hello".to_vec()).await?;
    Ok(pod)
}

#[tokio::test]
async fn it_selects_acp_for_resources_with_an_acr() -> TestResult {
    let pod = pod(AccessProtocol::Acp).await?;

    let access_control = get_access_control_for(&Iri::parse(NOTES)?, None, pod).await?;

    assert_eq!(access_control.protocol(), Protocol::Acp);
    assert_eq!(access_control.resource().iri.as_str(), NOTES);
    Ok(())
}

#[tokio::test]
async fn it_selects_wac_for_resources_with_an_acl() -> TestResult {
    let pod = pod(AccessProtocol::Wac).await?;

    let access_control = get_access_control_for(&Iri::parse(NOTES)?, None, pod).await?;

    assert_eq!(access_control.protocol(), Protocol::Wac);
    Ok(())
}

#[tokio::test]
async fn it_prefers_acp_when_both_are_advertised() -> TestResult {
    let pod = pod(AccessProtocol::Both).await?;

    let access_control = get_access_control_for(&Iri::parse(NOTES)?, None, pod).await?;

    assert_eq!(access_control.protocol(), Protocol::Acp);
    Ok(())
}

#[tokio::test]
async fn it_reports_resources_without_access_control() -> TestResult {
    let pod = pod(AccessProtocol::Neither).await?;

    let error = get_access_control_for(&Iri::parse(NOTES)?, None, pod)
        .await
        .unwrap_err();

    assert!(error.is_no_access_policy());
    assert_eq!(error.to_string(), NO_ACCESS_POLICY_ERROR);
    Ok(())
}

#[tokio::test]
async fn it_selects_from_probed_metadata_alone() -> TestResult {
    let pod = MemoryPod::new("https://pod.example/", AccessProtocol::Neither)?;
    let resource = ResourceInfo::new(Iri::parse(NOTES)?)
        .with_acl(Iri::parse("https://pod.example/docs/notes.txt.acl")?);

    let access_control = get_access_control(resource, None, pod.clone()).await?;

    assert_eq!(access_control.protocol(), Protocol::Wac);
    assert!(pod.requests().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn it_propagates_initialization_failures() -> TestResult {
    let pod = MemoryPod::new("https://pod.example/", AccessProtocol::Acp)?;
    let resource = ResourceInfo::new(Iri::parse("https://elsewhere.example/notes.txt")?)
        .with_acr(Iri::parse("https://elsewhere.example/notes.txt.acr")?);

    let error = get_access_control(resource, None, pod).await.unwrap_err();

    assert!(matches!(
        error,
        AccessControlError::MissingPoliciesContainer(_)
    ));
    assert!(!error.is_no_access_policy());
    Ok(())
}

#[tokio::test]
async fn it_reports_missing_resources() -> TestResult {
    let pod = MemoryPod::new("https://pod.example/", AccessProtocol::Wac)?;

    let error = get_access_control_for(&Iri::parse(NOTES)?, None, pod)
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(http::StatusCode::NOT_FOUND));
    Ok(())
}
