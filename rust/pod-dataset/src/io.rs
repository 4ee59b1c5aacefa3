use pod_common::Iri;
use pod_fetch::{Fetch, JSON_LD, ensure_success, get, is_not_found, put};
use tracing::debug;

use crate::{Dataset, DatasetError};

/// Fetch the linked-data document holding `iri`.
///
/// Any fragment is ignored, so the IRI of a thing can be passed to load the
/// document describing it. A missing document is reported as
/// [DatasetError::NotFound].
pub async fn get_dataset<F>(iri: &Iri, fetch: &F) -> Result<Dataset, DatasetError>
where
    F: Fetch + ?Sized,
{
    let document = iri.without_fragment();
    let response = fetch.fetch(get(&document, JSON_LD)?).await?;

    if is_not_found(&response) {
        return Err(DatasetError::NotFound(document.to_string()));
    }

    let response = ensure_success(&document, response)?;
    if response.body().iter().all(u8::is_ascii_whitespace) {
        debug!("{} is empty", document);
        return Ok(Dataset::new());
    }

    Dataset::from_json_ld(response.body(), Some(&document))
}

/// Like [get_dataset], but a missing document yields `None`
pub async fn get_dataset_if_exists<F>(iri: &Iri, fetch: &F) -> Result<Option<Dataset>, DatasetError>
where
    F: Fetch + ?Sized,
{
    match get_dataset(iri, fetch).await {
        Ok(dataset) => Ok(Some(dataset)),
        Err(error) if error.is_not_found() => Ok(None),
        Err(error) => Err(error),
    }
}

/// Replace the document at `iri` with `dataset`
pub async fn save_dataset_at<F>(iri: &Iri, dataset: &Dataset, fetch: &F) -> Result<(), DatasetError>
where
    F: Fetch + ?Sized,
{
    let document = iri.without_fragment();
    let body = dataset.to_json_ld()?;

    debug!("Saving {} subjects to {}", dataset.len(), document);
    let response = fetch.fetch(put(&document, JSON_LD, body)?).await?;
    ensure_success(&document, response)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Thing;
    use pod_common::vocab::{acl, rdf};
    use pod_fetch::FetchError;
    use pod_fetch::helpers::{AccessProtocol, MemoryPod};

    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    async fn it_saves_and_reloads_a_dataset() -> anyhow::Result<()> {
        let pod = MemoryPod::new("https://pod.example/", AccessProtocol::Wac)?;
        let iri = Iri::parse("https://pod.example/.acl")?;

        let mut dataset = Dataset::new();
        dataset.set_thing(
            Thing::new("https://pod.example/.acl#owner")
                .with_iri(rdf::TYPE, acl::AUTHORIZATION)
                .with_iri(acl::ACCESS_TO, "https://pod.example/")
                .with_iri(acl::MODE, acl::CONTROL),
        );

        save_dataset_at(&iri, &dataset, &pod).await?;
        let loaded = get_dataset(&iri.with_fragment("owner"), &pod).await?;

        assert_eq!(loaded, dataset);
        Ok(())
    }

    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    async fn it_reports_missing_documents() -> anyhow::Result<()> {
        let pod = MemoryPod::new("https://pod.example/", AccessProtocol::Wac)?;
        let iri = Iri::parse("https://pod.example/missing.acl")?;

        let result = get_dataset(&iri, &pod).await;
        assert!(matches!(result, Err(DatasetError::NotFound(_))));
        assert_eq!(get_dataset_if_exists(&iri, &pod).await?, None);
        Ok(())
    }

    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    async fn it_surfaces_server_errors() -> anyhow::Result<()> {
        let pod = MemoryPod::new("https://pod.example/", AccessProtocol::Wac)?;
        let iri = Iri::parse("https://pod.example/profile")?;
        pod.initialize(iri.as_str(), JSON_LD, b"[]".to_vec()).await?;
        pod.fail_next(http::Method::GET, http::StatusCode::FORBIDDEN)
            .await;

        let result = get_dataset(&iri, &pod).await;
        assert!(matches!(
            result,
            Err(DatasetError::Fetch(FetchError::UnexpectedStatus { .. }))
        ));
        Ok(())
    }
}
