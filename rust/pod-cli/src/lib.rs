//! The `pod-permissions` command line tool.
//!
//! Commands run against any [Fetch], writing their report to the given
//! output, so the binary only has to parse flags and wire up [HttpFetch].
//!
//! [HttpFetch]: pod_fetch::HttpFetch

use std::io::Write;

use anyhow::{Result, anyhow, bail};
use pod_access::{
    AccessControlStrategy, NormalizedPermission, get_access_control_for, has_accessible_acl,
    has_linked_acr, is_empty_access, resolve_profiles,
};
use pod_common::Iri;
use pod_fetch::{Fetch, get_resource_info};

mod cli;
pub use cli::*;

/// Run `command`, reporting to `out`
pub async fn run<F, W>(
    command: &Command,
    policies_container: Option<Iri>,
    fetch: F,
    out: &mut W,
) -> Result<()>
where
    F: Fetch + Clone,
    W: Write,
{
    match command {
        Command::Probe { resource } => {
            let resource = get_resource_info(&Iri::parse(resource)?, &fetch).await?;
            let protocol = if has_linked_acr(&resource) {
                "ACP"
            } else if has_accessible_acl(&resource) {
                "WAC"
            } else {
                "none"
            };
            writeln!(out, "{}: {}", resource.iri, protocol)?;
            if let Some(acr) = &resource.acr {
                writeln!(out, "  acr: {acr}")?;
            }
            if let Some(acl) = &resource.acl {
                writeln!(out, "  acl: {acl}")?;
            }
        }

        Command::List {
            resource,
            profiles,
            default,
        } => {
            let resource = Iri::parse(resource)?;
            let access_control =
                get_access_control_for(&resource, policies_container, fetch.clone()).await?;

            let mut permissions = if *default {
                access_control
                    .get_default_permissions()
                    .await?
                    .ok_or_else(|| anyhow!("{resource} has no member access to list"))?
            } else {
                access_control.get_permissions().await?
            };
            if *profiles {
                permissions = resolve_profiles(permissions, &fetch).await;
            }

            if permissions.is_empty() {
                writeln!(out, "Nobody has access to {resource}")?;
            }
            for permission in &permissions {
                writeln!(out, "{}", describe(permission))?;
            }
        }

        Command::Set {
            resource,
            web_id,
            modes,
            default,
        } => {
            let access = modes.access();
            if is_empty_access(&access) {
                bail!(
                    "Choose at least one of --read, --write, --append or --control; \
                     revoking all access is not supported from here"
                );
            }

            let resource = Iri::parse(resource)?;
            let web_id = Iri::parse(web_id)?;
            let access_control = get_access_control_for(&resource, policies_container, fetch).await?;

            let saved = if *default {
                access_control
                    .save_default_permissions(&web_id, access)
                    .await?
                    .ok_or_else(|| {
                        anyhow!(
                            "{resource} does not support member access through {}",
                            access_control.protocol()
                        )
                    })?
            } else {
                access_control
                    .save_permissions_for_agent(&web_id, access)
                    .await?
            };
            writeln!(out, "Saved {}", describe(&saved))?;
        }

        Command::Delete { resource } => {
            let resource = Iri::parse(resource)?;
            let access_control = get_access_control_for(&resource, policies_container, fetch).await?;
            access_control.delete_file().await?;
            writeln!(out, "Deleted {resource}")?;
        }
    }

    Ok(())
}

fn describe(permission: &NormalizedPermission) -> String {
    let name = permission
        .profile
        .as_ref()
        .and_then(|profile| profile.name.as_deref())
        .map(|name| format!(" ({name})"))
        .unwrap_or_default();

    format!(
        "{:<8} {}{} [{}]",
        permission.alias.as_str(),
        permission.web_id,
        name,
        permission.acl.name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pod_fetch::helpers::{AccessProtocol, MemoryPod};
    use pretty_assertions::assert_eq;

    const NOTES: &str = "https://pod.example/docs/notes.txt";
    const BOB: &str = "https://bob.example/profile/card#me";

    async fn pod(protocol: AccessProtocol) -> MemoryPod {
        let pod = MemoryPod::new("https://pod.example/", protocol).unwrap();
        pod.initialize(NOTES, "text/plain", b"hello".to_vec())
            .await
            .unwrap();
        pod
    }

    async fn execute(pod: &MemoryPod, args: &[&str]) -> Result<String> {
        let cli = PermissionsCli::try_parse_from(
            std::iter::once("pod-permissions").chain(args.iter().copied()),
        )?;
        let mut out = Vec::new();
        run(&cli.command, cli.policies_container()?, pod.clone(), &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn it_parses_global_flags_after_the_command() {
        let cli = PermissionsCli::try_parse_from([
            "pod-permissions",
            "set",
            NOTES,
            BOB,
            "--read",
            "--append",
            "--token",
            "secret",
        ])
        .unwrap();

        assert_eq!(cli.token.as_deref(), Some("secret"));
        let Command::Set { modes, default, .. } = cli.command else {
            panic!("Expected the set command");
        };
        assert_eq!(modes.access(), pod_access::AccessMap::new(true, false, true, false));
        assert!(!default);
    }

    #[tokio::test]
    async fn it_sets_and_lists_permissions() {
        let pod = pod(AccessProtocol::Wac).await;

        let saved = execute(&pod, &["set", NOTES, BOB, "--read"]).await.unwrap();
        let listed = execute(&pod, &["list", NOTES]).await.unwrap();

        assert_eq!(saved, format!("Saved View     {BOB} [read]\n"));
        assert_eq!(listed, format!("View     {BOB} [read]\n"));
    }

    #[tokio::test]
    async fn it_rejects_setting_empty_access() {
        let pod = pod(AccessProtocol::Acp).await;

        let error = execute(&pod, &["set", NOTES, BOB]).await.unwrap_err();

        assert!(error.to_string().contains("at least one"));
        assert!(pod.requests().await.is_empty());
    }

    #[tokio::test]
    async fn it_probes_the_protocol() {
        let pod = pod(AccessProtocol::Acp).await;

        let report = execute(&pod, &["probe", NOTES]).await.unwrap();

        assert_eq!(
            report,
            format!("{NOTES}: ACP\n  acr: {NOTES}.acr\n")
        );
    }

    #[tokio::test]
    async fn it_reports_missing_access_control() {
        let pod = pod(AccessProtocol::Neither).await;

        let error = execute(&pod, &["list", NOTES]).await.unwrap_err();

        assert_eq!(error.to_string(), pod_access::NO_ACCESS_POLICY_ERROR);
    }

    #[tokio::test]
    async fn it_refuses_member_access_on_plain_resources() {
        let pod = pod(AccessProtocol::Acp).await;

        let error = execute(&pod, &["set", NOTES, BOB, "--read", "--default"])
            .await
            .unwrap_err();

        assert!(error.to_string().contains("member access"));
    }

    #[tokio::test]
    async fn it_deletes_resources() {
        let pod = pod(AccessProtocol::Wac).await;

        let report = execute(&pod, &["delete", NOTES]).await.unwrap();

        assert_eq!(report, format!("Deleted {NOTES}\n"));
        assert!(pod.resource(NOTES).await.is_none());
    }
}
