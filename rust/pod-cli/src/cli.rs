use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use pod_access::AccessMap;
use pod_common::Iri;
use pod_fetch::{AuthMethod, HttpFetchConfig};

#[derive(Debug, Parser)]
#[command(name = "pod-permissions")]
#[command(bin_name = "pod-permissions")]
#[command(about = "Manage who can access resources in a Solid pod", long_about = None)]
pub struct PermissionsCli {
    /// Bearer token sent with every request
    #[arg(long, global = true, env = "POD_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Container holding ACP policies, instead of `pb_policies/` at the pod
    /// root
    #[arg(long, global = true, env = "POD_POLICIES_CONTAINER")]
    pub policies_container: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl PermissionsCli {
    /// Fetch configuration for the given flags
    pub fn fetch_config(&self) -> HttpFetchConfig {
        let auth = match &self.token {
            Some(token) => AuthMethod::Bearer(token.clone()),
            None => AuthMethod::None,
        };
        HttpFetchConfig::new()
            .with_auth(auth)
            .with_timeout(self.timeout)
    }

    /// The policies container, when one was given
    pub fn policies_container(&self) -> Result<Option<Iri>> {
        Ok(self
            .policies_container
            .as_deref()
            .map(Iri::parse)
            .transpose()?)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the agents holding access to a resource
    List {
        resource: String,

        /// Look up agents' names in their profiles
        #[arg(long)]
        profiles: bool,

        /// List access to the members of a container instead
        #[arg(long)]
        default: bool,
    },

    /// Replace the access an agent holds on a resource
    Set {
        resource: String,

        web_id: String,

        #[command(flatten)]
        modes: ModeFlags,

        /// Set access to the members of a container instead
        #[arg(long)]
        default: bool,
    },

    /// Delete a resource
    Delete { resource: String },

    /// Show which access control protocol protects a resource
    Probe { resource: String },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct ModeFlags {
    /// Grant read access
    #[arg(long)]
    pub read: bool,

    /// Grant write access
    #[arg(long)]
    pub write: bool,

    /// Grant append access
    #[arg(long)]
    pub append: bool,

    /// Grant control over who has access
    #[arg(long)]
    pub control: bool,
}

impl ModeFlags {
    pub fn access(&self) -> AccessMap {
        AccessMap::new(self.read, self.write, self.append, self.control)
    }
}
