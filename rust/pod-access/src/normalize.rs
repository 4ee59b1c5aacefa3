use std::collections::BTreeMap;
use std::fmt::Display;

use crate::{AccessMap, Profile};

/// Named access levels shown for an agent.
///
/// Every [AccessMap] maps to exactly one alias:
///
/// | read | write | append | control | alias   |
/// |------|-------|--------|---------|---------|
/// | ✓    | ✓     | ✓      | ✓       | Control |
/// | ✓    | ✓     | ✓      |         | Edit    |
/// | ✓    |       | ✓      |         | Append  |
/// | ✓    |       |        |         | View    |
/// |      |       |        |         | None    |
///
/// Any other combination is `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alias {
    /// Full access, including managing permissions
    Control,
    /// Read and modify
    Edit,
    /// Read and add
    Append,
    /// Read only
    View,
    /// No access
    None,
    /// A combination without a name
    Custom,
}

impl Alias {
    /// The alias naming `access`
    pub fn from_access(access: &AccessMap) -> Self {
        match (access.read, access.write, access.append, access.control) {
            (true, true, true, true) => Alias::Control,
            (true, true, true, false) => Alias::Edit,
            (true, false, true, false) => Alias::Append,
            (true, false, false, false) => Alias::View,
            (false, false, false, false) => Alias::None,
            _ => Alias::Custom,
        }
    }

    /// The access map an alias stands for; `Custom` stands for none in
    /// particular
    pub fn access(&self) -> Option<AccessMap> {
        match self {
            Alias::Control => Some(AccessMap::FULL),
            Alias::Edit => Some(AccessMap::new(true, true, true, false)),
            Alias::Append => Some(AccessMap::new(true, false, true, false)),
            Alias::View => Some(AccessMap::new(true, false, false, false)),
            Alias::None => Some(AccessMap::EMPTY),
            Alias::Custom => None,
        }
    }

    /// The alias as displayed
    pub fn as_str(&self) -> &'static str {
        match self {
            Alias::Control => "Control",
            Alias::Edit => "Edit",
            Alias::Append => "Append",
            Alias::View => "View",
            Alias::None => "None",
            Alias::Custom => "Custom",
        }
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AccessMap> for Alias {
    fn from(access: AccessMap) -> Self {
        Alias::from_access(&access)
    }
}

/// One agent's access to a resource, whichever protocol granted it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPermission {
    /// The agent, or an agent class such as `foaf:Agent`
    pub web_id: String,
    /// Name of the access level
    pub alias: Alias,
    /// The modes held
    pub acl: AccessMap,
    /// The agent's profile, once resolved
    pub profile: Option<Profile>,
}

impl NormalizedPermission {
    /// The permission `acl` grants `web_id`
    pub fn new(web_id: impl Into<String>, acl: AccessMap) -> Self {
        Self {
            web_id: web_id.into(),
            alias: Alias::from_access(&acl),
            acl,
            profile: None,
        }
    }

    /// Attach the agent's profile
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }
}

/// Normalize per-agent access into [NormalizedPermission]s.
///
/// Entries for the same agent are merged. Agents left without any mode are
/// dropped, since they hold no access. The result is ordered by ascending
/// WebID; displays that want another order reverse or sort it themselves.
pub fn normalize_permissions<I, S>(entries: I) -> Vec<NormalizedPermission>
where
    I: IntoIterator<Item = (S, AccessMap)>,
    S: Into<String>,
{
    let mut merged: BTreeMap<String, AccessMap> = BTreeMap::new();
    for (web_id, access) in entries {
        let entry = merged.entry(web_id.into()).or_default();
        *entry = entry.union(access);
    }

    merged
        .into_iter()
        .filter(|(_, access)| !access.is_empty())
        .map(|(web_id, access)| NormalizedPermission::new(web_id, access))
        .collect()
}
