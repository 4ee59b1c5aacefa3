use pod_common::vocab::acl;

/// The four access modes an agent can hold on a resource.
///
/// This is the editable form of a permission; [crate::Alias] names the
/// common combinations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AccessMap {
    /// May read the resource
    pub read: bool,
    /// May modify or delete the resource
    pub write: bool,
    /// May add to the resource
    pub append: bool,
    /// May read and change who has access to the resource
    pub control: bool,
}

impl AccessMap {
    /// Every mode
    pub const FULL: AccessMap = AccessMap::new(true, true, true, true);

    /// No mode at all
    pub const EMPTY: AccessMap = AccessMap::new(false, false, false, false);

    /// An access map holding the given modes
    pub const fn new(read: bool, write: bool, append: bool, control: bool) -> Self {
        Self {
            read,
            write,
            append,
            control,
        }
    }

    /// Read the modes out of `acl:Read`-style mode IRIs; unknown modes are
    /// ignored
    pub fn from_modes<'a>(modes: impl IntoIterator<Item = &'a str>) -> Self {
        modes
            .into_iter()
            .fold(AccessMap::EMPTY, |mut access, mode| {
                match mode {
                    acl::READ => access.read = true,
                    acl::WRITE => access.write = true,
                    acl::APPEND => access.append = true,
                    acl::CONTROL => access.control = true,
                    _ => {}
                }
                access
            })
    }

    /// The mode IRIs held, in the order read, write, append, control
    pub fn modes(&self) -> Vec<&'static str> {
        [
            (self.read, acl::READ),
            (self.write, acl::WRITE),
            (self.append, acl::APPEND),
            (self.control, acl::CONTROL),
        ]
        .into_iter()
        .filter_map(|(held, mode)| held.then_some(mode))
        .collect()
    }

    /// Whether no mode is held
    pub fn is_empty(&self) -> bool {
        !(self.read || self.write || self.append || self.control)
    }

    /// The modes held in either map
    pub fn union(self, other: AccessMap) -> AccessMap {
        AccessMap::new(
            self.read || other.read,
            self.write || other.write,
            self.append || other.append,
            self.control || other.control,
        )
    }

    /// The modes of this map that `other` does not hold
    pub fn without(self, other: AccessMap) -> AccessMap {
        AccessMap::new(
            self.read && !other.read,
            self.write && !other.write,
            self.append && !other.append,
            self.control && !other.control,
        )
    }

    /// A stable, readable name for this combination such as
    /// `read-write-append`; `none` when empty
    pub fn name(&self) -> String {
        let names: Vec<&str> = [
            (self.read, "read"),
            (self.write, "write"),
            (self.append, "append"),
            (self.control, "control"),
        ]
        .into_iter()
        .filter_map(|(held, name)| held.then_some(name))
        .collect();

        if names.is_empty() {
            "none".to_string()
        } else {
            names.join("-")
        }
    }
}

/// Whether `access` grants nothing.
///
/// Permission forms call this before saving: an empty map is a request to
/// revoke, which the strategies carry out if asked.
pub fn is_empty_access(access: &AccessMap) -> bool {
    access.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_reads_mode_iris() {
        let access = AccessMap::from_modes([acl::READ, acl::APPEND, "https://example.org/Other"]);

        assert_eq!(access, AccessMap::new(true, false, true, false));
        assert_eq!(access.modes(), vec![acl::READ, acl::APPEND]);
    }

    #[test]
    fn it_combines_access() {
        let view = AccessMap::new(true, false, false, false);
        let edit = AccessMap::new(false, true, true, false);

        assert_eq!(view.union(edit), AccessMap::new(true, true, true, false));
        assert_eq!(AccessMap::FULL.without(edit), AccessMap::new(true, false, false, true));
    }

    #[test]
    fn it_names_combinations() {
        assert_eq!(AccessMap::FULL.name(), "read-write-append-control");
        assert_eq!(AccessMap::new(true, false, true, false).name(), "read-append");
        assert_eq!(AccessMap::EMPTY.name(), "none");
    }

    #[test]
    fn it_recognises_empty_access() {
        assert!(is_empty_access(&AccessMap::default()));
        assert!(!is_empty_access(&AccessMap::new(false, false, false, true)));
    }
}
