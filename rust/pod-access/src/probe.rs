use pod_fetch::ResourceInfo;

/// Whether the resource links to an ACP Access Control Resource
pub fn has_linked_acr(resource: &ResourceInfo) -> bool {
    resource.acr.is_some()
}

/// Whether the resource links to a WAC ACL document
pub fn has_accessible_acl(resource: &ResourceInfo) -> bool {
    resource.acl.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_common::Iri;

    fn resource() -> ResourceInfo {
        ResourceInfo::new(Iri::parse("https://pod.example/photo.jpg").unwrap())
    }

    #[test]
    fn it_detects_nothing_without_links() {
        let resource = resource();

        assert!(!has_linked_acr(&resource));
        assert!(!has_accessible_acl(&resource));
    }

    #[test]
    fn it_probes_each_protocol_independently() {
        let acl = Iri::parse("https://pod.example/photo.jpg.acl").unwrap();
        let acr = Iri::parse("https://pod.example/photo.jpg.acr").unwrap();

        let wac = resource().with_acl(acl.clone());
        assert!(has_accessible_acl(&wac));
        assert!(!has_linked_acr(&wac));

        let acp = resource().with_acr(acr.clone());
        assert!(has_linked_acr(&acp));
        assert!(!has_accessible_acl(&acp));

        let both = resource().with_acl(acl).with_acr(acr);
        assert!(has_linked_acr(&both));
        assert!(has_accessible_acl(&both));
    }
}
