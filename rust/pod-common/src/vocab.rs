//! Linked-data vocabulary terms used by pods to describe resources and the
//! access granted to them.

/// RDF core terms
pub mod rdf {
    /// `rdf:type`
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// Web Access Control
pub mod acl {
    #![allow(missing_docs)]

    pub const NAMESPACE: &str = "http://www.w3.org/ns/auth/acl#";

    pub const AUTHORIZATION: &str = "http://www.w3.org/ns/auth/acl#Authorization";
    pub const ACCESS_TO: &str = "http://www.w3.org/ns/auth/acl#accessTo";
    pub const DEFAULT: &str = "http://www.w3.org/ns/auth/acl#default";
    pub const AGENT: &str = "http://www.w3.org/ns/auth/acl#agent";
    pub const AGENT_CLASS: &str = "http://www.w3.org/ns/auth/acl#agentClass";
    pub const AGENT_GROUP: &str = "http://www.w3.org/ns/auth/acl#agentGroup";
    pub const ORIGIN: &str = "http://www.w3.org/ns/auth/acl#origin";
    pub const MODE: &str = "http://www.w3.org/ns/auth/acl#mode";
    pub const AUTHENTICATED_AGENT: &str = "http://www.w3.org/ns/auth/acl#AuthenticatedAgent";

    pub const READ: &str = "http://www.w3.org/ns/auth/acl#Read";
    pub const WRITE: &str = "http://www.w3.org/ns/auth/acl#Write";
    pub const APPEND: &str = "http://www.w3.org/ns/auth/acl#Append";
    pub const CONTROL: &str = "http://www.w3.org/ns/auth/acl#Control";

    /// Relation type of the `Link` header pointing at a resource's ACL
    pub const LINK_REL: &str = "acl";
}

/// Access Control Policies
pub mod acp {
    #![allow(missing_docs)]

    pub const NAMESPACE: &str = "http://www.w3.org/ns/solid/acp#";

    pub const ACCESS_CONTROL_RESOURCE: &str =
        "http://www.w3.org/ns/solid/acp#AccessControlResource";
    pub const ACCESS_CONTROL_CLASS: &str = "http://www.w3.org/ns/solid/acp#AccessControl";
    pub const ACCESS_CONTROL: &str = "http://www.w3.org/ns/solid/acp#accessControl";
    pub const MEMBER_ACCESS_CONTROL: &str = "http://www.w3.org/ns/solid/acp#memberAccessControl";
    pub const RESOURCE: &str = "http://www.w3.org/ns/solid/acp#resource";
    pub const APPLY: &str = "http://www.w3.org/ns/solid/acp#apply";

    pub const POLICY: &str = "http://www.w3.org/ns/solid/acp#Policy";
    pub const ALLOW: &str = "http://www.w3.org/ns/solid/acp#allow";
    pub const DENY: &str = "http://www.w3.org/ns/solid/acp#deny";
    pub const ALL_OF: &str = "http://www.w3.org/ns/solid/acp#allOf";
    pub const ANY_OF: &str = "http://www.w3.org/ns/solid/acp#anyOf";
    pub const NONE_OF: &str = "http://www.w3.org/ns/solid/acp#noneOf";

    pub const MATCHER: &str = "http://www.w3.org/ns/solid/acp#Matcher";
    pub const AGENT: &str = "http://www.w3.org/ns/solid/acp#agent";
    /// Matches every agent, authenticated or not
    pub const PUBLIC_AGENT: &str = "http://www.w3.org/ns/solid/acp#PublicAgent";
    /// Matches any authenticated agent
    pub const AUTHENTICATED_AGENT: &str = "http://www.w3.org/ns/solid/acp#AuthenticatedAgent";

    /// Relation type of the `Link` header pointing at a resource's ACR
    pub const LINK_REL: &str = ACCESS_CONTROL;
}

/// Friend of a Friend
pub mod foaf {
    #![allow(missing_docs)]

    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";
    /// The class of all agents, used by WAC to grant public access
    pub const AGENT: &str = "http://xmlns.com/foaf/0.1/Agent";
}

/// vCard
pub mod vcard {
    #![allow(missing_docs)]

    pub const FN: &str = "http://www.w3.org/2006/vcard/ns#fn";
    pub const HAS_PHOTO: &str = "http://www.w3.org/2006/vcard/ns#hasPhoto";
}

/// Linked Data Platform
pub mod ldp {
    #![allow(missing_docs)]

    pub const RESOURCE: &str = "http://www.w3.org/ns/ldp#Resource";
    pub const CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
    pub const BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
    pub const CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
}

/// Personal Information Management storage terms
pub mod pim {
    /// Marks the root container of a pod
    pub const STORAGE: &str = "http://www.w3.org/ns/pim/space#Storage";
}
