use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors produced while parsing or deriving IRIs
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IriError {
    /// The input is not an absolute IRI
    #[error("Invalid IRI '{iri}': {reason}")]
    Invalid {
        /// The rejected input
        iri: String,
        /// Why it was rejected
        reason: String,
    },

    /// The IRI cannot act as a base for resolving references (e.g. `mailto:`)
    #[error("IRI '{0}' cannot be used as a base")]
    NotABase(String),
}

/// An absolute IRI identifying a resource, an agent or a vocabulary term.
///
/// Containers are recognised by the trailing `/` of their path, which is how
/// Solid servers name them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri(Url);

impl Iri {
    /// Parse an absolute IRI
    pub fn parse(iri: impl AsRef<str>) -> Result<Self, IriError> {
        let iri = iri.as_ref();
        Url::parse(iri).map(Self).map_err(|error| IriError::Invalid {
            iri: iri.to_string(),
            reason: error.to_string(),
        })
    }

    /// The IRI as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The underlying URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Whether this IRI names a container
    pub fn is_container(&self) -> bool {
        self.0.path().ends_with('/')
    }

    /// The fragment identifier, if any
    pub fn fragment(&self) -> Option<&str> {
        self.0.fragment()
    }

    /// The IRI of the document this IRI lives in (fragment removed)
    pub fn without_fragment(&self) -> Iri {
        let mut url = self.0.clone();
        url.set_fragment(None);
        Iri(url)
    }

    /// A sibling IRI within the same document, addressed by `fragment`
    pub fn with_fragment(&self, fragment: &str) -> Iri {
        let mut url = self.0.clone();
        url.set_fragment(Some(fragment));
        Iri(url)
    }

    /// Resolve a (possibly relative) reference against this IRI
    pub fn join(&self, reference: &str) -> Result<Iri, IriError> {
        if self.0.cannot_be_a_base() {
            return Err(IriError::NotABase(self.0.to_string()));
        }

        self.0
            .join(reference)
            .map(Iri)
            .map_err(|error| IriError::Invalid {
                iri: reference.to_string(),
                reason: error.to_string(),
            })
    }

    /// The container directly enclosing this resource, or `None` at the
    /// root of the origin
    pub fn parent(&self) -> Option<Iri> {
        let path = self.0.path();
        if path == "/" || path.is_empty() {
            return None;
        }

        let trimmed = path.strip_suffix('/').unwrap_or(path);
        let cut = trimmed.rfind('/')?;

        let mut url = self.0.clone();
        url.set_fragment(None);
        url.set_query(None);
        url.set_path(&trimmed[..=cut]);
        Some(Iri(url))
    }

    /// Whether this IRI is the given container or lies beneath it
    pub fn is_within(&self, container: &Iri) -> bool {
        container.is_container() && self.as_str().starts_with(container.as_str())
    }

    /// The part of this IRI that follows `base`, when this IRI starts with it
    pub fn relative_to(&self, base: &Iri) -> Option<&str> {
        self.as_str().strip_prefix(base.as_str())
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Iri::parse(s)
    }
}

impl TryFrom<String> for Iri {
    type Error = IriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Iri::parse(value)
    }
}

impl TryFrom<&str> for Iri {
    type Error = IriError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Iri::parse(value)
    }
}

impl From<Iri> for String {
    fn from(value: Iri) -> Self {
        value.0.into()
    }
}

impl From<Url> for Iri {
    fn from(value: Url) -> Self {
        Iri(value)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_recognises_containers() {
        let container = Iri::parse("https://pod.example/photos/").unwrap();
        let file = Iri::parse("https://pod.example/photos/cat.jpg").unwrap();

        assert!(container.is_container());
        assert!(!file.is_container());
    }

    #[test]
    fn it_walks_up_to_the_root() {
        let file = Iri::parse("https://pod.example/a/b/c.txt").unwrap();

        let b = file.parent().unwrap();
        assert_eq!(b.as_str(), "https://pod.example/a/b/");

        let a = b.parent().unwrap();
        assert_eq!(a.as_str(), "https://pod.example/a/");

        let root = a.parent().unwrap();
        assert_eq!(root.as_str(), "https://pod.example/");
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn it_drops_fragments_and_queries_from_parents() {
        let me = Iri::parse("https://pod.example/profile/card?x=1#me").unwrap();
        assert_eq!(me.parent().unwrap().as_str(), "https://pod.example/profile/");
        assert_eq!(
            me.without_fragment().as_str(),
            "https://pod.example/profile/card?x=1"
        );
    }

    #[test]
    fn it_resolves_relative_references() {
        let base = Iri::parse("https://pod.example/photos/cat.jpg").unwrap();

        assert_eq!(
            base.join("cat.jpg.acl").unwrap().as_str(),
            "https://pod.example/photos/cat.jpg.acl"
        );
        assert_eq!(
            base.join("#owner").unwrap().as_str(),
            "https://pod.example/photos/cat.jpg#owner"
        );
    }

    #[test]
    fn it_knows_what_lies_within_a_container() {
        let container = Iri::parse("https://pod.example/pb_policies/").unwrap();
        let policy = Iri::parse("https://pod.example/pb_policies/cat.jpg.jsonld#read").unwrap();
        let elsewhere = Iri::parse("https://other.example/pb_policies/x").unwrap();

        assert!(policy.is_within(&container));
        assert!(!elsewhere.is_within(&container));
        assert_eq!(policy.relative_to(&container), Some("cat.jpg.jsonld#read"));
    }

    #[test]
    fn it_rejects_relative_input() {
        assert!(matches!(
            Iri::parse("photos/cat.jpg"),
            Err(IriError::Invalid { .. })
        ));
    }

    #[test]
    fn it_serializes_as_a_plain_string() {
        let iri = Iri::parse("https://pod.example/alice#me").unwrap();
        let json = serde_json::to_string(&iri).unwrap();
        assert_eq!(json, "\"https://pod.example/alice#me\"");

        let parsed: Iri = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, iri);
    }
}
