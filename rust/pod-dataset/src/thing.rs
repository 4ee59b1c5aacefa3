use std::collections::BTreeMap;

use pod_common::vocab::rdf;

use crate::Term;

/// A subject and every statement made about it within one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thing {
    iri: String,
    properties: BTreeMap<String, Vec<Term>>,
}

impl Thing {
    /// A thing with no statements
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            properties: BTreeMap::new(),
        }
    }

    /// The subject
    pub fn iri(&self) -> &str {
        &self.iri
    }

    /// Whether nothing is said about the subject
    pub fn is_empty(&self) -> bool {
        self.properties.values().all(Vec::is_empty)
    }

    /// Every predicate with at least one object
    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, objects)| !objects.is_empty())
            .map(|(predicate, _)| predicate.as_str())
    }

    /// All objects of `predicate`
    pub fn values(&self, predicate: &str) -> &[Term] {
        self.properties
            .get(predicate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The node objects of `predicate`
    pub fn iris<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.values(predicate).iter().filter_map(Term::as_iri)
    }

    /// The first literal object of `predicate`
    pub fn literal(&self, predicate: &str) -> Option<&str> {
        self.values(predicate).iter().find_map(Term::as_literal)
    }

    /// Whether `predicate` links this thing to `iri`
    pub fn has_iri(&self, predicate: &str, iri: &str) -> bool {
        self.iris(predicate).any(|candidate| candidate == iri)
    }

    /// The `rdf:type`s of this thing
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.iris(rdf::TYPE)
    }

    /// Whether this thing is typed as `class`
    pub fn has_type(&self, class: &str) -> bool {
        self.has_iri(rdf::TYPE, class)
    }

    /// Add an object, ignoring duplicates
    pub fn add(&mut self, predicate: impl Into<String>, object: Term) {
        let objects = self.properties.entry(predicate.into()).or_default();
        if !objects.contains(&object) {
            objects.push(object);
        }
    }

    /// Link this thing to `iri` through `predicate`
    pub fn add_iri(&mut self, predicate: impl Into<String>, iri: impl Into<String>) {
        self.add(predicate, Term::iri(iri));
    }

    /// Add a string literal
    pub fn add_literal(&mut self, predicate: impl Into<String>, value: impl Into<String>) {
        self.add(predicate, Term::literal(value));
    }

    /// Remove the link to `iri` through `predicate`, reporting whether it
    /// existed
    pub fn remove_iri(&mut self, predicate: &str, iri: &str) -> bool {
        let Some(objects) = self.properties.get_mut(predicate) else {
            return false;
        };
        let before = objects.len();
        objects.retain(|object| object.as_iri() != Some(iri));
        let removed = objects.len() != before;
        if objects.is_empty() {
            self.properties.remove(predicate);
        }
        removed
    }

    /// Remove every object of `predicate`
    pub fn remove_all(&mut self, predicate: &str) {
        self.properties.remove(predicate);
    }

    /// Replace the objects of `predicate` with links to `iris`
    pub fn set_iris<I, S>(&mut self, predicate: &str, iris: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remove_all(predicate);
        for iri in iris {
            self.add_iri(predicate, iri);
        }
    }

    /// Builder form of [Thing::add_iri]
    pub fn with_iri(mut self, predicate: impl Into<String>, iri: impl Into<String>) -> Self {
        self.add_iri(predicate, iri);
        self
    }

    /// Builder form of [Thing::add_literal]
    pub fn with_literal(mut self, predicate: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_literal(predicate, value);
        self
    }

    pub(crate) fn properties(&self) -> &BTreeMap<String, Vec<Term>> {
        &self.properties
    }
}
