use std::collections::BTreeMap;

use pod_common::Iri;

use crate::{DatasetError, Thing, json_ld};

/// The statements held by one linked-data document, grouped by subject
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    things: BTreeMap<String, Thing>,
}

impl Dataset {
    /// An empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an expanded (or flattened) JSON-LD document.
    ///
    /// Relative `@id`s are resolved against `base`, which should be the IRI
    /// the document was fetched from.
    pub fn from_json_ld(bytes: &[u8], base: Option<&Iri>) -> Result<Self, DatasetError> {
        json_ld::parse(bytes, base)
    }

    /// Serialize as expanded JSON-LD
    pub fn to_json_ld(&self) -> Result<Vec<u8>, DatasetError> {
        json_ld::serialize(self)
    }

    /// Number of subjects with statements
    pub fn len(&self) -> usize {
        self.things().count()
    }

    /// Whether the dataset holds no statements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The thing with the given subject
    pub fn thing(&self, iri: &str) -> Option<&Thing> {
        self.things.get(iri)
    }

    /// Mutable access to the thing with the given subject
    pub fn thing_mut(&mut self, iri: &str) -> Option<&mut Thing> {
        self.things.get_mut(iri)
    }

    /// The thing with the given subject, created empty when absent
    pub fn thing_or_insert(&mut self, iri: &str) -> &mut Thing {
        self.things
            .entry(iri.to_string())
            .or_insert_with(|| Thing::new(iri))
    }

    /// Store `thing`, replacing whatever was said about its subject
    pub fn set_thing(&mut self, thing: Thing) {
        self.things.insert(thing.iri().to_string(), thing);
    }

    /// Remove a subject and its statements
    pub fn remove_thing(&mut self, iri: &str) -> Option<Thing> {
        self.things.remove(iri)
    }

    /// Every thing with at least one statement, ordered by subject
    pub fn things(&self) -> impl Iterator<Item = &Thing> {
        self.things.values().filter(|thing| !thing.is_empty())
    }

    /// Every thing typed as `class`
    pub fn things_of_type<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Thing> + 'a {
        self.things().filter(move |thing| thing.has_type(class))
    }

    /// Keep only the things matching `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&Thing) -> bool) {
        self.things.retain(|_, thing| keep(thing));
    }

    /// Add the statements of `thing` to those already held about its subject
    pub(crate) fn merge_thing(&mut self, thing: Thing) {
        let target = self.thing_or_insert(thing.iri());
        for (predicate, objects) in thing.properties() {
            for object in objects {
                target.add(predicate.as_str(), object.clone());
            }
        }
    }
}
