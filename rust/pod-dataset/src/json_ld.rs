//! Reading and writing expanded JSON-LD.
//!
//! Only the expanded and flattened forms are understood: keys are absolute
//! IRIs and objects are `{"@id": ..}` or `{"@value": ..}` value objects.
//! Documents carrying an `@context` are rejected rather than misread.

use pod_common::Iri;
use pod_common::vocab::rdf;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::{Dataset, DatasetError, Literal, Term, Thing};

const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

pub(crate) fn parse(bytes: &[u8], base: Option<&Iri>) -> Result<Dataset, DatasetError> {
    let mut parser = Parser {
        base,
        document: base
            .map(|base| base.to_string())
            .unwrap_or_else(|| "<inline document>".to_string()),
        dataset: Dataset::new(),
        blank_nodes: 0,
    };

    let value: Value = serde_json::from_slice(bytes).map_err(|error| parser.malformed(error))?;
    parser.document(value)?;

    Ok(parser.dataset)
}

pub(crate) fn serialize(dataset: &Dataset) -> Result<Vec<u8>, DatasetError> {
    let nodes: Vec<Value> = dataset.things().map(node_object).collect();

    serde_json::to_vec_pretty(&nodes).map_err(|error| DatasetError::Malformed {
        document: "<serialized document>".to_string(),
        reason: error.to_string(),
    })
}

struct Parser<'a> {
    base: Option<&'a Iri>,
    document: String,
    dataset: Dataset,
    blank_nodes: usize,
}

impl Parser<'_> {
    fn malformed(&self, reason: impl ToString) -> DatasetError {
        DatasetError::Malformed {
            document: self.document.clone(),
            reason: reason.to_string(),
        }
    }

    fn document(&mut self, value: Value) -> Result<(), DatasetError> {
        match value {
            Value::Array(nodes) => {
                for node in nodes {
                    self.top_level(node)?;
                }
                Ok(())
            }
            Value::Object(_) => self.top_level(value),
            _ => Err(self.malformed("expected a node object or an array of them")),
        }
    }

    fn top_level(&mut self, value: Value) -> Result<(), DatasetError> {
        let Value::Object(mut map) = value else {
            return Err(self.malformed("expected a node object"));
        };

        if map.contains_key("@context") {
            return Err(self.malformed("compacted JSON-LD (@context) is not supported"));
        }

        match map.remove("@graph") {
            Some(graph) => {
                for node in one_or_many(graph) {
                    self.node(node)?;
                }
                if map.keys().any(|key| !key.starts_with('@')) {
                    self.node(Value::Object(map))?;
                }
            }
            None => {
                self.node(Value::Object(map))?;
            }
        }

        Ok(())
    }

    fn node(&mut self, value: Value) -> Result<String, DatasetError> {
        let Value::Object(map) = value else {
            return Err(self.malformed("expected a node object"));
        };

        let iri = match map.get("@id") {
            Some(Value::String(id)) => self.resolve(id)?,
            Some(_) => return Err(self.malformed("@id must be a string")),
            None => self.blank_node(),
        };

        let mut thing = Thing::new(iri.as_str());
        for (key, value) in map {
            match key.as_str() {
                "@id" => {}
                "@type" => {
                    for class in one_or_many(value) {
                        let Value::String(class) = class else {
                            return Err(self.malformed("@type must hold IRIs"));
                        };
                        thing.add_iri(rdf::TYPE, self.resolve(&class)?);
                    }
                }
                keyword if keyword.starts_with('@') => {
                    debug!("Ignoring {} on {} in {}", keyword, iri, self.document);
                }
                _ => {
                    for object in one_or_many(value) {
                        if let Some(term) = self.object(object)? {
                            thing.add(key.as_str(), term);
                        }
                    }
                }
            }
        }

        self.dataset.merge_thing(thing);
        Ok(iri)
    }

    fn object(&mut self, value: Value) -> Result<Option<Term>, DatasetError> {
        let term = match value {
            Value::Null => return Ok(None),
            Value::String(value) => Term::literal(value),
            Value::Bool(_) | Value::Number(_) => native_literal(&value, None),
            Value::Array(_) => return Err(self.malformed("nested arrays are not supported")),
            Value::Object(mut map) => {
                if let Some(value) = map.remove("@value") {
                    let datatype = match map.remove("@type") {
                        Some(Value::String(datatype)) => Some(datatype),
                        None => None,
                        Some(_) => return Err(self.malformed("literal @type must be an IRI")),
                    };
                    let language = match map.remove("@language") {
                        Some(Value::String(language)) => Some(language),
                        None => None,
                        Some(_) => return Err(self.malformed("@language must be a string")),
                    };
                    match value {
                        Value::String(value) => Term::Literal(Literal {
                            value,
                            datatype,
                            language,
                        }),
                        Value::Bool(_) | Value::Number(_) => native_literal(&value, datatype),
                        _ => return Err(self.malformed("@value must be a scalar")),
                    }
                } else if map.contains_key("@list") {
                    return Err(self.malformed("@list is not supported"));
                } else if let (1, Some(Value::String(id))) = (map.len(), map.get("@id")) {
                    Term::Iri(self.resolve(id)?)
                } else {
                    Term::Iri(self.node(Value::Object(map))?)
                }
            }
        };

        Ok(Some(term))
    }

    fn resolve(&self, id: &str) -> Result<String, DatasetError> {
        if id.starts_with("_:") {
            return Ok(id.to_string());
        }

        let iri = match self.base {
            Some(base) => base.join(id)?,
            None => Iri::parse(id)?,
        };
        Ok(iri.to_string())
    }

    fn blank_node(&mut self) -> String {
        self.blank_nodes += 1;
        format!("_:b{}", self.blank_nodes)
    }
}

fn one_or_many(value: Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values,
        value => vec![value],
    }
}

fn native_literal(value: &Value, datatype: Option<String>) -> Term {
    let datatype = datatype.unwrap_or_else(|| {
        match value {
            Value::Bool(_) => XSD_BOOLEAN,
            Value::Number(number) if number.is_f64() => XSD_DOUBLE,
            _ => XSD_INTEGER,
        }
        .to_string()
    });

    Term::Literal(Literal {
        value: value.to_string(),
        datatype: Some(datatype),
        language: None,
    })
}

fn node_object(thing: &Thing) -> Value {
    let mut node = Map::new();
    node.insert("@id".to_string(), Value::String(thing.iri().to_string()));

    for (predicate, objects) in thing.properties() {
        if objects.is_empty() {
            continue;
        }

        if predicate == rdf::TYPE && objects.iter().all(|object| object.as_iri().is_some()) {
            let classes = objects.iter().filter_map(Term::as_iri).map(Value::from);
            node.insert("@type".to_string(), Value::Array(classes.collect()));
            continue;
        }

        node.insert(
            predicate.clone(),
            Value::Array(objects.iter().map(value_object).collect()),
        );
    }

    Value::Object(node)
}

fn value_object(term: &Term) -> Value {
    match term {
        Term::Iri(iri) => json!({ "@id": iri }),
        Term::Literal(literal) => {
            let mut object = Map::new();
            object.insert("@value".to_string(), Value::from(literal.value.as_str()));
            if let Some(datatype) = &literal.datatype {
                object.insert("@type".to_string(), Value::from(datatype.as_str()));
            }
            if let Some(language) = &literal.language {
                object.insert("@language".to_string(), Value::from(language.as_str()));
            }
            Value::Object(object)
        }
    }
}
