use std::fmt::Display;

/// A literal value with an optional datatype or language tag
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    /// The lexical form
    pub value: String,
    /// Datatype IRI; `None` means `xsd:string`
    pub datatype: Option<String>,
    /// Language tag, for language-tagged strings
    pub language: Option<String>,
}

/// The object of a statement: either a named node or a literal.
///
/// Blank nodes are named nodes whose IRI starts with `_:`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// A reference to another node
    Iri(String),
    /// A literal value
    Literal(Literal),
}

impl Term {
    /// A reference to `iri`
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// A plain string literal
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            datatype: None,
            language: None,
        })
    }

    /// The referenced IRI, when this term is a node
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    /// The lexical form, when this term is a literal
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Term::Iri(_) => None,
            Term::Literal(literal) => Some(&literal.value),
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Literal(Literal {
                value,
                language: Some(language),
                ..
            }) => write!(f, "{value:?}@{language}"),
            Term::Literal(Literal {
                value,
                datatype: Some(datatype),
                ..
            }) => write!(f, "{value:?}^^<{datatype}>"),
            Term::Literal(literal) => write!(f, "{:?}", literal.value),
        }
    }
}
