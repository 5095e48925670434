//! Core RDF value types for Tern.
//!
//! Defines the structures used to represent query results from the store:
//! values, namespaces, binding sets and triples.

use std::fmt;

/// IRI of the `xsd:string` datatype, which is implicit on plain literals.
const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// A single RDF value produced by query evaluation.
///
/// Values are immutable once produced. The canonical text rendering follows
/// the N-Triples lexical grammar; see [`Value::to_ntriples`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An IRI naming a resource.
    Iri(String),

    /// A literal with an optional language tag or datatype IRI.
    Literal {
        /// The lexical form, unescaped.
        lexical: String,
        /// Language tag, e.g. `en`.
        language: Option<String>,
        /// Datatype IRI. Absent for plain and language-tagged literals.
        datatype: Option<String>,
    },

    /// A blank node identifier (without the `_:` marker).
    BlankNode(String),
}

impl Value {
    /// Creates an IRI value.
    pub fn iri(iri: impl Into<String>) -> Self {
        Value::Iri(iri.into())
    }

    /// Creates a plain literal.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Value::Literal {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    /// Creates a language-tagged literal.
    pub fn lang_literal(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Value::Literal {
            lexical: lexical.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Creates a datatyped literal.
    pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Value::Literal {
            lexical: lexical.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    /// Creates a blank node value from its identifier.
    pub fn blank_node(id: impl Into<String>) -> Self {
        Value::BlankNode(id.into())
    }

    /// Renders the value in canonical N-Triples lexical form.
    ///
    /// IRIs are wrapped in angle brackets, blank nodes get the `_:` marker,
    /// literals are quoted and escaped with their `@lang` or `^^<datatype>`
    /// suffix. An explicit `xsd:string` datatype is suppressed, matching the
    /// RDF 1.1 convention.
    pub fn to_ntriples(&self) -> String {
        match self {
            Value::Iri(iri) => format!("<{iri}>"),
            Value::BlankNode(id) => format!("_:{id}"),
            Value::Literal {
                lexical,
                language,
                datatype,
            } => {
                let mut out = String::with_capacity(lexical.len() + 2);
                out.push('"');
                out.push_str(&escape_literal(lexical));
                out.push('"');
                if let Some(lang) = language {
                    out.push('@');
                    out.push_str(lang);
                } else if let Some(dt) = datatype {
                    if dt != XSD_STRING {
                        out.push_str("^^<");
                        out.push_str(dt);
                        out.push('>');
                    }
                }
                out
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ntriples())
    }
}

/// Escapes a literal's lexical form per the N-Triples grammar.
fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            _ => out.push(c),
        }
    }
    out
}

/// Splits an IRI into (namespace, local name) using the store convention:
/// the split point is after the last `#`, else the last `/`, else the last
/// `:`. An IRI with none of these is treated as all-namespace.
pub fn split_iri(iri: &str) -> (&str, &str) {
    let idx = iri
        .rfind('#')
        .or_else(|| iri.rfind('/'))
        .or_else(|| iri.rfind(':'));
    match idx {
        Some(i) => iri.split_at(i + 1),
        None => (iri, ""),
    }
}

/// A declared namespace: a short prefix aliasing a namespace IRI.
///
/// Namespace sets are ordered sequences with no uniqueness guarantee; if two
/// entries share an IRI, lookup order decides which prefix wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// The declared short prefix, e.g. `rdf`.
    pub prefix: String,
    /// The full namespace IRI, e.g. `http://www.w3.org/1999/02/22-rdf-syntax-ns#`.
    pub iri: String,
}

impl Namespace {
    /// Creates a namespace entry.
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }

    /// Returns the well-known namespaces every repository starts with.
    pub fn well_known() -> Vec<Namespace> {
        vec![
            Namespace::new("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            Namespace::new("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
            Namespace::new("xsd", "http://www.w3.org/2001/XMLSchema#"),
            Namespace::new("owl", "http://www.w3.org/2002/07/owl#"),
        ]
    }
}

/// One solution of a tabular query: an ordered mapping from binding names to
/// values. A name missing from the set is an unbound variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingSet {
    bindings: Vec<(String, Value)>,
}

impl BindingSet {
    /// Creates an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding, builder-style.
    pub fn bind(mut self, name: impl Into<String>, value: Value) -> Self {
        self.bindings.push((name.into(), value));
        self
    }

    /// Adds a binding in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.push((name.into(), value));
    }

    /// Looks up the value bound to `name`, or None if unbound.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns the number of bound variables.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if no variables are bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A (subject, predicate, object) graph statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    /// Statement subject.
    pub subject: Value,
    /// Statement predicate.
    pub predicate: Value,
    /// Statement object.
    pub object: Value,
}

impl Triple {
    /// Creates a triple.
    pub fn new(subject: Value, predicate: Value, object: Value) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iri_ntriples() {
        let v = Value::iri("http://example.org/alice");
        assert_eq!(v.to_ntriples(), "<http://example.org/alice>");
    }

    #[test]
    fn test_blank_node_ntriples() {
        let v = Value::blank_node("b42");
        assert_eq!(v.to_ntriples(), "_:b42");
    }

    #[test]
    fn test_plain_literal_ntriples() {
        let v = Value::literal("hello");
        assert_eq!(v.to_ntriples(), "\"hello\"");
    }

    #[test]
    fn test_lang_literal_ntriples() {
        let v = Value::lang_literal("bonjour", "fr");
        assert_eq!(v.to_ntriples(), "\"bonjour\"@fr");
    }

    #[test]
    fn test_typed_literal_ntriples() {
        let v = Value::typed_literal("42", "http://www.w3.org/2001/XMLSchema#integer");
        assert_eq!(
            v.to_ntriples(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_xsd_string_datatype_suppressed() {
        let v = Value::typed_literal("plain", XSD_STRING);
        assert_eq!(v.to_ntriples(), "\"plain\"");
    }

    #[test]
    fn test_literal_escaping() {
        let v = Value::literal("line1\nline2\t\"quoted\" \\slash");
        assert_eq!(
            v.to_ntriples(),
            "\"line1\\nline2\\t\\\"quoted\\\" \\\\slash\""
        );
    }

    #[test]
    fn test_split_iri_hash() {
        let (ns, local) = split_iri("http://example.org/ns#name");
        assert_eq!(ns, "http://example.org/ns#");
        assert_eq!(local, "name");
    }

    #[test]
    fn test_split_iri_slash() {
        let (ns, local) = split_iri("http://example.org/people/alice");
        assert_eq!(ns, "http://example.org/people/");
        assert_eq!(local, "alice");
    }

    #[test]
    fn test_split_iri_colon() {
        let (ns, local) = split_iri("urn:isbn:0451450523");
        assert_eq!(ns, "urn:isbn:");
        assert_eq!(local, "0451450523");
    }

    #[test]
    fn test_split_iri_hash_wins_over_slash() {
        // The hash split applies even when slashes come later in the IRI.
        let (ns, local) = split_iri("http://example.org/a/b#c");
        assert_eq!(ns, "http://example.org/a/b#");
        assert_eq!(local, "c");
    }

    #[test]
    fn test_split_iri_no_separator() {
        let (ns, local) = split_iri("opaque");
        assert_eq!(ns, "opaque");
        assert_eq!(local, "");
    }

    #[test]
    fn test_binding_set_lookup() {
        let bindings = BindingSet::new()
            .bind("x", Value::iri("http://example.org/x"))
            .bind("y", Value::literal("why"));

        assert_eq!(bindings.len(), 2);
        assert_eq!(
            bindings.value("x"),
            Some(&Value::iri("http://example.org/x"))
        );
        assert_eq!(bindings.value("y"), Some(&Value::literal("why")));
        assert_eq!(bindings.value("z"), None);
    }

    #[test]
    fn test_well_known_namespaces() {
        let ns = Namespace::well_known();
        assert!(ns
            .iter()
            .any(|n| n.prefix == "xsd" && n.iri == "http://www.w3.org/2001/XMLSchema#"));
    }
}
