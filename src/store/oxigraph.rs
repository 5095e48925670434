//! Oxigraph-backed repository.
//!
//! Wraps an in-memory [`oxigraph::store::Store`] behind the repository
//! traits. Queries are validated at preparation time and evaluated lazily,
//! so rows and triples stream out of the store one at a time.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{Subject, Term};
use oxigraph::sparql::{Query, QueryResults};
use oxigraph::store::Store;
use tracing::debug;

use super::{
    BindingSet, GraphResult, Namespace, ParserLeniency, PreparedGraphQuery, PreparedTupleQuery,
    QueryLanguage, Repository, RepositoryConnection, Triple, TupleResult, Value,
};
use crate::error::{Result, TernError};

/// An in-memory graph store with a declared namespace list.
pub struct OxigraphRepository {
    store: Store,
    namespaces: Vec<Namespace>,
}

impl OxigraphRepository {
    /// Creates an empty in-memory repository with the well-known namespaces.
    pub fn new() -> Result<Self> {
        let store = Store::new().map_err(|e| TernError::repository(e.to_string()))?;
        Ok(Self {
            store,
            namespaces: Namespace::well_known(),
        })
    }

    /// Replaces the namespace list with `declared` followed by the
    /// well-known entries. Declaration order decides prefix resolution when
    /// entries share a namespace IRI.
    pub fn with_namespaces(mut self, declared: Vec<Namespace>) -> Self {
        let mut namespaces = declared;
        namespaces.extend(Namespace::well_known());
        self.namespaces = namespaces;
        self
    }

    /// Opens a concrete connection (the trait object path goes through
    /// [`Repository::open_connection`]).
    pub fn connection(&self) -> OxigraphConnection {
        OxigraphConnection {
            store: self.store.clone(),
            namespaces: self.namespaces.clone(),
            leniency: ParserLeniency::default(),
        }
    }

    /// Loads an RDF file, detecting the format from the file extension.
    pub fn load_path(&self, path: &Path, lenient: bool) -> Result<()> {
        let mut connection = self.connection();
        if lenient {
            connection.set_parser_leniency(ParserLeniency::lenient());
        }
        connection.load_path(path)
    }

    /// Loads RDF data from a string. `format` is an extension-style format
    /// name such as `ttl` or `nt`.
    pub fn load_str(&self, data: &str, format: &str, lenient: bool) -> Result<()> {
        let mut connection = self.connection();
        if lenient {
            connection.set_parser_leniency(ParserLeniency::lenient());
        }
        connection.load_str(data, format)
    }

    /// Returns the number of statements in the store.
    pub fn size(&self) -> Result<usize> {
        self.store
            .len()
            .map_err(|e| TernError::repository(e.to_string()))
    }
}

impl Repository for OxigraphRepository {
    fn open_connection(&self) -> Result<Box<dyn RepositoryConnection>> {
        Ok(Box::new(self.connection()))
    }
}

/// A connection to an [`OxigraphRepository`].
///
/// Holds a cheap clone of the store handle, a snapshot of the declared
/// namespaces, and the parser leniency installed for its lifetime.
pub struct OxigraphConnection {
    store: Store,
    namespaces: Vec<Namespace>,
    leniency: ParserLeniency,
}

impl OxigraphConnection {
    /// Loads an RDF file through this connection, honoring the installed
    /// parser leniency.
    pub fn load_path(&self, path: &Path) -> Result<()> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(RdfFormat::from_extension)
            .ok_or_else(|| {
                TernError::repository(format!(
                    "cannot determine RDF format of '{}'",
                    path.display()
                ))
            })?;
        let reader = BufReader::new(File::open(path)?);
        self.load_from_reader(format, reader)?;
        debug!(path = %path.display(), "loaded data file");
        Ok(())
    }

    /// Loads RDF data from a string through this connection.
    pub fn load_str(&self, data: &str, format: &str) -> Result<()> {
        let format = RdfFormat::from_extension(format)
            .ok_or_else(|| TernError::repository(format!("unknown RDF format '{format}'")))?;
        self.load_from_reader(format, data.as_bytes())
    }

    fn load_from_reader(&self, format: RdfFormat, reader: impl std::io::Read) -> Result<()> {
        let mut parser = RdfParser::from_format(format);
        if self.leniency.is_lenient() {
            parser = parser.unchecked();
        }
        self.store
            .load_from_reader(parser, reader)
            .map_err(|e| TernError::repository(e.to_string()))
    }

    /// Validates the query text, failing before evaluation starts.
    fn parse_query(&self, language: QueryLanguage, query: &str) -> Result<()> {
        if language != QueryLanguage::Sparql {
            return Err(TernError::unsupported_language(language.name()));
        }
        Query::parse(query, None).map_err(|e| TernError::malformed_query(e.to_string()))?;
        Ok(())
    }
}

impl RepositoryConnection for OxigraphConnection {
    fn prepare_tuple_query(
        &self,
        language: QueryLanguage,
        query: &str,
    ) -> Result<Box<dyn PreparedTupleQuery>> {
        self.parse_query(language, query)?;
        Ok(Box::new(OxigraphPreparedQuery {
            store: self.store.clone(),
            query: query.to_string(),
        }))
    }

    fn prepare_graph_query(
        &self,
        language: QueryLanguage,
        query: &str,
    ) -> Result<Box<dyn PreparedGraphQuery>> {
        self.parse_query(language, query)?;
        Ok(Box::new(OxigraphPreparedQuery {
            store: self.store.clone(),
            query: query.to_string(),
        }))
    }

    fn namespaces(&self) -> Result<Vec<Namespace>> {
        Ok(self.namespaces.clone())
    }

    fn set_parser_leniency(&mut self, leniency: ParserLeniency) {
        debug!(?leniency, "parser leniency installed");
        self.leniency = leniency;
    }
}

/// A validated query bound to a store handle.
struct OxigraphPreparedQuery {
    store: Store,
    query: String,
}

impl PreparedTupleQuery for OxigraphPreparedQuery {
    fn evaluate(self: Box<Self>) -> Result<TupleResult> {
        let results = self
            .store
            .query(self.query.as_str())
            .map_err(|e| TernError::evaluation(e.to_string()))?;
        match results {
            QueryResults::Solutions(solutions) => {
                let binding_names: Vec<String> = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let rows = solutions.map(|solution| {
                    solution
                        .map(|solution| {
                            let mut bindings = BindingSet::new();
                            for (variable, term) in solution.iter() {
                                bindings.insert(variable.as_str(), value_from_term(term));
                            }
                            bindings
                        })
                        .map_err(|e| TernError::evaluation(e.to_string()))
                });
                Ok(TupleResult::new(binding_names, Box::new(rows)))
            }
            // An existence check carries no variables; true counts one row.
            QueryResults::Boolean(answer) => {
                let rows: Vec<Result<BindingSet>> = if answer {
                    vec![Ok(BindingSet::new())]
                } else {
                    Vec::new()
                };
                Ok(TupleResult::new(Vec::new(), Box::new(rows.into_iter())))
            }
            QueryResults::Graph(_) => Err(TernError::evaluation(
                "query produced a graph result; evaluate it as a graph query",
            )),
        }
    }
}

impl PreparedGraphQuery for OxigraphPreparedQuery {
    fn evaluate(self: Box<Self>) -> Result<GraphResult> {
        let results = self
            .store
            .query(self.query.as_str())
            .map_err(|e| TernError::evaluation(e.to_string()))?;
        match results {
            QueryResults::Graph(triples) => {
                let triples = triples.map(|triple| {
                    triple
                        .map(|triple| {
                            Triple::new(
                                value_from_subject(&triple.subject),
                                Value::iri(triple.predicate.as_str()),
                                value_from_term(&triple.object),
                            )
                        })
                        .map_err(|e| TernError::evaluation(e.to_string()))
                });
                Ok(GraphResult::new(Box::new(triples)))
            }
            QueryResults::Solutions(_) | QueryResults::Boolean(_) => Err(TernError::evaluation(
                "query produced a tabular result; evaluate it as a tuple query",
            )),
        }
    }
}

fn value_from_term(term: &Term) -> Value {
    match term {
        Term::NamedNode(node) => Value::iri(node.as_str()),
        Term::BlankNode(node) => Value::blank_node(node.as_str()),
        Term::Literal(literal) => {
            if let Some(language) = literal.language() {
                Value::lang_literal(literal.value(), language)
            } else {
                Value::typed_literal(literal.value(), literal.datatype().as_str())
            }
        }
        // SPARQL-star embedded triples fall back to their lexical form.
        other => Value::literal(other.to_string()),
    }
}

fn value_from_subject(subject: &Subject) -> Value {
    match subject {
        Subject::NamedNode(node) => Value::iri(node.as_str()),
        Subject::BlankNode(node) => Value::blank_node(node.as_str()),
        other => Value::literal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TURTLE: &str = r#"
        @prefix ex: <http://example.org/> .
        ex:alice ex:knows ex:bob .
        ex:alice ex:name "Alice" .
        ex:bob ex:name "Bob" .
    "#;

    fn repository() -> OxigraphRepository {
        let repository = OxigraphRepository::new().unwrap();
        repository.load_str(TURTLE, "ttl", false).unwrap();
        repository
    }

    #[test]
    fn test_load_and_size() {
        let repository = repository();
        assert_eq!(repository.size().unwrap(), 3);
    }

    #[test]
    fn test_select_query_streams_rows() {
        let repository = repository();
        let connection = repository.connection();
        let prepared = connection
            .prepare_tuple_query(
                QueryLanguage::Sparql,
                "SELECT ?s ?o WHERE { ?s <http://example.org/knows> ?o }",
            )
            .unwrap();
        let mut result = prepared.evaluate().unwrap();

        assert_eq!(result.binding_names(), &["s".to_string(), "o".to_string()]);
        let row = result.next_row().unwrap().unwrap();
        assert_eq!(
            row.value("s"),
            Some(&Value::iri("http://example.org/alice"))
        );
        assert_eq!(row.value("o"), Some(&Value::iri("http://example.org/bob")));
        assert!(result.next_row().is_none());
    }

    #[test]
    fn test_unbound_variable_is_absent() {
        let repository = repository();
        let connection = repository.connection();
        let prepared = connection
            .prepare_tuple_query(
                QueryLanguage::Sparql,
                "SELECT ?s ?missing WHERE { ?s <http://example.org/knows> ?o }",
            )
            .unwrap();
        let mut result = prepared.evaluate().unwrap();
        let row = result.next_row().unwrap().unwrap();
        assert!(row.value("missing").is_none());
    }

    #[test]
    fn test_ask_true_counts_one_row_without_bindings() {
        let repository = repository();
        let connection = repository.connection();
        let prepared = connection
            .prepare_tuple_query(
                QueryLanguage::Sparql,
                "ASK { <http://example.org/alice> ?p ?o }",
            )
            .unwrap();
        let mut result = prepared.evaluate().unwrap();
        assert!(result.binding_names().is_empty());
        assert!(result.next_row().is_some());
        assert!(result.next_row().is_none());
    }

    #[test]
    fn test_ask_false_counts_zero_rows() {
        let repository = repository();
        let connection = repository.connection();
        let prepared = connection
            .prepare_tuple_query(
                QueryLanguage::Sparql,
                "ASK { <http://example.org/nobody> ?p ?o }",
            )
            .unwrap();
        let mut result = prepared.evaluate().unwrap();
        assert!(result.binding_names().is_empty());
        assert!(result.next_row().is_none());
    }

    #[test]
    fn test_construct_query_streams_triples() {
        let repository = repository();
        let connection = repository.connection();
        let prepared = connection
            .prepare_graph_query(
                QueryLanguage::Sparql,
                "CONSTRUCT { ?s <http://example.org/linked> ?o } \
                 WHERE { ?s <http://example.org/knows> ?o }",
            )
            .unwrap();
        let mut result = prepared.evaluate().unwrap();

        let triple = result.next_triple().unwrap().unwrap();
        assert_eq!(triple.subject, Value::iri("http://example.org/alice"));
        assert_eq!(triple.predicate, Value::iri("http://example.org/linked"));
        assert_eq!(triple.object, Value::iri("http://example.org/bob"));
        assert!(result.next_triple().is_none());
    }

    #[test]
    fn test_malformed_query_fails_at_prepare() {
        let repository = repository();
        let connection = repository.connection();
        let result = connection.prepare_tuple_query(QueryLanguage::Sparql, "SELECT WHERE {");
        assert!(matches!(result, Err(TernError::MalformedQuery(_))));
    }

    #[test]
    fn test_serql_is_unsupported() {
        let repository = repository();
        let connection = repository.connection();
        let result =
            connection.prepare_tuple_query(QueryLanguage::Serql, "SELECT x FROM {x} p {y}");
        assert!(matches!(result, Err(TernError::UnsupportedLanguage(_))));
    }

    #[test]
    fn test_tuple_evaluation_of_graph_query_is_an_error() {
        let repository = repository();
        let connection = repository.connection();
        let prepared = connection
            .prepare_tuple_query(
                QueryLanguage::Sparql,
                "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }",
            )
            .unwrap();
        assert!(matches!(
            prepared.evaluate(),
            Err(TernError::Evaluation(_))
        ));
    }

    #[test]
    fn test_namespaces_declared_before_well_known() {
        let repository = OxigraphRepository::new()
            .unwrap()
            .with_namespaces(vec![Namespace::new("ex", "http://example.org/")]);
        let connection = repository.connection();
        let namespaces = connection.namespaces().unwrap();

        assert_eq!(namespaces[0], Namespace::new("ex", "http://example.org/"));
        assert!(namespaces.iter().any(|n| n.prefix == "rdf"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let repository = OxigraphRepository::new().unwrap();
        let result = repository.load_str("{}", "json5", false);
        assert!(matches!(result, Err(TernError::Repository(_))));
    }

    #[test]
    fn test_literal_conversion_keeps_language_and_datatype() {
        let repository = OxigraphRepository::new().unwrap();
        repository
            .load_str(
                r#"<http://ex.org/s> <http://ex.org/p> "hi"@en .
                   <http://ex.org/s> <http://ex.org/q> "5"^^<http://www.w3.org/2001/XMLSchema#integer> ."#,
                "ttl",
                false,
            )
            .unwrap();
        let connection = repository.connection();
        let prepared = connection
            .prepare_tuple_query(
                QueryLanguage::Sparql,
                "SELECT ?o WHERE { <http://ex.org/s> <http://ex.org/p> ?o }",
            )
            .unwrap();
        let mut result = prepared.evaluate().unwrap();
        let row = result.next_row().unwrap().unwrap();
        assert_eq!(row.value("o"), Some(&Value::lang_literal("hi", "en")));
    }
}
