//! Repository abstraction layer for Tern.
//!
//! Provides a trait-based interface over graph-data stores, allowing
//! different backends (and test doubles) to be used interchangeably by the
//! query evaluators.

mod mock;
mod oxigraph;
mod types;

pub use self::mock::{FailingRepository, MockRepository, MockStats};
pub use self::oxigraph::{OxigraphConnection, OxigraphRepository};
pub use self::types::{split_iri, BindingSet, Namespace, Triple, Value};

use crate::error::Result;

/// Supported query languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryLanguage {
    /// SPARQL 1.1.
    #[default]
    Sparql,
    /// SeRQL (legacy; not supported by the oxigraph backend).
    Serql,
}

impl QueryLanguage {
    /// Returns the display name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sparql => "SPARQL",
            Self::Serql => "SeRQL",
        }
    }

    /// Parses a language from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sparql" => Some(Self::Sparql),
            "serql" => Some(Self::Serql),
            _ => None,
        }
    }
}

/// Parser verification switches installed on a connection.
///
/// The graph query evaluator installs the lenient configuration for the
/// lifetime of its connection so that results containing invalid-looking
/// literals or IRIs are not rejected at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLeniency {
    /// Verify that literal values match their datatype.
    pub verify_datatype_values: bool,
    /// Verify language tag syntax.
    pub verify_language_tags: bool,
    /// Verify that relative IRIs can be resolved.
    pub verify_relative_iris: bool,
}

impl ParserLeniency {
    /// All verifications enabled.
    pub fn strict() -> Self {
        Self {
            verify_datatype_values: true,
            verify_language_tags: true,
            verify_relative_iris: true,
        }
    }

    /// All verifications disabled.
    pub fn lenient() -> Self {
        Self {
            verify_datatype_values: false,
            verify_language_tags: false,
            verify_relative_iris: false,
        }
    }

    /// Returns true if every verification is disabled.
    pub fn is_lenient(&self) -> bool {
        !self.verify_datatype_values && !self.verify_language_tags && !self.verify_relative_iris
    }
}

impl Default for ParserLeniency {
    fn default() -> Self {
        Self::strict()
    }
}

/// An open data store that can hand out connections.
pub trait Repository {
    /// Opens a connection to the repository.
    ///
    /// Fails with a repository error if the store is unreachable or
    /// corrupted.
    fn open_connection(&self) -> Result<Box<dyn RepositoryConnection>>;
}

/// A scoped, single-owner connection to a repository.
///
/// The connection is the factory for prepared queries and the namespace
/// listing, and owns its parser configuration overrides. It is released by
/// dropping it; the evaluators keep result sequences inside the connection's
/// scope so releases happen in reverse-acquisition order on every exit path.
pub trait RepositoryConnection {
    /// Prepares a tabular (variable-binding) query.
    ///
    /// Fails with a malformed-query or unsupported-language error before any
    /// evaluation starts.
    fn prepare_tuple_query(
        &self,
        language: QueryLanguage,
        query: &str,
    ) -> Result<Box<dyn PreparedTupleQuery>>;

    /// Prepares a graph-pattern (triple-producing) query.
    fn prepare_graph_query(
        &self,
        language: QueryLanguage,
        query: &str,
    ) -> Result<Box<dyn PreparedGraphQuery>>;

    /// Lists the namespaces declared on this connection.
    ///
    /// The result is an ordered sequence; duplicate namespace IRIs with
    /// different prefixes are representable and resolution is
    /// order-dependent.
    fn namespaces(&self) -> Result<Vec<Namespace>>;

    /// Installs parser verification switches for the remainder of this
    /// connection's lifetime.
    fn set_parser_leniency(&mut self, leniency: ParserLeniency);
}

/// A validated tabular query, ready to evaluate exactly once.
pub trait PreparedTupleQuery {
    /// Evaluates the query, producing a lazy single-pass result sequence.
    ///
    /// Fails with a query-evaluation error if execution aborts before the
    /// first row; later failures surface through the sequence itself.
    fn evaluate(self: Box<Self>) -> Result<TupleResult>;
}

/// A validated graph query, ready to evaluate exactly once.
pub trait PreparedGraphQuery {
    /// Evaluates the query, producing a lazy single-pass triple sequence.
    fn evaluate(self: Box<Self>) -> Result<GraphResult>;
}

/// A lazily produced, forward-only sequence of binding sets.
///
/// The sequence exposes only "take next"; it cannot be indexed, restarted or
/// re-iterated. Dropping it releases the underlying resources.
pub struct TupleResult {
    binding_names: Vec<String>,
    rows: Box<dyn Iterator<Item = Result<BindingSet>>>,
}

impl TupleResult {
    /// Wraps a row iterator with its ordered binding names.
    pub fn new(
        binding_names: Vec<String>,
        rows: Box<dyn Iterator<Item = Result<BindingSet>>>,
    ) -> Self {
        Self {
            binding_names,
            rows,
        }
    }

    /// The ordered binding names of the result, known before iteration.
    pub fn binding_names(&self) -> &[String] {
        &self.binding_names
    }

    /// Takes the next row, blocking while the store computes it.
    pub fn next_row(&mut self) -> Option<Result<BindingSet>> {
        self.rows.next()
    }
}

/// A lazily produced, forward-only sequence of triples.
pub struct GraphResult {
    triples: Box<dyn Iterator<Item = Result<Triple>>>,
}

impl GraphResult {
    /// Wraps a triple iterator.
    pub fn new(triples: Box<dyn Iterator<Item = Result<Triple>>>) -> Self {
        Self { triples }
    }

    /// Takes the next triple, blocking while the store computes it.
    pub fn next_triple(&mut self) -> Option<Result<Triple>> {
        self.triples.next()
    }
}
