//! Mock repositories for testing.
//!
//! Provides scripted in-memory implementations of the repository traits,
//! with shared counters so tests can assert the resource-safety contract:
//! connections and result sequences are each released exactly once, in
//! reverse-acquisition order, on every exit path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{
    BindingSet, GraphResult, Namespace, ParserLeniency, PreparedGraphQuery, PreparedTupleQuery,
    QueryLanguage, Repository, RepositoryConnection, Triple, TupleResult,
};
use crate::error::{Result, TernError};

/// Counters observing a [`MockRepository`]'s lifecycle from the outside.
#[derive(Debug, Default)]
pub struct MockStats {
    connections_opened: AtomicUsize,
    connections_closed: AtomicUsize,
    results_closed: AtomicUsize,
    namespace_fetches: AtomicUsize,
    leniency: Mutex<Option<ParserLeniency>>,
}

impl MockStats {
    /// Number of connections handed out.
    pub fn connections_opened(&self) -> usize {
        self.connections_opened.load(Ordering::SeqCst)
    }

    /// Number of connections released.
    pub fn connections_closed(&self) -> usize {
        self.connections_closed.load(Ordering::SeqCst)
    }

    /// Number of result sequences released.
    pub fn results_closed(&self) -> usize {
        self.results_closed.load(Ordering::SeqCst)
    }

    /// Number of times the namespace listing was fetched.
    pub fn namespace_fetches(&self) -> usize {
        self.namespace_fetches.load(Ordering::SeqCst)
    }

    /// The last parser leniency installed on a connection, if any.
    pub fn leniency(&self) -> Option<ParserLeniency> {
        *self.leniency.lock().unwrap()
    }
}

/// A mock repository that returns predefined rows and triples.
pub struct MockRepository {
    binding_names: Vec<String>,
    rows: Vec<BindingSet>,
    triples: Vec<Triple>,
    namespaces: Vec<Namespace>,
    fail_after: Option<usize>,
    stats: Arc<MockStats>,
}

impl MockRepository {
    /// Creates an empty mock repository.
    pub fn new() -> Self {
        Self {
            binding_names: Vec::new(),
            rows: Vec::new(),
            triples: Vec::new(),
            namespaces: Vec::new(),
            fail_after: None,
            stats: Arc::new(MockStats::default()),
        }
    }

    /// Sets the binding names reported by tuple results.
    pub fn with_binding_names(mut self, names: &[&str]) -> Self {
        self.binding_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Sets the rows produced by tuple results.
    pub fn with_rows(mut self, rows: Vec<BindingSet>) -> Self {
        self.rows = rows;
        self
    }

    /// Sets the triples produced by graph results.
    pub fn with_triples(mut self, triples: Vec<Triple>) -> Self {
        self.triples = triples;
        self
    }

    /// Sets the declared namespaces.
    pub fn with_namespaces(mut self, namespaces: Vec<Namespace>) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Makes result sequences fail after producing `n` elements.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Returns a handle to the lifecycle counters.
    pub fn stats(&self) -> Arc<MockStats> {
        Arc::clone(&self.stats)
    }

    fn scripted<T: Clone>(&self, items: &[T]) -> Vec<Result<T>> {
        let mut scripted: Vec<Result<T>> = match self.fail_after {
            Some(n) => items.iter().take(n).cloned().map(Ok).collect(),
            None => items.iter().cloned().map(Ok).collect(),
        };
        if self.fail_after.is_some() {
            scripted.push(Err(TernError::evaluation("injected mid-stream failure")));
        }
        scripted
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn open_connection(&self) -> Result<Box<dyn RepositoryConnection>> {
        self.stats.connections_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            binding_names: self.binding_names.clone(),
            rows: self.scripted(&self.rows),
            triples: self.scripted(&self.triples),
            namespaces: self.namespaces.clone(),
            stats: Arc::clone(&self.stats),
        }))
    }
}

struct MockConnection {
    binding_names: Vec<String>,
    rows: Vec<Result<BindingSet>>,
    triples: Vec<Result<Triple>>,
    namespaces: Vec<Namespace>,
    stats: Arc<MockStats>,
}

impl RepositoryConnection for MockConnection {
    fn prepare_tuple_query(
        &self,
        _language: QueryLanguage,
        _query: &str,
    ) -> Result<Box<dyn PreparedTupleQuery>> {
        Ok(Box::new(MockPreparedQuery {
            binding_names: self.binding_names.clone(),
            rows: clone_results(&self.rows),
            triples: Vec::new(),
            stats: Arc::clone(&self.stats),
        }))
    }

    fn prepare_graph_query(
        &self,
        _language: QueryLanguage,
        _query: &str,
    ) -> Result<Box<dyn PreparedGraphQuery>> {
        Ok(Box::new(MockPreparedQuery {
            binding_names: Vec::new(),
            rows: Vec::new(),
            triples: clone_results(&self.triples),
            stats: Arc::clone(&self.stats),
        }))
    }

    fn namespaces(&self) -> Result<Vec<Namespace>> {
        self.stats.namespace_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.namespaces.clone())
    }

    fn set_parser_leniency(&mut self, leniency: ParserLeniency) {
        *self.stats.leniency.lock().unwrap() = Some(leniency);
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.stats.connections_closed.fetch_add(1, Ordering::SeqCst);
    }
}

fn clone_results<T: Clone>(items: &[Result<T>]) -> Vec<Result<T>> {
    items
        .iter()
        .map(|item| match item {
            Ok(value) => Ok(value.clone()),
            Err(e) => Err(TernError::evaluation(e.to_string())),
        })
        .collect()
}

struct MockPreparedQuery {
    binding_names: Vec<String>,
    rows: Vec<Result<BindingSet>>,
    triples: Vec<Result<Triple>>,
    stats: Arc<MockStats>,
}

impl PreparedTupleQuery for MockPreparedQuery {
    fn evaluate(self: Box<Self>) -> Result<TupleResult> {
        Ok(TupleResult::new(
            self.binding_names,
            Box::new(Tracked {
                inner: self.rows.into_iter(),
                stats: self.stats,
            }),
        ))
    }
}

impl PreparedGraphQuery for MockPreparedQuery {
    fn evaluate(self: Box<Self>) -> Result<GraphResult> {
        Ok(GraphResult::new(Box::new(Tracked {
            inner: self.triples.into_iter(),
            stats: self.stats,
        })))
    }
}

/// Iterator wrapper that counts its release.
struct Tracked<T> {
    inner: std::vec::IntoIter<Result<T>>,
    stats: Arc<MockStats>,
}

impl<T> Iterator for Tracked<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.stats.results_closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// A repository whose connections always fail to open.
pub struct FailingRepository;

impl Repository for FailingRepository {
    fn open_connection(&self) -> Result<Box<dyn RepositoryConnection>> {
        Err(TernError::repository(
            "cannot open a connection: store is unreachable",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::Value;
    use super::*;

    #[test]
    fn test_mock_rows_round_trip() {
        let repository = MockRepository::new()
            .with_binding_names(&["x"])
            .with_rows(vec![BindingSet::new().bind("x", Value::literal("1"))]);
        let connection = repository.open_connection().unwrap();
        let prepared = connection
            .prepare_tuple_query(QueryLanguage::Sparql, "SELECT ?x WHERE { }")
            .unwrap();
        let mut result = prepared.evaluate().unwrap();

        assert_eq!(result.binding_names(), &["x".to_string()]);
        let row = result.next_row().unwrap().unwrap();
        assert_eq!(row.value("x"), Some(&Value::literal("1")));
        assert!(result.next_row().is_none());
    }

    #[test]
    fn test_failure_injection() {
        let repository = MockRepository::new()
            .with_binding_names(&["x"])
            .with_rows(vec![
                BindingSet::new().bind("x", Value::literal("1")),
                BindingSet::new().bind("x", Value::literal("2")),
            ])
            .failing_after(1);
        let connection = repository.open_connection().unwrap();
        let prepared = connection
            .prepare_tuple_query(QueryLanguage::Sparql, "SELECT ?x WHERE { }")
            .unwrap();
        let mut result = prepared.evaluate().unwrap();

        assert!(result.next_row().unwrap().is_ok());
        assert!(result.next_row().unwrap().is_err());
    }

    #[test]
    fn test_connection_close_is_counted() {
        let repository = MockRepository::new();
        let stats = repository.stats();
        {
            let _connection = repository.open_connection().unwrap();
            assert_eq!(stats.connections_opened(), 1);
            assert_eq!(stats.connections_closed(), 0);
        }
        assert_eq!(stats.connections_closed(), 1);
    }

    #[test]
    fn test_result_release_is_counted() {
        let repository = MockRepository::new();
        let stats = repository.stats();
        let connection = repository.open_connection().unwrap();
        {
            let prepared = connection
                .prepare_tuple_query(QueryLanguage::Sparql, "SELECT * WHERE { }")
                .unwrap();
            let _result = prepared.evaluate().unwrap();
        }
        assert_eq!(stats.results_closed(), 1);
    }

    #[test]
    fn test_failing_repository() {
        let repository = FailingRepository;
        assert!(matches!(
            repository.open_connection(),
            Err(TernError::Repository(_))
        ));
    }
}
