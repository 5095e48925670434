//! Tuple and graph query evaluators.
//!
//! Each evaluator owns the connection and result lifecycle for one
//! evaluation: it acquires a connection, evaluates the prepared query,
//! streams the single-pass result sequence through the value renderer, and
//! reports the result count and elapsed time through the output sink. The
//! result is declared after the connection, so on every exit path
//! (including error propagation) the sequence is released before its
//! connection.

use std::time::{Duration, Instant};

use tracing::debug;

use super::render::render_value;
use crate::config::DisplayConfig;
use crate::console::ConsoleOutput;
use crate::error::Result;
use crate::store::{ParserLeniency, QueryLanguage, Repository};

/// Outcome of one evaluation: how many results were produced and how long
/// evaluation plus iteration took (acquisition and preparation excluded).
#[derive(Debug)]
pub struct Evaluation {
    /// Number of rows or triples produced by the result sequence.
    pub count: u64,
    /// Time from the start of evaluation to the last element consumed.
    pub elapsed: Duration,
}

/// Renders query results to the console.
pub struct QueryEvaluator<'a> {
    repository: Option<&'a dyn Repository>,
    display: &'a DisplayConfig,
    output: &'a mut dyn ConsoleOutput,
}

impl<'a> QueryEvaluator<'a> {
    /// Creates an evaluator over an optionally-open repository.
    pub fn new(
        repository: Option<&'a dyn Repository>,
        display: &'a DisplayConfig,
        output: &'a mut dyn ConsoleOutput,
    ) -> Self {
        Self {
            repository,
            display,
            output,
        }
    }

    /// Evaluates a tabular query and renders the solutions as a table.
    ///
    /// Returns `Ok(None)` when no repository is open: that is a reported,
    /// recoverable condition, not an error. Column widths are computed once
    /// from the configured display width and the number of binding names;
    /// cells wider than their column overflow without truncation.
    pub fn evaluate_tuple_query(
        &mut self,
        language: QueryLanguage,
        query: &str,
    ) -> Result<Option<Evaluation>> {
        let Some(repository) = self.repository else {
            self.output.write_unopened_notice();
            return Ok(None);
        };
        let connection = repository.open_connection()?;
        debug!(language = language.name(), "preparing tuple query");
        let prepared = connection.prepare_tuple_query(language, query)?;

        let started = Instant::now();
        let mut result = prepared.evaluate()?;
        let mut count: u64 = 0;

        let binding_names = result.binding_names().to_vec();
        if binding_names.is_empty() {
            // No variables to show (e.g. an existence check); iterate for
            // the count only.
            while let Some(row) = result.next_row() {
                row?;
                count += 1;
            }
        } else {
            let column_width =
                (self.display.width as i64 - 1) / binding_names.len() as i64 - 3;

            let mut line = String::new();
            for name in &binding_names {
                line.push_str("| ");
                line.push_str(name);
                push_repeated(&mut line, ' ', column_width - name.chars().count() as i64);
            }
            line.push('|');
            let header = line.clone();

            line.clear();
            for _ in 0..binding_names.len() {
                line.push('+');
                push_repeated(&mut line, '-', column_width + 1);
            }
            line.push('+');
            let separator = line.clone();

            self.output.write_line(&separator);
            self.output.write_line(&header);
            self.output.write_line(&separator);

            let namespaces = connection.namespaces()?;
            while let Some(row) = result.next_row() {
                let row = row?;
                count += 1;
                line.clear();
                for name in &binding_names {
                    let cell =
                        render_value(row.value(name), &namespaces, self.display.show_prefix);
                    line.push_str("| ");
                    line.push_str(&cell);
                    push_repeated(&mut line, ' ', column_width - cell.chars().count() as i64);
                }
                line.push('|');
                self.output.write_line(&line);
            }
            self.output.write_line(&separator);
        }

        let elapsed = started.elapsed();
        self.output
            .write_line(&format!("{} result(s) ({} ms)", count, elapsed.as_millis()));
        Ok(Some(Evaluation { count, elapsed }))
    }

    /// Evaluates a graph query and renders one triple per line.
    ///
    /// Installs the lenient parser configuration on the connection before
    /// preparing, so results containing invalid-looking literals or IRIs are
    /// not rejected at render time. The tabular path deliberately does not
    /// do this; the two evaluators are independent contracts.
    pub fn evaluate_graph_query(
        &mut self,
        language: QueryLanguage,
        query: &str,
    ) -> Result<Option<Evaluation>> {
        let Some(repository) = self.repository else {
            self.output.write_unopened_notice();
            return Ok(None);
        };
        let mut connection = repository.open_connection()?;
        connection.set_parser_leniency(ParserLeniency::lenient());
        debug!(language = language.name(), "preparing graph query");

        // Namespace snapshot taken once, before iterating.
        let namespaces = connection.namespaces()?;
        let prepared = connection.prepare_graph_query(language, query)?;

        let started = Instant::now();
        let mut result = prepared.evaluate()?;
        let mut count: u64 = 0;

        while let Some(triple) = result.next_triple() {
            let triple = triple?;
            count += 1;
            self.output.write(&render_value(
                Some(&triple.subject),
                &namespaces,
                self.display.show_prefix,
            ));
            self.output.write("   ");
            self.output.write(&render_value(
                Some(&triple.predicate),
                &namespaces,
                self.display.show_prefix,
            ));
            self.output.write("   ");
            self.output.write(&render_value(
                Some(&triple.object),
                &namespaces,
                self.display.show_prefix,
            ));
            self.output.write_line("");
        }

        let elapsed = started.elapsed();
        self.output
            .write_line(&format!("{} results ({} ms)", count, elapsed.as_millis()));
        Ok(Some(Evaluation { count, elapsed }))
    }
}

/// Appends `n` copies of `c`; negative counts append nothing, so cells wider
/// than their column overflow instead of corrupting the pad arithmetic.
fn push_repeated(line: &mut String, c: char, n: i64) {
    for _ in 0..n.max(0) {
        line.push(c);
    }
}
