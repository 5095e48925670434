//! Query evaluation and result rendering.
//!
//! The evaluators in this module drive an already-prepared query's result
//! sequence and render it as human-readable text; they never construct or
//! optimize query plans.

mod evaluator;
mod render;

pub use evaluator::{Evaluation, QueryEvaluator};
pub use render::{render_value, resolve_prefix};

/// The two result shapes a query can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryForm {
    /// Variable bindings, rendered as a table (SELECT, ASK).
    Tuple,
    /// Triples, rendered line by line (CONSTRUCT, DESCRIBE).
    Graph,
}

impl QueryForm {
    /// Parses a form name from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tuple" => Some(Self::Tuple),
            "graph" => Some(Self::Graph),
            _ => None,
        }
    }

    /// Detects the form of a query from its first form keyword.
    ///
    /// IRIs in angle brackets and `#` comments are skipped, so the PREFIX
    /// and BASE declarations of the prologue pass through harmlessly whether
    /// they sit on their own lines or share one with the query body. Returns
    /// None when no form keyword is found; callers can override detection
    /// with an explicit form.
    pub fn detect(query: &str) -> Option<Self> {
        let mut body = String::with_capacity(query.len());
        let mut chars = query.chars();
        while let Some(c) = chars.next() {
            match c {
                '<' => {
                    for c in chars.by_ref() {
                        if c == '>' {
                            break;
                        }
                    }
                    body.push(' ');
                }
                '#' => {
                    for c in chars.by_ref() {
                        if c == '\n' {
                            break;
                        }
                    }
                    body.push('\n');
                }
                _ => body.push(c),
            }
        }

        body.split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .find_map(|token| match token.to_ascii_lowercase().as_str() {
                "select" | "ask" => Some(Self::Tuple),
                "construct" | "describe" => Some(Self::Graph),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_select() {
        assert_eq!(
            QueryForm::detect("SELECT ?s WHERE { ?s ?p ?o }"),
            Some(QueryForm::Tuple)
        );
    }

    #[test]
    fn test_detect_ask() {
        assert_eq!(
            QueryForm::detect("ask { ?s ?p ?o }"),
            Some(QueryForm::Tuple)
        );
    }

    #[test]
    fn test_detect_construct() {
        assert_eq!(
            QueryForm::detect("CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }"),
            Some(QueryForm::Graph)
        );
    }

    #[test]
    fn test_detect_describe() {
        assert_eq!(
            QueryForm::detect("DESCRIBE <http://example.org/alice>"),
            Some(QueryForm::Graph)
        );
    }

    #[test]
    fn test_detect_skips_prologue_and_comments() {
        let query = "# find all constructors\n\
                     PREFIX ex: <http://example.org/select#>\n\
                     BASE <http://example.org/>\n\
                     SELECT ?s WHERE { ?s ex:p ?o }";
        assert_eq!(QueryForm::detect(query), Some(QueryForm::Tuple));
    }

    #[test]
    fn test_detect_single_line_prologue() {
        assert_eq!(
            QueryForm::detect(
                "PREFIX foaf: <http://xmlns.com/foaf/0.1/> SELECT ?s WHERE { ?s foaf:name ?n }"
            ),
            Some(QueryForm::Tuple)
        );
        assert_eq!(
            QueryForm::detect(
                "BASE <http://example.org/> PREFIX ex: <ns#> CONSTRUCT { ?s ex:p ?o } WHERE { ?s ?p ?o }"
            ),
            Some(QueryForm::Graph)
        );
    }

    #[test]
    fn test_detect_ignores_keywords_inside_iris() {
        assert_eq!(
            QueryForm::detect("DESCRIBE <http://example.org/select/ask>"),
            Some(QueryForm::Graph)
        );
    }

    #[test]
    fn test_detect_none_for_updates() {
        assert_eq!(
            QueryForm::detect("INSERT DATA { <a> <b> <c> }"),
            None
        );
    }

    #[test]
    fn test_parse_form() {
        assert_eq!(QueryForm::parse("tuple"), Some(QueryForm::Tuple));
        assert_eq!(QueryForm::parse("Graph"), Some(QueryForm::Graph));
        assert_eq!(QueryForm::parse("table"), None);
    }
}
