//! Pure value rendering with namespace-prefix abbreviation.
//!
//! No I/O and no state: given the same inputs these functions always
//! produce the same strings, which makes them directly property-testable.

use crate::store::{split_iri, Namespace, Value};

/// Renders a value for display.
///
/// An absent value renders as the empty string. When `abbreviate` is set and
/// the value is an IRI whose namespace is declared in `namespaces`, it
/// renders as `prefix:localName`; everything else falls back to the
/// canonical N-Triples lexical form.
pub fn render_value(value: Option<&Value>, namespaces: &[Namespace], abbreviate: bool) -> String {
    let Some(value) = value else {
        return String::new();
    };
    if abbreviate {
        if let Value::Iri(iri) = value {
            let (namespace, local_name) = split_iri(iri);
            if let Some(prefix) = resolve_prefix(namespace, namespaces) {
                return format!("{prefix}:{local_name}");
            }
        }
    }
    value.to_ntriples()
}

/// Resolves the declared prefix for a namespace IRI.
///
/// Linear scan; the first exact match wins. With duplicate entries for the
/// same IRI the outcome depends on the order of `namespaces`.
pub fn resolve_prefix<'a>(namespace: &str, namespaces: &'a [Namespace]) -> Option<&'a str> {
    namespaces
        .iter()
        .find(|ns| ns.iri == namespace)
        .map(|ns| ns.prefix.as_str())
}
