//! SPARQL JSON results into entity records.
//!
//! Bindings are grouped by URI in first-seen order. A URI that appears under
//! several entity types collapses into one record carrying all of them.

use std::collections::HashMap;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use kgvec_core::EntityRecord;

use crate::source::FetchedEntities;

/// `application/sparql-results+json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    pub results: SparqlBindings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlBindings {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, SparqlTerm>>,
}

/// One bound RDF term.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlTerm {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(rename = "xml:lang", default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub datatype: Option<String>,
}

/// Local name of a property IRI: after the last `#`, else after the last `/`.
pub fn local_name(iri: &str) -> &str {
    match iri.rfind('#') {
        Some(pos) => &iri[pos + 1..],
        None => iri.rsplit('/').next().unwrap_or(iri),
    }
}

fn binding_value<'a>(binding: &'a HashMap<String, SparqlTerm>, var: &str) -> Option<&'a str> {
    binding
        .get(var)
        .map(|term| term.value.as_str())
        .filter(|value| !value.is_empty())
}

/// Group `?uri ?property ?value ?entityType` rows into entity records.
///
/// Rows missing any variable, or whose property has no local name, are
/// counted as malformed and dropped.
pub fn group_bindings(bindings: Vec<HashMap<String, SparqlTerm>>) -> FetchedEntities {
    let total = bindings.len();
    let mut grouped: IndexMap<String, EntityRecord> = IndexMap::new();
    let mut malformed = 0usize;

    for binding in &bindings {
        let (Some(uri), Some(property), Some(value), Some(entity_type)) = (
            binding_value(binding, "uri"),
            binding_value(binding, "property"),
            binding_value(binding, "value"),
            binding_value(binding, "entityType"),
        ) else {
            malformed += 1;
            continue;
        };

        let property_name = local_name(property);
        if property_name.is_empty() {
            debug!(uri, property, "Skipping binding without property local name");
            malformed += 1;
            continue;
        }

        let record = match grouped.entry(uri.to_string()) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => match EntityRecord::new(uri) {
                Ok(record) => slot.insert(record),
                Err(e) => {
                    debug!(uri, error = %e, "Skipping malformed binding");
                    malformed += 1;
                    continue;
                }
            },
        };

        record.add_entity_type(entity_type);
        record.add_value(property_name, value);
    }

    debug!(
        bindings = total,
        entities = grouped.len(),
        malformed,
        "Grouped SPARQL bindings"
    );

    FetchedEntities {
        entities: grouped.into_values().collect(),
        malformed,
    }
}
