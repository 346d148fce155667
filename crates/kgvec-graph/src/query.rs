//! SPARQL text for the entity snapshot.
//!
//! One row per `(entity, annotation property, literal value, entity type)`.
//! Rows are grouped into entities by [`crate::ingest`].

use std::fmt::Write;

const PREFIXES: &str = "\
PREFIX owl: <http://www.w3.org/2002/07/owl#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX dct: <http://purl.org/dc/terms/>
PREFIX cmns-av: <https://www.omg.org/spec/Commons/AnnotationVocabulary/>
PREFIX sm: <http://www.omg.org/techprocess/ab/SpecificationMetadata/>
";

/// Named graphs read by default.
pub const DEFAULT_GRAPHS: &[&str] = &[
    "http://acme.com/graph/fibo-ontology",
    "http://acme.com/graph/acme-ontology",
];

/// OWL class of the entity and the tag bound to `?entityType`.
const DEFAULT_ENTITY_TYPES: &[(&str, &str)] = &[
    ("owl:Class", "Class"),
    ("owl:NamedIndividual", "NamedIndividual"),
    ("owl:ObjectProperty", "ObjectProperty"),
    ("owl:DatatypeProperty", "DatatypeProperty"),
];

/// Built-in properties read even though they are not declared annotation properties.
const DEFAULT_BUILTIN_PROPERTIES: &[&str] = &[
    "rdfs:label",
    "rdfs:comment",
    "rdfs:seeAlso",
    "rdfs:isDefinedBy",
    "owl:versionInfo",
];

/// Provenance and bookkeeping properties that add no meaning to the text.
const DEFAULT_EXCLUDED_PROPERTIES: &[&str] = &[
    "dct:issued",
    "dct:license",
    "dct:modified",
    "cmns-av:copyright",
    "cmns-av:adaptedFrom",
    "dct:rights",
    "sm:directSource",
    "owl:minQualifiedCardinality",
    "dct:source",
    "owl:versionInfo",
];

/// Shape of the entity snapshot query.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityQuery {
    /// Graph IRIs added as `FROM` clauses. Empty means the default graph.
    pub graphs: Vec<String>,
    /// `(class, tag)` pairs; each becomes one UNION branch.
    pub entity_types: Vec<(String, String)>,
    pub builtin_properties: Vec<String>,
    pub excluded_properties: Vec<String>,
}

impl Default for EntityQuery {
    fn default() -> Self {
        Self {
            graphs: DEFAULT_GRAPHS.iter().map(|g| g.to_string()).collect(),
            entity_types: DEFAULT_ENTITY_TYPES
                .iter()
                .map(|(class, tag)| (class.to_string(), tag.to_string()))
                .collect(),
            builtin_properties: DEFAULT_BUILTIN_PROPERTIES.iter().map(|p| p.to_string()).collect(),
            excluded_properties: DEFAULT_EXCLUDED_PROPERTIES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl EntityQuery {
    /// Default query shape over the given graphs.
    pub fn for_graphs(graphs: Vec<String>) -> Self {
        Self {
            graphs,
            ..Default::default()
        }
    }

    /// Render the SELECT query.
    pub fn to_sparql(&self) -> String {
        let mut q = String::from(PREFIXES);
        q.push('\n');
        q.push_str("SELECT ?uri ?property ?value ?entityType\n");
        for graph in &self.graphs {
            let _ = writeln!(q, "FROM <{}>", graph);
        }
        q.push_str("WHERE {\n");

        let branches: Vec<String> = self
            .entity_types
            .iter()
            .map(|(class, tag)| {
                format!(
                    "  {{\n    ?uri a {} .\n    BIND(\"{}\" AS ?entityType)\n  }}",
                    class,
                    escape_literal(tag)
                )
            })
            .collect();
        q.push_str(&branches.join("\n  UNION\n"));
        q.push_str("\n\n  FILTER(isIRI(?uri))\n\n  ?uri ?property ?value .\n\n");

        if self.builtin_properties.is_empty() {
            q.push_str("  ?property a owl:AnnotationProperty .\n");
        } else {
            let _ = writeln!(
                q,
                "  {{\n    ?property a owl:AnnotationProperty .\n  }}\n  UNION\n  {{\n    VALUES ?property {{ {} }}\n  }}",
                self.builtin_properties.join(" ")
            );
        }

        if !self.excluded_properties.is_empty() {
            let _ = writeln!(
                q,
                "\n  FILTER(?property NOT IN ({}))",
                self.excluded_properties.join(", ")
            );
        }

        q.push_str("\n  FILTER(isLiteral(?value))\n}\n");
        q
    }
}

fn escape_literal(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_shape() {
        let q = EntityQuery::default().to_sparql();
        assert!(q.starts_with("PREFIX owl:"));
        assert!(q.contains("SELECT ?uri ?property ?value ?entityType"));
        assert!(q.contains("FROM <http://acme.com/graph/fibo-ontology>"));
        assert!(q.contains("FROM <http://acme.com/graph/acme-ontology>"));
        assert!(q.contains("BIND(\"NamedIndividual\" AS ?entityType)"));
        assert_eq!(q.matches("?uri a ").count(), 4);
        assert!(q.contains("VALUES ?property { rdfs:label rdfs:comment"));
        assert!(q.contains("cmns-av:copyright, cmns-av:adaptedFrom, dct:rights"));
        assert!(q.trim_end().ends_with('}'));
    }

    #[test]
    fn test_braces_balanced() {
        let q = EntityQuery::default().to_sparql();
        assert_eq!(q.matches('{').count(), q.matches('}').count());
    }

    #[test]
    fn test_no_graphs_no_from() {
        let q = EntityQuery::for_graphs(Vec::new()).to_sparql();
        assert!(!q.contains("FROM <"));
    }

    #[test]
    fn test_annotation_only_query() {
        let query = EntityQuery {
            builtin_properties: Vec::new(),
            excluded_properties: Vec::new(),
            ..Default::default()
        };
        let q = query.to_sparql();
        assert!(!q.contains("VALUES"));
        assert!(!q.contains("NOT IN"));
        assert!(q.contains("?property a owl:AnnotationProperty ."));
    }
}
