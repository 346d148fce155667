//! Graph entities and their canonical text.
//!
//! The canonical text is the unit of change detection: it is what gets
//! embedded and what gets compared against the `text` payload of the stored
//! point on the next run.

pub mod model;

pub use model::EntityRecord;

/// Separator between the values of one property.
pub const VALUE_SEPARATOR: &str = " | ";

/// Separator between property lines.
pub const LINE_SEPARATOR: &str = "\n";

/// Render the canonical text of an entity.
///
/// One `[PROPERTY]: v1 | v2` line per property that has values. Lines are
/// ordered by the upper-cased property name and values are ordered lexically,
/// so the result only depends on the record's content. Returns `None` when
/// there is nothing to embed.
pub fn canonical_text(record: &EntityRecord) -> Option<String> {
    let mut lines: Vec<(String, &str, String)> = record
        .properties()
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| {
            let tag = name.to_uppercase();
            let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
            sorted.sort_unstable();
            let line = format!("[{}]: {}", tag, sorted.join(VALUE_SEPARATOR));
            (tag, name.as_str(), line)
        })
        .collect();

    // Tie-break on the original name so "label" and "Label" keep a fixed order.
    lines.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));

    let joined = lines
        .into_iter()
        .map(|(_, _, line)| line)
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR);

    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party() -> EntityRecord {
        EntityRecord::new("https://spec.edmcouncil.org/fibo/ontology/FND/Parties/Parties/Party")
            .unwrap()
            .with_entity_type("Class")
            .with_value("label", "party")
            .with_value("definition", "person or organization")
            .with_value("definition", "legal entity")
    }

    #[test]
    fn test_renders_tagged_lines() {
        let text = canonical_text(&party()).unwrap();
        assert_eq!(
            text,
            "[DEFINITION]: legal entity | person or organization\n[LABEL]: party"
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = party();
        let b = EntityRecord::new(a.uri())
            .unwrap()
            .with_value("definition", "legal entity")
            .with_value("label", "party")
            .with_value("definition", "person or organization")
            .with_entity_type("Class");

        assert_eq!(canonical_text(&a), canonical_text(&b));
    }

    #[test]
    fn test_duplicate_values_collapse() {
        let record = EntityRecord::new("http://acme.com/ontology#Customer")
            .unwrap()
            .with_value("label", "customer")
            .with_value("label", "customer");
        assert_eq!(canonical_text(&record).unwrap(), "[LABEL]: customer");
    }

    #[test]
    fn test_no_properties_yields_none() {
        let record = EntityRecord::new("http://acme.com/ontology#Empty")
            .unwrap()
            .with_entity_type("Class");
        assert_eq!(canonical_text(&record), None);
    }

    #[test]
    fn test_empty_value_lists_yield_none() {
        let mut record = EntityRecord::new("http://acme.com/ontology#Empty").unwrap();
        record.set_values("label", Vec::<String>::new());
        record.set_values("comment", Vec::<String>::new());
        assert_eq!(canonical_text(&record), None);
    }

    #[test]
    fn test_case_variants_have_stable_order() {
        let a = EntityRecord::new("http://acme.com/ontology#X")
            .unwrap()
            .with_value("label", "lower")
            .with_value("Label", "upper");
        let b = EntityRecord::new("http://acme.com/ontology#X")
            .unwrap()
            .with_value("Label", "upper")
            .with_value("label", "lower");

        let text = canonical_text(&a).unwrap();
        assert_eq!(text, "[LABEL]: upper\n[LABEL]: lower");
        assert_eq!(Some(text), canonical_text(&b));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let record = EntityRecord::new("http://acme.com/ontology#Y")
            .unwrap()
            .with_value("comment", "spaced out   ");
        assert_eq!(canonical_text(&record).unwrap(), "[COMMENT]: spaced out");
    }

    #[test]
    fn test_merge_unions_types_and_values() {
        let mut class = EntityRecord::new("http://acme.com/ontology#Punned")
            .unwrap()
            .with_entity_type("Class")
            .with_value("label", "punned");
        let individual = EntityRecord::new("http://acme.com/ontology#Punned")
            .unwrap()
            .with_entity_type("NamedIndividual")
            .with_value("label", "punned")
            .with_value("comment", "also an individual");

        class.merge(individual).unwrap();

        assert_eq!(class.sorted_entity_types(), vec!["Class", "NamedIndividual"]);
        assert_eq!(class.value_count(), 2);
        assert_eq!(
            canonical_text(&class).unwrap(),
            "[COMMENT]: also an individual\n[LABEL]: punned"
        );
    }

    #[test]
    fn test_merge_rejects_other_uri() {
        let mut a = EntityRecord::new("http://acme.com/ontology#A").unwrap();
        let b = EntityRecord::new("http://acme.com/ontology#B").unwrap();
        assert!(a.merge(b).is_err());
    }

    #[test]
    fn test_blank_uri_is_malformed() {
        let err = EntityRecord::new("  ").unwrap_err();
        assert!(err.is_per_entity());
    }
}
