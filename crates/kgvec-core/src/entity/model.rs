//! Entity domain models.

use indexmap::{IndexMap, IndexSet};

use crate::error::{KgvecError, KgvecResult};

/// A graph entity reduced to its literal annotations.
///
/// Property values and entity types are kept in insertion-ordered sets, so a
/// value seen twice is stored once and iteration order never depends on
/// hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    uri: String,
    properties: IndexMap<String, IndexSet<String>>,
    entity_types: IndexSet<String>,
}

impl EntityRecord {
    /// Create an empty record. Fails with `MalformedEntity` for a blank URI.
    pub fn new(uri: impl Into<String>) -> KgvecResult<Self> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(KgvecError::malformed("entity URI is empty"));
        }

        Ok(Self {
            uri,
            properties: IndexMap::new(),
            entity_types: IndexSet::new(),
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Property name to values, in first-seen order.
    pub fn properties(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.properties
    }

    pub fn values(&self, property: &str) -> Option<&IndexSet<String>> {
        self.properties.get(property)
    }

    pub fn entity_types(&self) -> &IndexSet<String> {
        &self.entity_types
    }

    /// Entity types in lexical order, as stored in the point payload.
    pub fn sorted_entity_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.entity_types.iter().cloned().collect();
        types.sort();
        types
    }

    /// Add a value to a property. Returns false if the value was already present.
    pub fn add_value(&mut self, property: impl Into<String>, value: impl Into<String>) -> bool {
        self.properties
            .entry(property.into())
            .or_default()
            .insert(value.into())
    }

    /// Replace every value of a property.
    pub fn set_values<I, V>(&mut self, property: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values: IndexSet<String> = values.into_iter().map(Into::into).collect();
        self.properties.insert(property.into(), values);
    }

    pub fn add_entity_type(&mut self, entity_type: impl Into<String>) -> bool {
        self.entity_types.insert(entity_type.into())
    }

    pub fn with_value(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_value(property, value);
        self
    }

    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.add_entity_type(entity_type);
        self
    }

    /// Union another record for the same URI into this one.
    ///
    /// Used when the same IRI shows up under several OWL types (punning).
    pub fn merge(&mut self, other: EntityRecord) -> KgvecResult<()> {
        if other.uri != self.uri {
            return Err(KgvecError::malformed(format!(
                "cannot merge '{}' into '{}'",
                other.uri, self.uri
            )));
        }

        for entity_type in other.entity_types {
            self.entity_types.insert(entity_type);
        }
        for (property, values) in other.properties {
            let slot = self.properties.entry(property).or_default();
            for value in values {
                slot.insert(value);
            }
        }
        Ok(())
    }

    /// Number of distinct (property, value) pairs.
    pub fn value_count(&self) -> usize {
        self.properties.values().map(IndexSet::len).sum()
    }
}
