use std::collections::HashSet;

use docforge_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::field::FieldSchema;
use crate::form_data::FormDataMap;

/// Registry entry describing one selectable document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTypeSummary {
    id: NonEmptyString,
    name: NonEmptyString,
    icon: String,
}

impl DocumentTypeSummary {
    /// Creates a validated registry entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            name: NonEmptyString::new(name)?,
            icon: icon.into(),
        })
    }

    /// Returns the document type identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the icon key.
    #[must_use]
    pub fn icon(&self) -> &str {
        self.icon.as_str()
    }
}

/// Ordered set of selectable document types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTypeRegistry {
    entries: Vec<DocumentTypeSummary>,
}

impl DocumentTypeRegistry {
    /// Creates a registry, rejecting duplicate identifiers.
    pub fn new(entries: Vec<DocumentTypeSummary>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id().to_owned()) {
                return Err(AppError::Validation(format!(
                    "duplicate document type '{}' in registry",
                    entry.id()
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Returns all entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[DocumentTypeSummary] {
        &self.entries
    }

    /// Finds one entry by identifier.
    #[must_use]
    pub fn find(&self, document_type_id: &str) -> Option<&DocumentTypeSummary> {
        self.entries
            .iter()
            .find(|entry| entry.id() == document_type_id)
    }
}

/// Fields of one document type grouped under a section name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSection<'a> {
    /// Section name.
    pub name: &'a str,
    /// Fields in config order.
    pub fields: Vec<&'a FieldSchema>,
}

/// Field configuration for one document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    id: NonEmptyString,
    name: NonEmptyString,
    icon: String,
    fields: Vec<FieldSchema>,
    #[serde(default, skip_serializing_if = "FormDataMap::is_empty")]
    initial_values: FormDataMap,
}

impl DocumentConfig {
    /// Creates a validated document config.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        fields: Vec<FieldSchema>,
    ) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.id().to_owned()) {
                return Err(AppError::Validation(format!(
                    "duplicate field '{}' in document config",
                    field.id()
                )));
            }
        }

        Ok(Self {
            id: NonEmptyString::new(id)?,
            name: NonEmptyString::new(name)?,
            icon: icon.into(),
            fields,
            initial_values: FormDataMap::new(),
        })
    }

    /// Attaches values pre-populated by the config source, keeping only known fields.
    #[must_use]
    pub fn with_initial_values(mut self, values: FormDataMap) -> Self {
        let mut known = FormDataMap::new();
        for (field_id, value) in values.iter() {
            if self.field(field_id).is_some() {
                known.set(field_id, value.clone());
            }
        }
        self.initial_values = known;
        self
    }

    /// Returns the document type identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the icon key.
    #[must_use]
    pub fn icon(&self) -> &str {
        self.icon.as_str()
    }

    /// Returns fields in config order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Returns values pre-populated by the config source.
    #[must_use]
    pub fn initial_values(&self) -> &FormDataMap {
        &self.initial_values
    }

    /// Finds one field by identifier.
    #[must_use]
    pub fn field(&self, field_id: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.id() == field_id)
    }

    /// Groups fields by section, keeping first-encounter order of sections.
    #[must_use]
    pub fn sections(&self) -> Vec<FieldSection<'_>> {
        let mut sections: Vec<FieldSection<'_>> = Vec::new();
        for field in &self.fields {
            match sections
                .iter()
                .position(|section| section.name == field.section())
            {
                Some(index) => sections[index].fields.push(field),
                None => sections.push(FieldSection {
                    name: field.section(),
                    fields: vec![field],
                }),
            }
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentConfig, DocumentTypeRegistry, DocumentTypeSummary};
    use crate::{DEFAULT_SECTION, FieldKind, FieldSchema, FormDataMap, FormValue};

    fn field(id: &str, section: Option<&str>) -> FieldSchema {
        let field = FieldSchema::new(id, id, FieldKind::Text).unwrap_or_else(|_| unreachable!());
        match section {
            Some(section) => field.with_section(section),
            None => field,
        }
    }

    #[test]
    fn sections_keep_encounter_order() {
        let config = DocumentConfig::new(
            "addition",
            "Addition",
            "plus",
            vec![
                field("zeta", Some("Vendor")),
                field("alpha", None),
                field("beta", Some("Vendor")),
                field("gamma", Some("Contract")),
            ],
        )
        .unwrap_or_else(|_| unreachable!());

        let sections = config.sections();
        let names: Vec<&str> = sections.iter().map(|section| section.name).collect();
        assert_eq!(names, vec!["Vendor", DEFAULT_SECTION, "Contract"]);

        let vendor_ids: Vec<&str> = sections[0].fields.iter().map(|field| field.id()).collect();
        assert_eq!(vendor_ids, vec!["zeta", "beta"]);
    }

    #[test]
    fn initial_values_drop_unknown_fields() {
        let mut values = FormDataMap::new();
        values.set("alpha", FormValue::from("kept"));
        values.set("ghost", FormValue::from("dropped"));

        let config = DocumentConfig::new("addition", "Addition", "plus", vec![field("alpha", None)])
            .unwrap_or_else(|_| unreachable!())
            .with_initial_values(values);

        assert_eq!(config.initial_values().len(), 1);
        assert_eq!(config.initial_values().text("alpha"), "kept");
    }

    #[test]
    fn config_rejects_duplicate_fields() {
        let result = DocumentConfig::new(
            "addition",
            "Addition",
            "plus",
            vec![field("name", None), field("name", None)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn registry_rejects_duplicate_ids() {
        let entry =
            DocumentTypeSummary::new("addition", "Addition", "plus").unwrap_or_else(|_| unreachable!());
        let result = DocumentTypeRegistry::new(vec![entry.clone(), entry]);
        assert!(result.is_err());
    }
}
