//! per-property extraction
//!
//! Turns a single [Property] into the node that ends up in the generated config, or into nothing.
//!
//! | property                           | emitted `value`                                 |
//! |------------------------------------|-------------------------------------------------|
//! | not configurable / no value        | nothing                                         |
//! | credential                         | see [crate::credential::resolve]                |
//! | collection                         | list of rows, each row extracted field by field |
//! | anything else (incl. selectors)    | the raw value                                   |
//!
//! Collections recurse: a row's fields get the synthesized path `<collection>[<row>].<field>`.
use crate::api::ApiError;
use crate::credential::{self, CredentialSource, Placeholders, RevealPolicy};
use crate::path::PropertyPath;
use crate::property::{Property, PropertyType, PropertyValue, Row};
use crate::value::Value;
use serde::ser::SerializeMap;
use std::collections::BTreeMap;

/// Emitted representation of one property: `{ value: ... }`
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct ExtractedNode {
    pub value: Extracted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// Raw or revealed value
    Value(Value),
    Placeholder(Placeholders),
    /// Collection rows, row fields sorted by name
    Rows(Vec<BTreeMap<String, ExtractedNode>>),
}

impl serde::Serialize for ExtractedNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut ser = serializer.serialize_map(Some(1))?;
        ser.serialize_entry("value", &self.value)?;
        ser.end()
    }
}

impl serde::Serialize for Extracted {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Extracted::Value(value) => value.serialize(serializer),
            Extracted::Placeholder(placeholders) => placeholders.serialize(serializer),
            Extracted::Rows(rows) => serializer.collect_seq(rows),
        }
    }
}

/// Extracts properties of a single product with a fixed [RevealPolicy]
#[derive(derive_new::new)]
pub struct Extractor<'a> {
    policy: RevealPolicy,
    credentials: &'a dyn CredentialSource,
}

impl Extractor<'_> {
    /// Extract one property
    ///
    /// `Ok(None)` means the property contributes nothing.
    #[tracing::instrument(level = "trace", skip_all, fields(%path))]
    pub fn extract(
        &self,
        path: &PropertyPath,
        property: &Property,
    ) -> Result<Option<ExtractedNode>, ApiError> {
        self.extract_at(path, property)
    }

    fn extract_at(
        &self,
        path: &PropertyPath,
        property: &Property,
    ) -> Result<Option<ExtractedNode>, ApiError> {
        let Some(value) = property.value.as_ref().filter(|_| property.configurable) else {
            return Ok(None);
        };

        match (&property.property_type, value) {
            (PropertyType::Credential(credential_type), _) => {
                credential::resolve(
                    &path.to_string(),
                    credential_type,
                    self.policy,
                    self.credentials,
                )
            }
            (PropertyType::Collection, PropertyValue::Rows(rows)) => self.expand(path, rows),
            (_, PropertyValue::Scalar(value)) => {
                Ok(Some(ExtractedNode::new(Extracted::Value(value.clone()))))
            }
            (property_type, PropertyValue::Rows(_)) => {
                // only collections decode into rows
                tracing::warn!(%path, %property_type, "rows on a non-collection property, omitting");
                Ok(None)
            }
        }
    }

    /// Expand the rows of a collection
    ///
    /// Rows without any emitted field are dropped, a collection without rows is omitted.
    fn expand(&self, path: &PropertyPath, rows: &[Row]) -> Result<Option<ExtractedNode>, ApiError> {
        let mut expanded = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let mut fields = BTreeMap::new();

            for (field, property) in row {
                let field_path = path.indexed(index).child(field);
                if let Some(node) = self.extract_at(&field_path, property)? {
                    fields.insert(field.clone(), node);
                }
            }

            if fields.is_empty() {
                tracing::debug!(%path, index, "collection row has no emitted fields, dropping");
                continue;
            }

            expanded.push(fields);
        }

        if expanded.is_empty() {
            return Ok(None);
        }

        Ok(Some(ExtractedNode::new(Extracted::Rows(expanded))))
    }
}
