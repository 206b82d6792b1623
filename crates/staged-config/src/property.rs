//! staged product properties
//!
//! The remote API describes every configurable setting of a staged product as
//!
//! ```json
//! { "type": "simple_credentials", "configurable": true, "credential": true, "value": { ... } }
//! ```
//!
//! [Property] is the typed form of that description. A collection's value is a list of rows
//! where each row maps a field name to a nested [Property].
use crate::credential::CredentialType;
use crate::value::Value;

/// One configurable setting of a staged product
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(try_from = "RawProperty")]
pub struct Property {
    pub property_type: PropertyType,
    pub configurable: bool,
    pub value: Option<PropertyValue>,
}

impl Property {
    pub fn is_credential(&self) -> bool {
        matches!(self.property_type, PropertyType::Credential(_))
    }

    /// Whether this property can contribute to the generated config at all
    pub fn is_emittable(&self) -> bool {
        self.configurable && self.value.is_some()
    }
}

/// Declared type of a [Property]
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    /// Choice between named branches, the value is the chosen branch
    Selector,
    /// List of rows
    Collection,
    Credential(CredentialType),
    /// Any other type, carrying the declared type name (`string`, `integer`, `port`, ...)
    Scalar(String),
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyType::Selector => f.write_str("selector"),
            PropertyType::Collection => f.write_str("collection"),
            PropertyType::Credential(credential_type) => credential_type.fmt(f),
            PropertyType::Scalar(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(Value),
    Rows(Vec<Row>),
}

/// One row of a collection: field name to property
pub type Row = indexmap::IndexMap<String, Property>;

/// Wire representation
#[derive(serde::Deserialize)]
struct RawProperty {
    #[serde(rename = "type")]
    property_type: String,
    #[serde(default)]
    configurable: bool,
    #[serde(default)]
    credential: bool,
    #[serde(default)]
    value: serde_json::Value,
}

impl TryFrom<RawProperty> for Property {
    type Error = PropertyDecodeError;

    fn try_from(raw: RawProperty) -> Result<Self, Self::Error> {
        let property_type = match (raw.credential, raw.property_type.as_str()) {
            (true, name) => PropertyType::Credential(CredentialType::from(name)),
            (false, "selector") => PropertyType::Selector,
            (false, "collection") => PropertyType::Collection,
            (false, name) => PropertyType::Scalar(name.to_string()),
        };

        let value = match (&property_type, raw.value) {
            (_, serde_json::Value::Null) => None,
            (PropertyType::Collection, value @ serde_json::Value::Array(_)) => {
                let rows: Vec<Row> = serde_json::from_value(value)
                    .map_err(|err| PropertyDecodeError::InvalidRows(err.to_string()))?;
                Some(PropertyValue::Rows(rows))
            }
            (PropertyType::Collection, _) => return Err(PropertyDecodeError::CollectionNotAList),
            (_, value) => Some(PropertyValue::Scalar(value.into())),
        };

        Ok(Property {
            property_type,
            configurable: raw.configurable,
            value,
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PropertyDecodeError {
    #[error("collection value must be a list of rows")]
    CollectionNotAList,
    #[error("invalid collection row: {0}")]
    InvalidRows(String),
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_scalar() {
        let property: Property = serde_json::from_str(
            r#"{"type": "string", "configurable": true, "credential": false, "value": "hello", "optional": false}"#,
        )
        .unwrap();

        assert_eq!(
            property,
            Property {
                property_type: PropertyType::Scalar("string".to_string()),
                configurable: true,
                value: Some(PropertyValue::Scalar("hello".into())),
            }
        );
        assert!(property.is_emittable());
        assert!(!property.is_credential());
    }

    #[test]
    fn decode_null_value() {
        let property: Property =
            serde_json::from_str(r#"{"type": "integer", "configurable": true, "value": null}"#)
                .unwrap();
        assert_eq!(property.value, None);
        assert!(!property.is_emittable());
    }

    #[test]
    fn decode_credential() {
        let property: Property = serde_json::from_str(
            r#"{"type": "rsa_cert_credentials", "configurable": true, "credential": true, "value": {"cert_pem": "***"}}"#,
        )
        .unwrap();
        assert_eq!(
            property.property_type,
            PropertyType::Credential(CredentialType::RsaCertCredentials)
        );
        assert!(property.is_credential());
    }

    #[test]
    fn decode_nested_collection() {
        let property: Property = serde_json::from_str(
            r#"{
                "type": "collection",
                "configurable": true,
                "credential": false,
                "value": [
                    {
                        "name": {"type": "string", "configurable": true, "credential": false, "value": "one"},
                        "tags": {"type": "collection", "configurable": true, "credential": false, "value": [
                            {"tag": {"type": "string", "configurable": true, "credential": false, "value": "x"}}
                        ]}
                    }
                ]
            }"#,
        )
        .unwrap();

        let Some(PropertyValue::Rows(rows)) = property.value else {
            panic!("collection must decode into rows");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0]["name"].value,
            Some(PropertyValue::Scalar("one".into()))
        );
        assert!(matches!(
            rows[0]["tags"].value,
            Some(PropertyValue::Rows(ref nested)) if nested.len() == 1
        ));
    }

    #[test]
    fn decode_collection_requires_rows() {
        let result = serde_json::from_str::<Property>(
            r#"{"type": "collection", "configurable": true, "value": "nope"}"#,
        );
        assert!(result.is_err());
    }
}
