//! credential handling
//!
//! Credentials are never part of the property listing. Depending on [RevealPolicy] a credential
//! property is fetched from the deployed product, replaced by `((path.field))` placeholders that
//! can be interpolated later, or left out.
use crate::api::ApiError;
use crate::extract::{Extracted, ExtractedNode};
use crate::value::Value;
use std::fmt::{Display, Formatter};

/// How credential properties end up in the generated config
///
/// One policy applies to a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevealPolicy {
    /// Fetch and emit the actual value (product must be deployed)
    Reveal,
    /// Emit interpolation placeholders
    Placeholder,
    /// Leave credentials out
    #[default]
    Omit,
}

/// Kinds of credentials known to the remote API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialType {
    Secret,
    SimpleCredentials,
    RsaCertCredentials,
    RsaPkeyCredentials,
    SaltedCredentials,
    Unknown(String),
}

impl CredentialType {
    /// Fields of the credential value, sorted
    ///
    /// Unknown credential types have no known fields.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            CredentialType::Secret => &["secret"],
            CredentialType::SimpleCredentials => &["identity", "password"],
            CredentialType::RsaCertCredentials => &["cert_pem", "private_key_pem"],
            CredentialType::RsaPkeyCredentials => &["private_key_pem"],
            CredentialType::SaltedCredentials => &["identity", "password", "salt"],
            CredentialType::Unknown(_) => &[],
        }
    }
}

impl From<&str> for CredentialType {
    fn from(value: &str) -> Self {
        match value {
            "secret" => CredentialType::Secret,
            "simple_credentials" => CredentialType::SimpleCredentials,
            "rsa_cert_credentials" => CredentialType::RsaCertCredentials,
            "rsa_pkey_credentials" => CredentialType::RsaPkeyCredentials,
            "salted_credentials" => CredentialType::SaltedCredentials,
            other => CredentialType::Unknown(other.to_string()),
        }
    }
}

impl Display for CredentialType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialType::Secret => f.write_str("secret"),
            CredentialType::SimpleCredentials => f.write_str("simple_credentials"),
            CredentialType::RsaCertCredentials => f.write_str("rsa_cert_credentials"),
            CredentialType::RsaPkeyCredentials => f.write_str("rsa_pkey_credentials"),
            CredentialType::SaltedCredentials => f.write_str("salted_credentials"),
            CredentialType::Unknown(name) => f.write_str(name),
        }
    }
}

/// Source of actual credential values, keyed by property path
pub trait CredentialSource {
    fn fetch_credential(&self, path: &str) -> Result<Value, ApiError>;
}

// blanket impl for Fn
impl<F> CredentialSource for F
where
    F: Fn(&str) -> Result<Value, ApiError>,
{
    fn fetch_credential(&self, path: &str) -> Result<Value, ApiError> {
        self(path)
    }
}

/// Placeholders for every field of a credential: `((<path>.<field>))`
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholders {
    pub path: String,
    pub fields: &'static [&'static str],
}

impl Placeholders {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        self.fields
            .iter()
            .map(|field| (*field, format!("(({}.{field}))", self.path)))
    }
}

impl serde::Serialize for Placeholders {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

/// Produce the node for a credential property
///
/// `Ok(None)` means the property is left out.
pub fn resolve(
    path: &str,
    credential_type: &CredentialType,
    policy: RevealPolicy,
    source: &dyn CredentialSource,
) -> Result<Option<ExtractedNode>, ApiError> {
    match policy {
        RevealPolicy::Reveal => {
            let value = source.fetch_credential(path)?;
            Ok(Some(ExtractedNode::new(Extracted::Value(value.sorted()))))
        }
        RevealPolicy::Placeholder => {
            if let CredentialType::Unknown(name) = credential_type {
                tracing::debug!(path, credential_type = %name, "unknown credential type, omitting");
                return Ok(None);
            }

            Ok(Some(ExtractedNode::new(Extracted::Placeholder(
                Placeholders {
                    path: path.to_string(),
                    fields: credential_type.fields(),
                },
            ))))
        }
        RevealPolicy::Omit => Ok(None),
    }
}
