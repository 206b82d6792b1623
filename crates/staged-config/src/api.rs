//! remote configuration API
//!
//! [StagedConfigService] lists everything the generator needs from the remote API. The
//! production implementation is [crate::http::HttpService].
use crate::property::Property;
use crate::value::Value;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct DeployedProduct {
    #[serde(rename = "type")]
    pub product_type: String,
    pub guid: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct StagedProduct {
    #[serde(rename = "type")]
    pub product_type: String,
    pub guid: String,
}

/// Collaborator operations, each a single blocking call
pub trait StagedConfigService {
    fn list_deployed_products(&self) -> Result<Vec<DeployedProduct>, ApiError>;

    fn get_staged_product_by_name(&self, name: &str) -> Result<StagedProduct, ApiError>;

    fn get_staged_product_properties(
        &self,
        product_guid: &str,
    ) -> Result<IndexMap<String, Property>, ApiError>;

    fn get_staged_product_networks_and_azs(&self, product_guid: &str) -> Result<Value, ApiError>;

    /// Job name to job guid
    fn list_staged_product_jobs(
        &self,
        product_guid: &str,
    ) -> Result<IndexMap<String, String>, ApiError>;

    fn get_staged_product_job_resource_config(
        &self,
        product_guid: &str,
        job_guid: &str,
    ) -> Result<Value, ApiError>;

    fn get_deployed_product_credential(
        &self,
        product_guid: &str,
        reference: &str,
    ) -> Result<Value, ApiError>;
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed")]
    Http(#[from] reqwest::Error),
    #[error("invalid request url")]
    Url(#[from] url::ParseError),
    #[error("request {method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response of {url}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
    #[error("could not find product \"{0}\"")]
    ProductNotFound(String),
    #[error("{0}")]
    Other(String),
}
