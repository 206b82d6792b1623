//! blocking HTTP implementation of [StagedConfigService]
use crate::api::{ApiError, DeployedProduct, StagedConfigService, StagedProduct};
use crate::config::Target;
use crate::property::Property;
use crate::value::Value;
use indexmap::IndexMap;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpService {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpService {
    pub fn new(target: &Target) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(target.request_timeout)
            .danger_accept_invalid_certs(target.skip_ssl_validation)
            .build()?;

        Ok(Self::with_client(client, target))
    }

    /// Use a preconfigured client
    pub fn with_client(client: Client, target: &Target) -> Self {
        let mut base = target.url.clone();
        // routes are joined relative to the target, keep its path prefix
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Self {
            client,
            base,
            token: target.token.clone(),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.base.join(path)?;
        tracing::info!(%url, "GET");

        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(ApiError::Status {
                method: "GET".to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[derive(serde::Deserialize)]
struct PropertiesResponse {
    properties: IndexMap<String, Property>,
}

#[derive(serde::Deserialize)]
struct NetworksResponse {
    networks_and_azs: Value,
}

#[derive(serde::Deserialize)]
struct JobsResponse {
    jobs: Vec<Job>,
}

#[derive(serde::Deserialize)]
struct Job {
    name: String,
    guid: String,
}

#[derive(serde::Deserialize)]
struct CredentialResponse {
    credential: Credential,
}

#[derive(serde::Deserialize)]
struct Credential {
    value: Value,
}

impl StagedConfigService for HttpService {
    fn list_deployed_products(&self) -> Result<Vec<DeployedProduct>, ApiError> {
        self.get("api/v0/deployed/products")
    }

    fn get_staged_product_by_name(&self, name: &str) -> Result<StagedProduct, ApiError> {
        let staged: Vec<StagedProduct> = self.get("api/v0/staged/products")?;
        staged
            .into_iter()
            .find(|product| product.product_type == name)
            .ok_or_else(|| ApiError::ProductNotFound(name.to_string()))
    }

    fn get_staged_product_properties(
        &self,
        product_guid: &str,
    ) -> Result<IndexMap<String, Property>, ApiError> {
        let response: PropertiesResponse =
            self.get(&format!("api/v0/staged/products/{product_guid}/properties"))?;
        Ok(response.properties)
    }

    fn get_staged_product_networks_and_azs(&self, product_guid: &str) -> Result<Value, ApiError> {
        let response: NetworksResponse =
            self.get(&format!("api/v0/staged/products/{product_guid}/networks_and_azs"))?;
        Ok(response.networks_and_azs)
    }

    fn list_staged_product_jobs(
        &self,
        product_guid: &str,
    ) -> Result<IndexMap<String, String>, ApiError> {
        let response: JobsResponse =
            self.get(&format!("api/v0/staged/products/{product_guid}/jobs"))?;
        Ok(response
            .jobs
            .into_iter()
            .map(|job| (job.name, job.guid))
            .collect())
    }

    fn get_staged_product_job_resource_config(
        &self,
        product_guid: &str,
        job_guid: &str,
    ) -> Result<Value, ApiError> {
        self.get(&format!(
            "api/v0/staged/products/{product_guid}/jobs/{job_guid}/resource_config"
        ))
    }

    fn get_deployed_product_credential(
        &self,
        product_guid: &str,
        reference: &str,
    ) -> Result<Value, ApiError> {
        let response: CredentialResponse = self.get(&format!(
            "api/v0/deployed/products/{product_guid}/credentials/{reference}"
        ))?;
        Ok(response.credential.value)
    }
}
