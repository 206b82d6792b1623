//! In-memory [StagedConfigService] backed by a json fixture
#![allow(dead_code)]

use indexmap::IndexMap;
use staged_config::api::{ApiError, DeployedProduct, StagedConfigService, StagedProduct};
use staged_config::credential::RevealPolicy;
use staged_config::property::Property;
use staged_config::value::Value;
use std::cell::RefCell;

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    Reveal,
    Placeholder,
    Omit,
}

impl From<&Policy> for RevealPolicy {
    fn from(value: &Policy) -> Self {
        match value {
            Policy::Reveal => RevealPolicy::Reveal,
            Policy::Placeholder => RevealPolicy::Placeholder,
            Policy::Omit => RevealPolicy::Omit,
        }
    }
}

/// Everything the API would return for one product
#[derive(Debug, serde::Deserialize)]
pub struct Fixture {
    pub product: String,
    pub policy: Policy,
    #[serde(default)]
    pub deployed: Vec<String>,
    pub guid: String,
    pub properties: IndexMap<String, Property>,
    #[serde(default)]
    pub networks: Value,
    #[serde(default)]
    pub jobs: IndexMap<String, String>,
    #[serde(default)]
    pub resource_configs: IndexMap<String, Value>,
    #[serde(default)]
    pub credentials: IndexMap<String, Value>,
}

pub struct FakeService {
    pub fixture: Fixture,
    pub calls: RefCell<Vec<String>>,
    pub fail_on: Option<&'static str>,
}

impl FakeService {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture,
            calls: RefCell::new(vec![]),
            fail_on: None,
        }
    }

    pub fn from_json(json: &str) -> Self {
        Self::new(serde_json::from_str(json).expect("valid fixture"))
    }

    pub fn policy(&self) -> RevealPolicy {
        (&self.fixture.policy).into()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &'static str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call.to_string());
        if self.fail_on == Some(call) {
            return Err(ApiError::Other(format!("{call} failed")));
        }
        Ok(())
    }

    fn check_guid(&self, guid: &str) -> Result<(), ApiError> {
        if guid != self.fixture.guid {
            return Err(ApiError::Other(format!("unexpected guid {guid}")));
        }
        Ok(())
    }
}

impl StagedConfigService for FakeService {
    fn list_deployed_products(&self) -> Result<Vec<DeployedProduct>, ApiError> {
        self.record("list_deployed_products")?;
        Ok(self
            .fixture
            .deployed
            .iter()
            .map(|name| DeployedProduct {
                product_type: name.clone(),
                guid: format!("{name}-guid"),
            })
            .collect())
    }

    fn get_staged_product_by_name(&self, name: &str) -> Result<StagedProduct, ApiError> {
        self.record("get_staged_product_by_name")?;
        if name != self.fixture.product {
            return Err(ApiError::ProductNotFound(name.to_string()));
        }
        Ok(StagedProduct {
            product_type: name.to_string(),
            guid: self.fixture.guid.clone(),
        })
    }

    fn get_staged_product_properties(
        &self,
        product_guid: &str,
    ) -> Result<IndexMap<String, Property>, ApiError> {
        self.record("get_staged_product_properties")?;
        self.check_guid(product_guid)?;
        Ok(self.fixture.properties.clone())
    }

    fn get_staged_product_networks_and_azs(&self, product_guid: &str) -> Result<Value, ApiError> {
        self.record("get_staged_product_networks_and_azs")?;
        self.check_guid(product_guid)?;
        Ok(self.fixture.networks.clone())
    }

    fn list_staged_product_jobs(
        &self,
        product_guid: &str,
    ) -> Result<IndexMap<String, String>, ApiError> {
        self.record("list_staged_product_jobs")?;
        self.check_guid(product_guid)?;
        Ok(self.fixture.jobs.clone())
    }

    fn get_staged_product_job_resource_config(
        &self,
        product_guid: &str,
        job_guid: &str,
    ) -> Result<Value, ApiError> {
        self.record("get_staged_product_job_resource_config")?;
        self.check_guid(product_guid)?;
        self.fixture
            .resource_configs
            .get(job_guid)
            .cloned()
            .ok_or_else(|| ApiError::Other(format!("unknown job {job_guid}")))
    }

    fn get_deployed_product_credential(
        &self,
        product_guid: &str,
        reference: &str,
    ) -> Result<Value, ApiError> {
        self.record("get_deployed_product_credential")?;
        self.check_guid(product_guid)?;
        self.fixture
            .credentials
            .get(reference)
            .cloned()
            .ok_or_else(|| ApiError::Other(format!("unknown credential {reference}")))
    }
}
