//! staged config document
//!
//! see [generate] and [assemble]
use crate::api::{ApiError, StagedConfigService};
use crate::credential::RevealPolicy;
use crate::extract::{ExtractedNode, Extractor};
use crate::path::{PathError, PropertyPath};
use crate::property::{Property, PropertyType, PropertyValue};
use crate::selector::{self, SelectorValues};
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Config that can be passed to configure-product
///
/// All maps are sorted so generating twice from the same data yields the same output.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StagedConfig {
    #[serde(rename = "product-properties")]
    pub product_properties: BTreeMap<String, ExtractedNode>,
    #[serde(rename = "network-properties")]
    pub network_properties: Value,
    #[serde(rename = "resource-config")]
    pub resource_config: BTreeMap<String, Value>,
}

/// Fetch everything about a staged product and assemble its config
///
/// With [RevealPolicy::Reveal] the product must have been deployed, this is checked before
/// anything else is fetched.
#[tracing::instrument(level = "debug", skip(service))]
pub fn generate(
    service: &dyn StagedConfigService,
    product: &str,
    policy: RevealPolicy,
) -> Result<StagedConfig, AssembleError> {
    if policy == RevealPolicy::Reveal {
        let deployed = service.list_deployed_products()?;
        if !deployed.iter().any(|p| p.product_type == product) {
            return Err(AssembleError::NotDeployed {
                product: product.to_string(),
            });
        }
        tracing::info!(product, "product is deployed, credentials will be revealed");
    }

    let product_guid = service.get_staged_product_by_name(product)?.guid;
    let properties = service.get_staged_product_properties(&product_guid)?;

    let network_properties = service.get_staged_product_networks_and_azs(&product_guid)?;

    let mut resource_config = vec![];
    for (job_name, job_guid) in service.list_staged_product_jobs(&product_guid)? {
        let job_config = service.get_staged_product_job_resource_config(&product_guid, &job_guid)?;
        resource_config.push((job_name, job_config));
    }

    let fetch_credential =
        |reference: &str| service.get_deployed_product_credential(&product_guid, reference);
    let extractor = Extractor::new(policy, &fetch_credential);

    assemble(&properties, &extractor, network_properties, resource_config)
}

/// Assemble a config from already fetched data
///
/// Credentials are only fetched here, through the extractor.
pub fn assemble(
    properties: &IndexMap<String, Property>,
    extractor: &Extractor<'_>,
    network_properties: Value,
    resource_config: impl IntoIterator<Item = (String, Value)>,
) -> Result<StagedConfig, AssembleError> {
    Ok(StagedConfig {
        product_properties: extract_properties(properties, extractor)?,
        network_properties: network_properties.sorted(),
        resource_config: resource_config
            .into_iter()
            .map(|(job, config)| (job, config.sorted()))
            .collect(),
    })
}

/// Extract all properties and drop unselected selector branches
pub fn extract_properties(
    properties: &IndexMap<String, Property>,
    extractor: &Extractor<'_>,
) -> Result<BTreeMap<String, ExtractedNode>, AssembleError> {
    let mut candidates = vec![];
    let mut selectors = SelectorValues::new();

    for (name, property) in properties {
        if !property.is_emittable() {
            tracing::debug!(property = %name, "not configurable or empty, skipping");
            continue;
        }

        let path: PropertyPath = name.parse()?;

        if property.property_type == PropertyType::Selector {
            match &property.value {
                Some(PropertyValue::Scalar(Value::String(chosen))) => {
                    selectors.insert(path.clone(), chosen.clone());
                }
                _ => tracing::warn!(property = %name, "selector value is not a string"),
            }
        }

        match extractor.extract(&path, property)? {
            Some(node) => candidates.push((path, (name, node))),
            None => tracing::debug!(property = %name, "omitted"),
        }
    }

    Ok(selector::filter(candidates, &selectors)
        .into_iter()
        .map(|(_, (name, node))| (name.clone(), node))
        .collect())
}

#[derive(thiserror::Error, Debug)]
pub enum AssembleError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("cannot retrieve credentials for product '{product}': deploy the product and retry")]
    NotDeployed { product: String },
    #[error("staged product returned an invalid property path")]
    InvalidPath(#[from] PathError),
}
