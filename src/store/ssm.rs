//! AWS SSM Parameter Store client

use super::{ParameterStore, StoreError};
use aws_config::BehaviorVersion;
use aws_sdk_ssm::config::Region;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::Client;

#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    /// Build a client from the default AWS credential chain.
    ///
    /// `region` overrides the region resolved by the chain.
    pub async fn connect(region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let shared_config = loader.load().await;
        Self::from_client(Client::new(&shared_config))
    }

    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl ParameterStore for SsmParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<String, StoreError> {
        let output = self
            .client
            .get_parameter()
            .name(name)
            .send()
            .await
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found());
                if not_found {
                    StoreError::NotFound {
                        name: name.to_string(),
                    }
                } else {
                    StoreError::Backend {
                        name: name.to_string(),
                        message: DisplayErrorContext(&err).to_string(),
                    }
                }
            })?;

        output
            .parameter()
            .and_then(|p| p.value())
            .map(str::to_string)
            .ok_or_else(|| StoreError::MissingValue {
                name: name.to_string(),
            })
    }
}
