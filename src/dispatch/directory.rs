use async_trait::async_trait;
use tracing::{debug, info};

use super::DispatchError;

/// Key of the GraphQL endpoint in AppSync's `uris` map
pub const GRAPHQL_URI_KEY: &str = "GRAPHQL";

/// Resolves the GraphQL endpoint URL for a configured API id
#[async_trait]
pub trait EndpointDirectory: Send + Sync {
    async fn graphql_endpoint(&self, api_id: &str) -> Result<String, DispatchError>;
}

/// AppSync-backed directory (`GetGraphqlApi`)
#[derive(Clone)]
pub struct AppSyncDirectory {
    client: aws_sdk_appsync::Client,
}

impl AppSyncDirectory {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_appsync::Client::new(config),
        }
    }
}

#[async_trait]
impl EndpointDirectory for AppSyncDirectory {
    #[tracing::instrument(skip(self))]
    async fn graphql_endpoint(&self, api_id: &str) -> Result<String, DispatchError> {
        debug!("Looking up GraphQL API");

        let response = self
            .client
            .get_graphql_api()
            .api_id(api_id)
            .send()
            .await
            .map_err(|e| DispatchError::Directory(format!("GetGraphqlApi failed: {}", e)))?;

        let url = response
            .graphql_api()
            .and_then(|api| api.uris())
            .and_then(|uris| uris.get(GRAPHQL_URI_KEY))
            .cloned()
            .ok_or_else(|| {
                DispatchError::Directory(format!("API {} has no {} uri", api_id, GRAPHQL_URI_KEY))
            })?;

        info!(url = %url, "Resolved GraphQL endpoint");
        Ok(url)
    }
}
