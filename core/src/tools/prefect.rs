use crate::tools::{PrefectConfig, ToolVersionError, VersionProvider};
use async_trait::async_trait;

pub struct PrefectVersionProvider {
    client: reqwest::Client,
    config: PrefectConfig,
}

impl PrefectVersionProvider {
    pub fn new(client: reqwest::Client, config: PrefectConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl VersionProvider for PrefectVersionProvider {
    fn tool_name(&self) -> &str {
        "Prefect"
    }

    async fn version(&self) -> Result<String, ToolVersionError> {
        let url = format!(
            "{}/api/admin/version",
            self.config.url.trim_end_matches('/')
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ToolVersionError::Status(status.as_u16(), body));
        }

        // The endpoint answers with a bare JSON string
        let version: String = response.json().await?;
        Ok(version)
    }
}
