use crate::tools::{AirbyteConfig, ToolVersionError, VersionProvider};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Deserialize)]
struct InstanceConfiguration {
    version: String,
}

pub struct AirbyteVersionProvider {
    client: reqwest::Client,
    config: AirbyteConfig,
}

impl AirbyteVersionProvider {
    pub fn new(client: reqwest::Client, config: AirbyteConfig) -> Self {
        Self { client, config }
    }

    fn instance_configuration_url(&self) -> String {
        format!(
            "{}/api/v1/instance_configuration",
            self.config.url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl VersionProvider for AirbyteVersionProvider {
    fn tool_name(&self) -> &str {
        "Airbyte"
    }

    async fn version(&self) -> Result<String, ToolVersionError> {
        let mut request = self.client.post(self.instance_configuration_url());
        if let Some(username) = self.config.username.as_ref().filter(|u| !u.is_empty()) {
            request = request.basic_auth(username, self.config.password.as_ref());
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ToolVersionError::Status(status.as_u16(), body));
        }

        let body: InstanceConfiguration = response.json().await?;
        Ok(body.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_ignores_trailing_slash() {
        let provider = AirbyteVersionProvider::new(
            reqwest::Client::new(),
            AirbyteConfig {
                url: "http://airbyte:8000/".to_string(),
                username: None,
                password: None,
            },
        );

        assert_eq!(
            provider.instance_configuration_url(),
            "http://airbyte:8000/api/v1/instance_configuration"
        );
    }
}
