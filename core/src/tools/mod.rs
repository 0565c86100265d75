pub mod airbyte;
pub mod dbt;
pub mod elementary;
pub mod prefect;

use crate::tools::airbyte::AirbyteVersionProvider;
use crate::tools::dbt::DbtVersionProvider;
use crate::tools::elementary::ElementaryVersionProvider;
use crate::tools::prefect::PrefectVersionProvider;
use async_trait::async_trait;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const NOT_AVAILABLE: &str = "Not available";
pub const SUPERSET_TOOL_NAME: &str = "Superset";

#[derive(Error, Debug)]
pub enum ToolVersionError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {0}: {1}")]
    Status(u16, String),

    #[error("Failed to run command: {0}")]
    Command(#[from] std::io::Error),

    #[error("{tool} exited with an error: {stderr}")]
    CommandFailed { tool: String, stderr: String },

    #[error("Failed to parse version: {0}")]
    Parse(String),

    #[error("Timed out waiting for version")]
    Timeout,
}

/// A source of one external tool's version string.
#[async_trait]
pub trait VersionProvider: Send + Sync {
    fn tool_name(&self) -> &str;

    async fn version(&self) -> Result<String, ToolVersionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersionEntry {
    pub tool: String,
    pub version: String,
}

impl ToolVersionEntry {
    pub fn new(tool: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            version: version.into(),
        }
    }
}

#[derive(Serialize)]
struct VersionBody<'a> {
    version: &'a str,
}

// Serialized as `{"<tool>": {"version": "<version>"}}`
impl Serialize for ToolVersionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.tool,
            &VersionBody {
                version: &self.version,
            },
        )?;
        map.end()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirbyteConfig {
    #[serde(default = "default_airbyte_url")]
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefectConfig {
    #[serde(default = "default_prefect_url")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryConfig {
    pub binary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_airbyte")]
    pub airbyte: AirbyteConfig,
    #[serde(default = "default_prefect")]
    pub prefect: PrefectConfig,
    #[serde(default = "default_dbt")]
    pub dbt: BinaryConfig,
    #[serde(default = "default_elementary")]
    pub elementary: BinaryConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            airbyte: default_airbyte(),
            prefect: default_prefect(),
            dbt: default_dbt(),
            elementary: default_elementary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_airbyte_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_prefect_url() -> String {
    "http://localhost:4200".to_string()
}

fn default_airbyte() -> AirbyteConfig {
    AirbyteConfig {
        url: default_airbyte_url(),
        username: None,
        password: None,
    }
}

fn default_prefect() -> PrefectConfig {
    PrefectConfig {
        url: default_prefect_url(),
    }
}

fn default_dbt() -> BinaryConfig {
    BinaryConfig {
        binary: "dbt".to_string(),
    }
}

fn default_elementary() -> BinaryConfig {
    BinaryConfig {
        binary: "edr".to_string(),
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Collects the versions of the platform's external tools.
#[derive(Clone)]
pub struct ToolVersionCollector {
    airbyte: Arc<dyn VersionProvider>,
    prefect: Arc<dyn VersionProvider>,
    dbt: Arc<dyn VersionProvider>,
    elementary: Arc<dyn VersionProvider>,
    timeout: Duration,
}

impl ToolVersionCollector {
    pub fn new(
        airbyte: Arc<dyn VersionProvider>,
        prefect: Arc<dyn VersionProvider>,
        dbt: Arc<dyn VersionProvider>,
        elementary: Arc<dyn VersionProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            airbyte,
            prefect,
            dbt,
            elementary,
            timeout,
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Result<Self, ToolVersionError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self::new(
            Arc::new(AirbyteVersionProvider::new(
                client.clone(),
                config.airbyte.clone(),
            )),
            Arc::new(PrefectVersionProvider::new(client, config.prefect.clone())),
            Arc::new(DbtVersionProvider::new(config.dbt.binary.clone())),
            Arc::new(ElementaryVersionProvider::new(
                config.elementary.binary.clone(),
            )),
            timeout,
        ))
    }

    async fn query(
        &self,
        provider: &dyn VersionProvider,
    ) -> Result<ToolVersionEntry, ToolVersionError> {
        let version = tokio::time::timeout(self.timeout, provider.version())
            .await
            .map_err(|_| ToolVersionError::Timeout)?
            .map_err(|e| {
                tracing::error!("Failed to get {} version: {}", provider.tool_name(), e);
                e
            })?;

        Ok(ToolVersionEntry::new(provider.tool_name(), version))
    }

    /// Queries the four providers concurrently. The first failure fails the whole call.
    /// Entries come back in a fixed order, with Superset last.
    pub async fn collect(
        &self,
        superset_version: Option<String>,
    ) -> Result<Vec<ToolVersionEntry>, ToolVersionError> {
        let (airbyte, prefect, dbt, elementary) = futures::try_join!(
            self.query(self.airbyte.as_ref()),
            self.query(self.prefect.as_ref()),
            self.query(self.dbt.as_ref()),
            self.query(self.elementary.as_ref()),
        )?;

        Ok(vec![
            airbyte,
            prefect,
            dbt,
            elementary,
            ToolVersionEntry::new(
                SUPERSET_TOOL_NAME,
                superset_version.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
        ])
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    pub struct StubProvider {
        pub name: &'static str,
        pub version: Option<&'static str>,
    }

    #[async_trait]
    impl VersionProvider for StubProvider {
        fn tool_name(&self) -> &str {
            self.name
        }

        async fn version(&self) -> Result<String, ToolVersionError> {
            self.version
                .map(str::to_string)
                .ok_or_else(|| ToolVersionError::Status(500, "stub failure".to_string()))
        }
    }

    pub struct SlowProvider;

    #[async_trait]
    impl VersionProvider for SlowProvider {
        fn tool_name(&self) -> &str {
            "Slow"
        }

        async fn version(&self) -> Result<String, ToolVersionError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("never".to_string())
        }
    }

    pub fn stub_collector(failing: Option<&'static str>) -> ToolVersionCollector {
        let stub = |name: &'static str, version: &'static str| -> Arc<dyn VersionProvider> {
            Arc::new(StubProvider {
                name,
                version: (failing != Some(name)).then_some(version),
            })
        };

        ToolVersionCollector::new(
            stub("Airbyte", "0.58.0"),
            stub("Prefect", "2.20.3"),
            stub("DBT", "1.8.7"),
            stub("Elementary", "0.15.1"),
            Duration::from_secs(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_collect_keeps_fixed_order() {
        let versions = stub_collector(None)
            .collect(Some("4.0.2".to_string()))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&versions).unwrap(),
            json!([
                {"Airbyte": {"version": "0.58.0"}},
                {"Prefect": {"version": "2.20.3"}},
                {"DBT": {"version": "1.8.7"}},
                {"Elementary": {"version": "0.15.1"}},
                {"Superset": {"version": "4.0.2"}},
            ])
        );
    }

    #[tokio::test]
    async fn test_missing_superset_is_not_available() {
        let versions = stub_collector(None).collect(None).await.unwrap();
        assert_eq!(versions[4], ToolVersionEntry::new("Superset", NOT_AVAILABLE));
    }

    #[tokio::test]
    async fn test_one_failure_fails_collection() {
        let result = stub_collector(Some("DBT")).collect(None).await;
        assert!(matches!(result, Err(ToolVersionError::Status(500, _))));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let ok: Arc<dyn VersionProvider> = Arc::new(StubProvider {
            name: "Airbyte",
            version: Some("1"),
        });
        let collector = ToolVersionCollector::new(
            ok.clone(),
            ok.clone(),
            ok,
            Arc::new(SlowProvider),
            Duration::from_millis(50),
        );

        let result = collector.collect(None).await;
        assert!(matches!(result, Err(ToolVersionError::Timeout)));
    }

    #[test]
    fn test_tools_config_defaults() {
        let config: ToolsConfig = serde_json::from_value(json!({
            "airbyte": {"url": "http://airbyte:8000"}
        }))
        .unwrap();
        assert_eq!(config.airbyte.url, "http://airbyte:8000");
        assert!(config.airbyte.username.is_none());
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.dbt.binary, "dbt");
        assert_eq!(config.elementary.binary, "edr");
    }
}
