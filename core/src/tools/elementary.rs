use crate::tools::dbt::run_version_command;
use crate::tools::{ToolVersionError, VersionProvider};
use async_trait::async_trait;

pub struct ElementaryVersionProvider {
    binary: String,
}

impl ElementaryVersionProvider {
    pub fn new(binary: String) -> Self {
        Self { binary }
    }
}

/// `edr --version` prints a line like `Elementary version 0.15.1`.
pub fn parse_elementary_version(output: &str) -> Result<String, ToolVersionError> {
    output
        .lines()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| line.split_whitespace().last())
        .map(str::to_string)
        .ok_or_else(|| ToolVersionError::Parse("empty edr output".to_string()))
}

#[async_trait]
impl VersionProvider for ElementaryVersionProvider {
    fn tool_name(&self) -> &str {
        "Elementary"
    }

    async fn version(&self) -> Result<String, ToolVersionError> {
        let stdout = run_version_command(self.tool_name(), &self.binary).await?;
        parse_elementary_version(&stdout)
    }
}
