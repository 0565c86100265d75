use crate::tools::{ToolVersionError, VersionProvider};
use async_trait::async_trait;
use tokio::process::Command;

pub struct DbtVersionProvider {
    binary: String,
}

impl DbtVersionProvider {
    pub fn new(binary: String) -> Self {
        Self { binary }
    }
}

/// Reads the installed core version out of `dbt --version`.
///
/// Handles both the `Core:\n  - installed: 1.8.7` layout and the older
/// `installed version: 1.0.0` one.
pub fn parse_dbt_version(output: &str) -> Result<String, ToolVersionError> {
    output
        .lines()
        .map(str::trim)
        .find(|line| line.trim_start_matches("- ").starts_with("installed"))
        .and_then(|line| line.split_once(':'))
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .map(str::to_string)
        .ok_or_else(|| ToolVersionError::Parse(format!("no installed version in {output:?}")))
}

/// Runs `<binary> --version` and returns its stdout.
/// The child is killed if the returned future is dropped, e.g. on timeout.
pub(crate) async fn run_version_command(
    tool: &str,
    binary: &str,
) -> Result<String, ToolVersionError> {
    let output = Command::new(binary)
        .arg("--version")
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        return Err(ToolVersionError::CommandFailed {
            tool: tool.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[async_trait]
impl VersionProvider for DbtVersionProvider {
    fn tool_name(&self) -> &str {
        "DBT"
    }

    async fn version(&self) -> Result<String, ToolVersionError> {
        let stdout = run_version_command(self.tool_name(), &self.binary).await?;
        parse_dbt_version(&stdout)
    }
}
