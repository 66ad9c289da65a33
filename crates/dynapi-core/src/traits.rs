use crate::Result;
use async_trait::async_trait;

/// Tool trait - abstraction for callable tools
///
/// Operations compiled from an API description implement this so they can be
/// handed to any function-calling agent loop as-is.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the name of the tool
    fn name(&self) -> &str;

    /// Returns a description of what the tool does
    fn description(&self) -> &str;

    /// Returns the JSON schema for the tool's parameters
    fn schema(&self) -> serde_json::Value;

    /// Indicates whether this is a long-running tool
    fn is_long_running(&self) -> bool {
        false
    }

    /// Executes the tool with given parameters
    async fn execute(&self, params: serde_json::Value) -> Result<ToolResponse>;
}

/// Tool execution response
#[derive(Debug, Clone)]
pub struct ToolResponse {
    pub result: serde_json::Value,
}
