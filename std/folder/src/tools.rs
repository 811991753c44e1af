//! Tool implementations for the folder MCP server.

use crate::FolderServer;
use crate::catalog::Catalog;
use crate::monitor::ToolMonitor;
use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{JsonSchema, Schema, SchemaGenerator, json_schema},
    tool, tool_router,
};
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// Parameters for reading a single file.
///
/// `name` is required by the schema but optional on the wire so that a
/// missing or non-string value becomes a tool error instead of a protocol
/// error.
#[derive(Debug, Default, Deserialize)]
pub struct ReadFileParams {
    /// Name of the file to read.
    #[serde(default)]
    pub name: Option<serde_json::Value>,
}

impl JsonSchema for ReadFileParams {
    fn schema_name() -> Cow<'static, str> {
        "ReadFileParams".into()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name of the file to read"
                }
            },
            "required": ["name"]
        })
    }
}

#[tool_router]
impl FolderServer {
    /// Create a server over a scanned catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            monitor: None,
            tool_router: Self::tool_router(),
        }
    }

    /// Observe every tool call with `monitor`.
    pub fn with_monitor(mut self, monitor: Arc<dyn ToolMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// List the metadata of every exposed file.
    #[tool(description = "List all available files in the exposed folder")]
    async fn list_files(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self.catalog.records())
            .map_err(|e| format!("failed to serialize file list: {e}"))
    }

    /// Read the current contents of an exposed file.
    #[tool(description = "Read the contents of a file by name")]
    async fn read_file(
        &self,
        Parameters(params): Parameters<ReadFileParams>,
    ) -> Result<String, String> {
        let name = params
            .name
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .ok_or("missing required parameter: name")?;
        let path = self
            .catalog
            .resolve(name)
            .ok_or_else(|| format!("file not found: {name}"))?;
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| format!("failed to read file: {e}"))?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }
}
