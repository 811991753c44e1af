//! MCP server exposing the text files of a single folder, read-only.
//!
//! At startup the folder is scanned once ([`scan::scan_folder`]), the result
//! is written to `manifest.json` inside the folder, and the same records are
//! served for the life of the process:
//! - as resources, one `file:///` URI per file,
//! - through the `list_files` and `read_file` tools.
//!
//! File contents are read from disk on every request; the file set itself
//! never changes after startup.

use rmcp::{
    ErrorData, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext},
    model::{
        AnnotateAble, CallToolRequestParams, CallToolResult, Implementation, ListResourcesResult,
        ListToolsResult, PaginatedRequestParams, RawResource, ReadResourceRequestParams,
        ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub mod catalog;
pub mod error;
pub mod manifest;
pub mod monitor;
pub mod scan;
pub mod sniff;
pub mod tools;

pub use catalog::Catalog;
pub use error::Error;
pub use monitor::{ToolMonitor, TracingMonitor};
pub use scan::FileRecord;

/// Scan `folder`, write its manifest, and build the catalog to serve.
pub fn load_folder(folder: &Path) -> Result<Catalog, Error> {
    let root = scan::resolve_folder(folder)?;
    let files = scan::scan_folder(&root)?;
    let manifest = manifest::write_manifest(&root, &files)?;
    tracing::info!(
        "manifest written to {} with {} file(s)",
        manifest.display(),
        files.len()
    );
    Ok(Catalog::new(root, files))
}

/// Read-only MCP server over a fixed file catalog.
#[derive(Clone)]
pub struct FolderServer {
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) monitor: Option<Arc<dyn ToolMonitor>>,
    pub(crate) tool_router: ToolRouter<Self>,
}

impl fmt::Debug for FolderServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolderServer")
            .field("root", &self.catalog.root())
            .field("files", &self.catalog.len())
            .field("monitor", &self.monitor.is_some())
            .finish()
    }
}

impl FolderServer {
    /// The catalog this server exposes.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// One resource per cataloged file, in catalog order.
    pub fn resources(&self) -> Vec<Resource> {
        self.catalog
            .records()
            .iter()
            .map(|record| {
                let mut raw =
                    RawResource::new(self.catalog.resource_uri(record), record.name.clone());
                raw.description = Some(format!(
                    "File: {} ({}, {} bytes)",
                    record.name, record.mime_type, record.size
                ));
                raw.mime_type = Some(record.mime_type.clone());
                raw.no_annotation()
            })
            .collect()
    }

    /// Read the current contents of the resource at `uri`.
    pub async fn read_resource_uri(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        let not_found = || ErrorData::resource_not_found(format!("resource not found: {uri}"), None);
        let record = self.catalog.by_uri(uri).ok_or_else(not_found)?;
        let path = self.catalog.resolve(&record.name).ok_or_else(not_found)?;

        let data = tokio::fs::read(&path).await.map_err(|e| {
            ErrorData::internal_error(format!("failed to read {}: {e}", path.display()), None)
        })?;

        let mut contents = ResourceContents::text(String::from_utf8_lossy(&data), uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(record.mime_type.clone());
        }
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}

impl ServerHandler for FolderServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "wmcp-folder".into(),
                title: Some("Walrus MCP Folder Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(format!(
                "Read-only access to the {} text file(s) in {}. \
                 Use list_files to see them and read_file to read one by name.",
                self.catalog.len(),
                self.catalog.root().display()
            )),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(self.resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read_resource_uri(&request.uri).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tool_router.list_all()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        monitor::observe(self.monitor.as_deref(), request, |request| {
            self.tool_router
                .call(ToolCallContext::new(self, request, context))
        })
        .await
    }
}
