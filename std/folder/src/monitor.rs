//! Optional observation of tool calls.
//!
//! A [`ToolMonitor`] sees every `tools/call` twice: before dispatch with the
//! tool name and arguments, and after completion with the outcome. It is a
//! side channel only; [`observe`] hands the request and the outcome through
//! untouched.

use rmcp::{
    ErrorData,
    model::{CallToolRequestParams, CallToolResult, JsonObject},
};
use std::future::Future;

/// Before/after callbacks around tool dispatch.
pub trait ToolMonitor: Send + Sync {
    /// Called before the tool runs.
    fn before_call(&self, name: &str, arguments: Option<&JsonObject>);

    /// Called after the tool finished, with its result or protocol error.
    fn after_call(&self, name: &str, outcome: &Result<CallToolResult, ErrorData>);
}

/// Run `dispatch` for `request`, reporting to `monitor` around it if present.
pub async fn observe<F, Fut>(
    monitor: Option<&dyn ToolMonitor>,
    request: CallToolRequestParams,
    dispatch: F,
) -> Result<CallToolResult, ErrorData>
where
    F: FnOnce(CallToolRequestParams) -> Fut,
    Fut: Future<Output = Result<CallToolResult, ErrorData>>,
{
    let Some(monitor) = monitor else {
        return dispatch(request).await;
    };

    let name = request.name.clone();
    monitor.before_call(&name, request.arguments.as_ref());
    let outcome = dispatch(request).await;
    monitor.after_call(&name, &outcome);
    outcome
}

/// Monitor that logs each call through `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMonitor;

impl ToolMonitor for TracingMonitor {
    fn before_call(&self, name: &str, arguments: Option<&JsonObject>) {
        let args = arguments
            .and_then(|a| serde_json::to_string(a).ok())
            .unwrap_or_else(|| "{}".into());
        tracing::info!("[monitor] tool/call: {name} args={args}");
    }

    fn after_call(&self, name: &str, outcome: &Result<CallToolResult, ErrorData>) {
        match outcome {
            Ok(result) => tracing::info!(
                "[monitor] tool/call result: {name} isError={}",
                result.is_error.unwrap_or(false)
            ),
            Err(e) => tracing::info!("[monitor] tool/call failed: {name} error={}", e.message),
        }
    }
}
