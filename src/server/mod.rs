//! Stub protocol server — one pass-through tool over line-delimited JSON.
//!
//! Exposes the background agent to external clients as a single tool,
//! `task_status`: with an `id` argument it forwards to
//! [`BackgroundAgent::get`], without one to [`BackgroundAgent::list`].
//! Requests are `{"method": "tools/list"}` or
//! `{"method": "tools/call", "name": ..., "args": {...}}`, one JSON object
//! per line; transport wiring stays with the caller.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::agent::{BackgroundAgent, TaskRecord};

/// Self-describing tool metadata.
#[derive(Debug, Clone)]
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Tool server wrapping a background agent.
pub struct ToolServer {
    agent: Arc<dyn BackgroundAgent>,
}

impl ToolServer {
    pub fn new(agent: Arc<dyn BackgroundAgent>) -> Self {
        Self { agent }
    }

    /// The registered tools (exactly one).
    pub fn tools(&self) -> Vec<ToolDef> {
        vec![ToolDef {
            name: "task_status",
            description: "Look up background tasks: one by id, or all of them.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "Task id (omit to list all)" }
                }
            }),
        }]
    }

    /// Invoke a tool by name. Unknown tools and agent failures come back as
    /// error envelopes, never as Rust errors.
    pub async fn call(&self, name: &str, args: &Value) -> Value {
        if name != "task_status" {
            return err_envelope(&format!("unknown tool: {name}"));
        }
        match args.get("id").and_then(Value::as_str) {
            Some(id) => match self.agent.get(id).await {
                Ok(task) => ok_envelope(task_json(&task)),
                Err(e) => err_envelope(&e.to_string()),
            },
            None => match self.agent.list().await {
                Ok(tasks) => {
                    ok_envelope(Value::Array(tasks.iter().map(task_json).collect()))
                }
                Err(e) => err_envelope(&e.to_string()),
            },
        }
    }

    /// One request line in, one response line out.
    pub async fn handle_line(&self, line: &str) -> String {
        let request: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => return err_envelope(&format!("bad request: {e}")).to_string(),
        };
        let response = match request.get("method").and_then(Value::as_str) {
            Some("tools/list") => {
                let tools: Vec<Value> = self
                    .tools()
                    .iter()
                    .map(|t| {
                        json!({
                            "name": t.name,
                            "description": t.description,
                            "input_schema": t.input_schema,
                        })
                    })
                    .collect();
                ok_envelope(Value::Array(tools))
            }
            Some("tools/call") => {
                let name = request.get("name").and_then(Value::as_str).unwrap_or("");
                let args = request.get("args").cloned().unwrap_or_else(|| json!({}));
                self.call(name, &args).await
            }
            Some(other) => err_envelope(&format!("unknown method: {other}")),
            None => err_envelope("missing method"),
        };
        response.to_string()
    }
}

fn task_json(task: &TaskRecord) -> Value {
    json!({
        "id": task.id,
        "prompt": task.prompt,
        "status": task.status.label(),
        "created_at": task.created_at,
        "transcript": task.transcript,
    })
}

fn ok_envelope(result: Value) -> Value {
    json!({ "ok": true, "result": result })
}

fn err_envelope(error: &str) -> Value {
    json!({ "ok": false, "error": error })
}
