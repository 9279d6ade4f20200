use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::diff::diff_json;

/// How status bodies are written to the wire log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLogMode {
    /// Every status body verbatim.
    Full,
    /// First status body verbatim, afterwards only the changed paths.
    Diffed,
}

/// Append-only NDJSON record of device traffic.
pub(crate) struct MessageLogger {
    mode: MessageLogMode,
    file: File,
    previous_status: Option<Value>,
}

impl MessageLogger {
    pub fn new(mode: MessageLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            mode,
            file,
            previous_status: None,
        })
    }

    pub fn log_request(&mut self, method: &str, path: &str) {
        self.write_line(&json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "method": method,
            "path": path,
        }));
    }

    pub fn log_command(&mut self, path: &str, form: &[(&str, String)]) {
        let form: Map<String, Value> = form
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        self.write_line(&json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "cmd",
            "path": path,
            "form": form,
        }));
    }

    pub fn log_status(&mut self, http_status: u16, body: &Value) {
        let mut entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "poll",
            "status": http_status,
        });

        match (self.mode, self.previous_status.as_ref()) {
            (MessageLogMode::Diffed, Some(prev)) => {
                let mut changes = Vec::new();
                diff_json(prev, body, "", &mut changes);
                let changes: Vec<Value> = changes
                    .into_iter()
                    .map(|(path, old, new)| json!({ "path": path, "old": old, "new": new }))
                    .collect();
                entry["changes"] = Value::Array(changes);
            }
            (MessageLogMode::Diffed, None) => {
                entry["full"] = Value::Bool(true);
                entry["body"] = body.clone();
            }
            (MessageLogMode::Full, _) => {
                entry["body"] = body.clone();
            }
        }

        self.write_line(&entry);
        if self.mode == MessageLogMode::Diffed {
            self.previous_status = Some(body.clone());
        }
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write message log entry: {e}");
        }
    }
}
