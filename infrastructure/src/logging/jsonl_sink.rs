//! JSONL file writer for transparency events.
//!
//! Each [`TransparencyEvent`] is serialized as a single JSON line with
//! `type`, `session_id` and `timestamp` fields, appended through a buffered
//! writer.

use advisor_application::{TransparencyEvent, TransparencySink};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Transparency sink that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event and on `Drop`.
pub struct JsonlTransparencySink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTransparencySink {
    /// Open `path` for appending.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transparency log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open transparency log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransparencySink for JsonlTransparencySink {
    fn publish(&self, event: TransparencyEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let header = [
            ("type", Value::String(event.event_type.to_string())),
            ("session_id", Value::String(event.session_id.to_string())),
            ("timestamp", Value::String(timestamp)),
        ];

        let record = match event.payload {
            Value::Object(mut map) => {
                for (key, value) in header {
                    map.insert(key.to_string(), value);
                }
                Value::Object(map)
            }
            other => {
                let mut map: serde_json::Map<String, Value> = header
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect();
                map.insert("data".to_string(), other);
                Value::Object(map)
            }
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlTransparencySink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
