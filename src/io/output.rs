use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use super::DocumentFormat;
use crate::domain::ExternalValue;

/// Where the final field value goes and how it is rendered.
///
/// A removed value (`None`) is written as `null`, or as an empty document in
/// TOML.
#[derive(Debug, Clone)]
pub struct ValueSink {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub stdout: bool,
    pub files: Vec<PathBuf>,
}

impl ValueSink {
    /// Pretty output on stdout only.
    pub fn stdout(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            stdout: true,
            files: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.stdout && self.files.is_empty()
    }

    /// Render `value` once and write it to every target.
    pub fn write(&self, value: &ExternalValue) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let mut payload = render_value(value, self.format, self.pretty)?;
        if !payload.ends_with('\n') {
            payload.push('\n');
        }
        if self.stdout {
            io::stdout()
                .lock()
                .write_all(payload.as_bytes())
                .context("failed to write field value to stdout")?;
        }
        for path in &self.files {
            fs::write(path, &payload)
                .with_context(|| format!("failed to write field value to {}", path.display()))?;
        }
        Ok(())
    }
}

/// Render a stored field value in `format`.
///
/// TOML has no top-level arrays, so lists are written under an `items` key,
/// the same shape [`parse_items`](super::parse_items) reads back.
pub fn render_value(value: &ExternalValue, format: DocumentFormat, pretty: bool) -> Result<String> {
    let value = value.as_ref().unwrap_or(&Value::Null);
    let rendered = match format {
        DocumentFormat::Json if pretty => serde_json::to_string_pretty(value)?,
        DocumentFormat::Json => serde_json::to_string(value)?,
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value)?,
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            let document = match value {
                Value::Null => serde_json::json!({}),
                Value::Object(_) => value.clone(),
                other => serde_json::json!({ "items": other }),
            };
            if pretty {
                toml::to_string_pretty(&document)?
            } else {
                toml::to_string(&document)?
            }
        }
    };
    Ok(rendered)
}
