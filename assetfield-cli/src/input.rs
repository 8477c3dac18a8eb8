use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use assetfield::{
    DocumentFormat, ExternalValue, ItemList, io::parse_external_value, parse_document_str,
    parse_items,
};
use color_eyre::eyre::{Report, Result, WrapErr};
use serde_json::Value;

/// A document given on the command line: `-` for stdin, a file path, or the
/// document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSpec(pub String);

impl From<String> for DocumentSpec {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl DocumentSpec {
    pub fn is_stdin(&self) -> bool {
        self.0 == "-"
    }

    /// Format implied by the file extension, if there is one.
    pub fn extension_format(&self) -> Option<DocumentFormat> {
        if self.is_stdin() {
            return None;
        }
        DocumentFormat::from_extension(Path::new(&self.0))
    }

    fn format_hint(&self) -> DocumentFormat {
        self.extension_format().unwrap_or_default()
    }

    fn read(&self, label: &str) -> Result<String> {
        if self.is_stdin() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            return Ok(buffer);
        }
        let path = PathBuf::from(&self.0);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents),
            Err(_) if !path.exists() => Ok(self.0.clone()),
            Err(err) => Err(err)
                .wrap_err_with(|| format!("failed to load {label} from {}", path.display())),
        }
    }
}

pub fn load_value(spec: &DocumentSpec, label: &str) -> Result<ExternalValue> {
    let contents = spec.read(label)?;
    with_fallback(&contents, spec.format_hint(), label, parse_external_value)
}

pub fn load_document(spec: &DocumentSpec, label: &str) -> Result<Value> {
    let contents = spec.read(label)?;
    with_fallback(&contents, spec.format_hint(), label, parse_document_str)
}

pub fn load_items(spec: &DocumentSpec, label: &str) -> Result<ItemList> {
    let contents = spec.read(label)?;
    with_fallback(&contents, spec.format_hint(), label, parse_items)
}

fn with_fallback<T, E, F>(
    contents: &str,
    format: DocumentFormat,
    label: &str,
    parse: F,
) -> Result<T>
where
    E: std::fmt::Display,
    F: Fn(&str, DocumentFormat) -> std::result::Result<T, E>,
{
    match parse(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => {
            for candidate in DocumentFormat::available_formats() {
                if candidate == format {
                    continue;
                }
                if let Ok(value) = parse(contents, candidate) {
                    return Ok(value);
                }
            }
            Err(Report::msg(format!(
                "failed to parse {label}: tried {} (first error: {primary})",
                format_list()
            )))
        }
    }
}

fn format_list() -> String {
    let items: Vec<String> = DocumentFormat::available_formats()
        .into_iter()
        .map(|fmt| fmt.to_string())
        .collect();
    items.join(", ")
}
