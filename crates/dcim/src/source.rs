//! Row dumps: a JSON array of objects or newline-delimited JSON objects,
//! read from a file or stdin.

use std::io::{self, Read};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use dcim_core::CoreError;

use crate::error::CliError;

/// A lazily decoded row stream. Decoding stops at the first bad row.
pub type RowStream<'a, T> = Box<dyn Iterator<Item = Result<T, serde_json::Error>> + 'a>;

/// Read the whole dump. `None` and `-` mean stdin.
pub fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        None => read_stdin(),
        Some(p) if p.as_os_str() == "-" => read_stdin(),
        Some(p) => {
            tracing::debug!(path = %p.display(), "reading row dump");
            std::fs::read_to_string(p).map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => CliError::InputNotFound {
                    path: p.display().to_string(),
                },
                _ => CliError::Io(err),
            })
        }
    }
}

fn read_stdin() -> Result<String, CliError> {
    let mut text = String::new();
    io::stdin().lock().read_to_string(&mut text)?;
    Ok(text)
}

/// Decode `text` into rows of `T`.
///
/// A leading `[` selects array mode; anything else is read as a stream of
/// concatenated or newline-delimited objects. Blank input has no rows.
pub fn parse_rows<T: DeserializeOwned + 'static>(text: &str) -> Result<RowStream<'_, T>, CliError> {
    if text.trim_start().starts_with('[') {
        let items: Vec<Value> = serde_json::from_str(text)?;
        Ok(Box::new(items.into_iter().map(serde_json::from_value)))
    } else {
        Ok(Box::new(
            serde_json::Deserializer::from_str(text).into_iter::<T>(),
        ))
    }
}

/// Decode every row, failing on the first one that cannot be read.
pub fn collect_rows<T: DeserializeOwned + 'static>(text: &str) -> Result<Vec<T>, CliError> {
    let rows = parse_rows::<T>(text)?
        .enumerate()
        .map(|(row, item)| {
            item.map_err(|e| CoreError::RowRead {
                row,
                source: e.into(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(rows = rows.len(), "rows decoded");
    Ok(rows)
}

/// Read and decode every row of the dump at `path`.
pub fn load_rows<T: DeserializeOwned + 'static>(path: Option<&Path>) -> Result<Vec<T>, CliError> {
    collect_rows(&read_input(path)?)
}
