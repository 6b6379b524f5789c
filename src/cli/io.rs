//! JSON I/O handling for CLI
//!
//! - Input: one JSON document (file or stdin)
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON document from a reader
pub fn read_request<T: DeserializeOwned>(reader: &mut dyn Read) -> CliResult<T> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::input("Empty input"));
    }

    Ok(serde_json::from_str(&input)?)
}

/// Read a JSON document from a file
pub fn read_file<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::input(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Write one JSON value as a line
pub fn write_line(out: &mut dyn Write, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Write an error object as a line
pub fn write_error(out: &mut dyn Write, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_line(out, &response)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_request_multiline() {
        let mut input = "{\n  \"a\": 1\n}\n".as_bytes();
        let value: Value = read_request(&mut input).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_read_request_empty() {
        let mut input = "  \n".as_bytes();
        let err = read_request::<Value>(&mut input).unwrap_err();
        assert_eq!(err.code(), "AERO_SQL_CLI_INPUT");
    }

    #[test]
    fn test_write_line() {
        let mut out = Vec::new();
        write_line(&mut out, &json!({"n": 1})).unwrap();
        write_error(&mut out, "AERO_SQL_CLI_IO", "boom").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], r#"{"n":1}"#);
        assert!(lines[1].contains("\"status\":\"error\""));
    }
}
