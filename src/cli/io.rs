//! JSON output handling for CLI
//!
//! - Output: one JSON object per command on stdout
//! - Errors: one JSON object on stdout, including configuration and
//!   backend setup failures, plus a human-readable line on stderr

use std::io::Write;

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response
pub fn write_response(out: &mut dyn Write, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Write an error response
pub fn write_error(out: &mut dyn Write, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_response() {
        let mut buf = Vec::new();
        write_response(&mut buf, serde_json::json!({"exists": true})).unwrap();

        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["data"]["exists"], true);
        assert!(buf.ends_with(b"\n"));
    }

    #[test]
    fn test_write_error() {
        let mut buf = Vec::new();
        write_error(&mut buf, "STORE_CLI_NOT_FOUND", "File not found: a.txt").unwrap();

        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["code"], "STORE_CLI_NOT_FOUND");
    }
}
