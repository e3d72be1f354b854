//! CLI response formatting and output.
//!
//! Provides the JSON envelope, printing, and exit code mapping.

use rebrand::error::Hint;
use rebrand::{Error, ErrorCode, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

pub fn print_result<T: Serialize>(result: &Result<T>) -> Result<()> {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_response(&CliResponse::<()>::from_error(err)),
    }
}

/// Print an error and its hints to stderr, for text mode.
pub fn print_error(err: &Error) {
    eprintln!("ERROR: {}", err.message);
    for hint in &err.hints {
        eprintln!("{}", hint.message);
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidToml
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::TargetDirectoryNotFound
        | ErrorCode::TargetNoFiles
        | ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_includes_code_and_hints() {
        let err = Error::target_directory_not_found("/srv/console/web-app/build/static/js");
        let json = CliResponse::<()>::from_error(&err).to_json().unwrap();

        assert!(json.contains("\"success\": false"));
        assert!(json.contains("\"code\": \"target.directory_not_found\""));
        assert!(json.contains("Run from the console repo root"));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn success_envelope_omits_error() {
        let json = CliResponse::success(serde_json::json!({ "total": 3 }))
            .to_json()
            .unwrap();
        assert!(json.contains("\"success\": true"));
        assert!(json.contains("\"total\": 3"));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn discovery_failures_exit_with_one() {
        assert_eq!(exit_code_for_error(ErrorCode::TargetDirectoryNotFound), 1);
        assert_eq!(exit_code_for_error(ErrorCode::TargetNoFiles), 1);
        assert_eq!(exit_code_for_error(ErrorCode::ConfigInvalidToml), 2);
    }
}
