use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidToml,
    ConfigInvalidValue,

    ValidationInvalidArgument,

    TargetDirectoryNotFound,
    TargetNoFiles,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidToml => "config.invalid_toml",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::TargetDirectoryNotFound => "target.directory_not_found",
            ErrorCode::TargetNoFiles => "target.no_files",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidTomlDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDetails {
    pub directory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn config_invalid_toml(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        let details = to_details(ConfigInvalidTomlDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidToml,
            "Invalid TOML in rules file",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.clone(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid substitution table: {}", problem),
            details,
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
        });

        Self::new(ErrorCode::ValidationInvalidArgument, problem, details)
    }

    pub fn target_directory_not_found(directory: impl Into<String>) -> Self {
        let directory = directory.into();
        let message = format!("JS build directory not found: {}", directory);
        let details = to_details(TargetDetails {
            directory,
            pattern: None,
        });

        Self::new(ErrorCode::TargetDirectoryNotFound, message, details)
            .with_hint("Run from the console repo root, or pass it as an argument.")
    }

    pub fn target_no_files(directory: impl Into<String>, pattern: impl Into<String>) -> Self {
        let directory = directory.into();
        let message = format!("No .js files found in {}", directory);
        let details = to_details(TargetDetails {
            directory,
            pattern: Some(pattern.into()),
        });

        Self::new(ErrorCode::TargetNoFiles, message, details)
            .with_hint("Build the web app first so that bundles exist under web-app/build.")
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let message = match &context {
            Some(ctx) => format!("I/O error ({}): {}", ctx, error),
            None => format!("I/O error: {}", error),
        };
        let details = to_details(InternalErrorDetails { error, context });

        Self::new(ErrorCode::InternalIoError, message, details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }
}
