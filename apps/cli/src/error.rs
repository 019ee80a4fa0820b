//! # Application Error Type
//!
//! Every command returns `Result<_, AppError>`; `main` prints the message on
//! stderr and exits with the code's status.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in cotizador                              │
//! │                                                                         │
//! │  ValidationError (core) ─────────────┐                                  │
//! │  PersistenceError / DbError (db) ────┤                                  │
//! │  RenderError (render) ───────────────┼──► AppError { code, message }    │
//! │  GenerationError (generator) ────────┤          │                       │
//! │  ConfigError (state::config) ────────┘          ▼                       │
//! │                                       stderr + exit status              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;

use cotizador_core::ValidationError;
use cotizador_db::{DbError, PersistenceError};
use cotizador_render::RenderError;

use crate::generator::GenerationError;
use crate::state::ConfigError;

/// Error reported by a command.
///
/// ```json
/// { "code": "RENDER_ERROR", "message": "COT-3 was issued but not rendered: ..." }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad form input; nothing was issued.
    ValidationError,

    /// Counter store failure; nothing was issued.
    PersistenceError,

    /// Rendering failed, possibly after a number was issued.
    RenderError,

    /// Unreadable or invalid configuration.
    ConfigError,

    Internal,
}

impl ErrorCode {
    /// Process exit status for this code.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::PersistenceError => 3,
            ErrorCode::RenderError => 4,
            ErrorCode::ConfigError => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::PersistenceError => "PERSISTENCE_ERROR",
            ErrorCode::RenderError => "RENDER_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.code.exit_code()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<PersistenceError> for AppError {
    fn from(err: PersistenceError) -> Self {
        tracing::error!(error = ?err, "Counter persistence failed");
        AppError::new(ErrorCode::PersistenceError, err.to_string())
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => AppError::new(
                ErrorCode::PersistenceError,
                format!("Could not open the counter database: {}", e),
            ),
            DbError::MigrationFailed(e) => AppError::new(
                ErrorCode::PersistenceError,
                format!("Counter database migration failed: {}", e),
            ),
            other => AppError::new(ErrorCode::PersistenceError, other.to_string()),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::UnknownFormat(_) => AppError::config(err.to_string()),
            other => AppError::new(ErrorCode::RenderError, other.to_string()),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::config(err.to_string())
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Validation(e) => e.into(),
            GenerationError::Persistence(e) => e.into(),
            GenerationError::Render { number, source } => AppError::new(
                ErrorCode::RenderError,
                format!("{} was issued but not rendered: {}", number, source),
            ),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("Could not serialize output: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal(format!("Could not write output: {}", err))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;
    use cotizador_core::QuotationNumber;
    use std::path::PathBuf;

    #[test]
    fn test_codes_and_exit_status() {
        let err: AppError = ValidationError::MissingClientName.into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "[VALIDATION_ERROR] Client name is required");

        let err: AppError = PersistenceError::Exhausted { current: 9 }.into();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_render_failure_names_issued_number() {
        let err: AppError = GenerationError::Render {
            number: QuotationNumber::new(3),
            source: RenderError::MissingAsset {
                path: PathBuf::from("assets/LOGO.jpg"),
            },
        }
        .into();

        assert_eq!(err.code, ErrorCode::RenderError);
        assert!(err.message.starts_with("COT-3 was issued but not rendered"));
    }

    #[test]
    fn test_serializes_screaming_snake_code() {
        let json = serde_json::to_value(AppError::config("bad")).unwrap();
        assert_eq!(json["code"], "CONFIG_ERROR");
        assert_eq!(json["message"], "bad");
    }
}
