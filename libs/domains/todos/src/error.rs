use database::DatabaseError;
use sea_orm::{DbErr, SqlErr};
use strum::{Display, EnumString};
use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed set of failure kinds that cross the persistence/transport boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// No record matches an identifier-scoped operation
    NotFound,
    /// Constraint violation such as a duplicate key
    Conflict,
    /// Malformed or unacceptable input
    Validation,
    /// Storage unreachable or timed out
    Unavailable,
    Unknown,
}

/// Classified error returned by every repository operation.
///
/// `message` is meant for the caller; the original failure, when there is
/// one, is kept as `cause` and exposed through [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TodoError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<Cause>,
}

pub type TodoResult<T> = Result<T, TodoError>;

impl TodoError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        kind: ErrorKind,
        message: impl Into<String>,
        cause: impl Into<Cause>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn not_found(id: i64) -> Self {
        Self::new(ErrorKind::NotFound, format!("Todo {} not found", id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn invalid_id(id: i64) -> Self {
        Self::validation(format!("Invalid id: {}", id))
    }

    /// Classify a raw storage failure.
    ///
    /// `context` becomes the display message; `err` is retained as the cause.
    pub fn classify(context: impl Into<String>, err: DatabaseError) -> Self {
        let kind = classify_kind(&err);
        Self::with_cause(kind, context, err)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying failure, for logging and diagnostics
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl From<validator::ValidationErrors> for TodoError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::with_cause(
            ErrorKind::Validation,
            format!("Invalid todo: {}", fields),
            errors,
        )
    }
}

fn classify_kind(err: &DatabaseError) -> ErrorKind {
    match err {
        DatabaseError::Postgres(db_err) => classify_db_err(db_err),
        DatabaseError::ConnectionFailed(_) | DatabaseError::HealthCheckFailed(_) => {
            ErrorKind::Unavailable
        }
        DatabaseError::MigrationError(_) | DatabaseError::Generic(_) => ErrorKind::Unknown,
    }
}

fn classify_db_err(err: &DbErr) -> ErrorKind {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => ErrorKind::Unavailable,
        DbErr::RecordNotFound(_) => ErrorKind::NotFound,
        _ => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ErrorKind::Conflict,
            _ => ErrorKind::Unknown,
        },
    }
}
