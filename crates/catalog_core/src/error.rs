use std::fmt;

use shared::{
    domain::ImageId,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Price,
    Images,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Images => "images",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub reason: String,
}

/// Every failed field of one validation pass, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: Field, reason: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn reason_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.reason.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.reason)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StagedError {
    #[error("no staged image with id {0}")]
    NotFound(ImageId),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("submission failed: {0}")]
    SubmissionFailure(String),
    #[error("product deletion failed: {0}")]
    DeletionFailure(String),
    #[error("cannot {operation} while session is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    #[error(
        "unsupported image format for {filename}: {}",
        .mime_type.as_deref().unwrap_or("unknown")
    )]
    UnsupportedFormat {
        filename: String,
        mime_type: Option<String>,
    },
    #[error("session has no stored product to {0}")]
    NoTarget(&'static str),
    #[error("failed to load product for editing: {0}")]
    Seed(String),
}

impl SessionError {
    pub fn to_api_error(&self) -> ApiError {
        match self {
            SessionError::Validation(errors) => {
                ApiError::new(ErrorCode::Validation, "product form is incomplete")
                    .with_details(errors.iter().map(|e| format!("{}: {}", e.field, e.reason)))
            }
            SessionError::SubmissionFailure(_)
            | SessionError::DeletionFailure(_)
            | SessionError::Seed(_) => ApiError::new(ErrorCode::Unavailable, self.to_string()),
            SessionError::InvalidState { .. } | SessionError::NoTarget(_) => {
                ApiError::new(ErrorCode::Conflict, self.to_string())
            }
            SessionError::UnsupportedFormat { .. } => {
                ApiError::new(ErrorCode::UnsupportedMedia, self.to_string())
            }
        }
    }
}
