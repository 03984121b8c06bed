use thiserror::Error;

/// Typed errors surfaced by the adjudication service.
///
/// The REST layer maps these to HTTP status codes; `Internal` details are
/// logged server-side and never shown to clients.
#[derive(Debug, Error)]
pub enum AdjudicationError {
    #[error("{resource} {id} no encontrado")]
    NotFound { resource: &'static str, id: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("{reason}")]
    Conflict { reason: String },

    #[error("No se puede eliminar {resource}: tiene registros asociados ({dependents})")]
    DependentRecords {
        resource: &'static str,
        dependents: String,
    },

    #[error("Fila {row}: {message}")]
    ImportRejected { row: usize, message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AdjudicationError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    pub fn dependent_records(resource: &'static str, dependents: impl Into<String>) -> Self {
        Self::DependentRecords {
            resource,
            dependents: dependents.into(),
        }
    }

    pub fn import_rejected(row: usize, message: impl Into<String>) -> Self {
        Self::ImportRejected {
            row,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for AdjudicationError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}
