use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Registration not found: {0}")]
    RegistrationNotFound(Uuid),

    #[error("Ticket not found: {0}")]
    TicketNotFound(Uuid),

    #[error("Only the event organizer may perform this action")]
    NotOrganizer,

    #[error("Registration {0} is not approved")]
    RegistrationNotApproved(Uuid),

    #[error("A ticket has already been issued for registration {0}")]
    TicketAlreadyIssued(Uuid),

    #[error("Event {0} has no approved registrations")]
    NoApprovedRegistrations(Uuid),

    #[error("All approved registrations for event {0} already have tickets")]
    AllAlreadyTicketed(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TicketResult<T> = Result<T, TicketError>;

/// Convert TicketError to AppError for standardized error responses
impl From<TicketError> for AppError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::EventNotFound(id) => AppError::NotFound(format!("Event {} not found", id)),
            TicketError::RegistrationNotFound(id) => {
                AppError::NotFound(format!("Registration {} not found", id))
            }
            TicketError::TicketNotFound(id) => {
                AppError::NotFound(format!("Ticket {} not found", id))
            }
            TicketError::NotOrganizer => {
                AppError::Forbidden("Only the event organizer may perform this action".to_string())
            }
            TicketError::RegistrationNotApproved(_) => AppError::BadRequest(err.to_string()),
            TicketError::TicketAlreadyIssued(_) => AppError::Conflict(err.to_string()),
            TicketError::NoApprovedRegistrations(_) => AppError::BadRequest(err.to_string()),
            TicketError::AllAlreadyTicketed(_) => AppError::Conflict(err.to_string()),
            TicketError::Validation(msg) => AppError::BadRequest(msg),
            TicketError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for TicketError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for TicketError {
    fn from(err: sea_orm::DbErr) -> Self {
        TicketError::Database(err.to_string())
    }
}
