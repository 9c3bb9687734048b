//! Errors raised around the calculator: storage failures and rejected
//! requests. The balance and settlement code itself never fails.
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Couldn't find the desired event")]
    EventNotFound,
    #[error("Couldn't find user `{0}` in this event")]
    ParticipantNotFound(String),
    #[error("Couldn't find the desired expense")]
    ExpenseNotFound,
    #[error("User already exists")]
    ParticipantExists,
    #[error("`{0}` is not a participant of this event")]
    UnknownParticipant(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
    #[error(transparent)]
    Serialization(#[from] bson::ser::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::EventNotFound
            | AppError::ParticipantNotFound(_)
            | AppError::ExpenseNotFound => StatusCode::NOT_FOUND,
            AppError::ParticipantExists => StatusCode::CONFLICT,
            AppError::UnknownParticipant(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Database(_) | AppError::Serialization(_) => {
                tracing::error!("storage error: {self}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let res = AppError::EventNotFound.error_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = AppError::ExpenseNotFound.error_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_participant_maps_to_409() {
        let res = AppError::ParticipantExists.error_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_400() {
        let res = AppError::Validation("Name is required".to_string()).error_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = AppError::UnknownParticipant("Z".to_string()).error_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
