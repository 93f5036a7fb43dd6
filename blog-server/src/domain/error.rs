use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

/// The operation that was looking for a post when it turned out to be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Lookup,
    Update,
    Delete,
    Like,
}

impl PostAction {
    fn not_found_message(self) -> &'static str {
        match self {
            PostAction::Lookup => "the post you are looking for wasn't found",
            PostAction::Update => "the post you are trying to update wasn't found",
            PostAction::Delete => "the post you are trying to delete wasn't found",
            PostAction::Like => "The post you are looking for wasn't found",
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{}", .0.not_found_message())]
    PostNotFound(PostAction),
    #[error("make sure you send a valid query parameter")]
    MissingFilter,
    #[error("Cast to ObjectId failed for value \"{0}\" at path \"_id\"")]
    InvalidId(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Store(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::MissingFilter => StatusCode::BAD_REQUEST,
            // Not-found, cast, validation and store failures all share one status.
            DomainError::PostNotFound(_)
            | DomainError::InvalidId(_)
            | DomainError::Validation(_)
            | DomainError::Store(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: message.as_str(),
        })
    }
}
