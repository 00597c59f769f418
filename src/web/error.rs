//! HTTP mapping for `AppError`: client errors answer with their message as
//! plain text, server errors are logged and answered generically.

use crate::errors::AppError;
use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::LoginRequired => StatusCode::SEE_OTHER,
            AppError::ExpenseNotFound | AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::UsernameTaken => StatusCode::CONFLICT,
            AppError::Validation(_)
            | AppError::InvalidMonth(_)
            | AppError::InvalidDate(_)
            | AppError::InvalidImport(_)
            | AppError::InvalidExportFormat(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status == StatusCode::SEE_OTHER {
            return HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/login"))
                .finish();
        }

        let body = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, String) {
        let res = err.error_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body()).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[actix_web::test]
    async fn client_errors_show_their_message() {
        assert_eq!(
            body_of(AppError::UsernameTaken).await,
            (StatusCode::CONFLICT, "Username already exists".into())
        );
        assert_eq!(
            body_of(AppError::ExpenseNotFound).await,
            (StatusCode::NOT_FOUND, "Expense not found".into())
        );
        assert_eq!(
            body_of(AppError::InvalidCredentials).await,
            (StatusCode::UNAUTHORIZED, "Invalid credentials".into())
        );
    }

    #[actix_web::test]
    async fn server_errors_are_redacted() {
        let (status, body) = body_of(AppError::Other("disk on fire".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
    }
}
