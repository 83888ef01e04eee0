use actix_web::{body, http::{header::ContentType, StatusCode}, web, HttpResponse, ResponseError};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::payroll::PayrollError;

mod auth;
mod automation;
mod payroll;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/auth")
            .configure(auth::config))
        .service(web::scope("/payroll")
            .configure(payroll::config))
        .service(web::scope("/automation/payroll")
            .configure(automation::config));
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Payroll(#[from] PayrollError),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("not found")]
    NotFound,

    #[error("database error")]
    Database(#[from] DbErr),

    #[error("stored payroll is corrupted")]
    Corrupted(#[from] serde_json::Error),

    #[error("payroll could not be encoded for storage")]
    Encoding(#[source] serde_json::Error),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        if let ApiError::Database(e) = self {
            error!(error = %e, "database failure");
        }

        if let ApiError::Corrupted(e) = self {
            error!(error = %e, "stored payroll could not be decoded");
        }

        if let ApiError::Encoding(e) = self {
            error!(error = %e, "payroll snapshot could not be encoded");
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Payroll(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Corrupted(_) | ApiError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
