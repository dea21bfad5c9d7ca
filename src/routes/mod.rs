mod check_email;
mod health_check;
mod home;
mod registration;
mod success;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::service::RegistrationError;

pub use check_email::check_email;
pub use health_check::check_health;
pub use home::home;
pub use registration::{register, registration_form, RegistrationForm};
pub use success::success;

fn render(status: StatusCode, template: &impl Template) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(error) => {
            tracing::error!("Template render error: {}", error);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        match self {
            RegistrationError::InvalidArgument(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            RegistrationError::DuplicateEmail => {
                (StatusCode::CONFLICT, self.to_string()).into_response()
            }
            RegistrationError::NotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            RegistrationError::PersistenceFailure(_) => {
                tracing::error!("{:?}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong").into_response()
            }
        }
    }
}
