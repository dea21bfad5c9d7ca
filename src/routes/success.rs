use askama::Template;
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use crate::domain::CustomerId;
use crate::flash::FlashMessage;
use crate::routes::render;

#[derive(Template)]
#[template(path = "success.html")]
pub struct SuccessTemplate {
    pub message: Option<String>,
    pub customer_id: Option<CustomerId>,
}

pub async fn success(jar: CookieJar) -> (CookieJar, Response) {
    let (jar, flash) = FlashMessage::take(jar);
    let template = match flash {
        Some(flash) => SuccessTemplate {
            message: Some(flash.message),
            customer_id: Some(flash.customer_id),
        },
        None => SuccessTemplate {
            message: None,
            customer_id: None,
        },
    };

    (jar, render(StatusCode::OK, &template))
}
