//! One-shot messages carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::domain::CustomerId;

const FLASH_COOKIE: &str = "_flash";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub message: String,
    pub customer_id: CustomerId,
}

impl FlashMessage {
    /// Add the message to `jar` so it is readable on the next request.
    pub fn attach(&self, jar: CookieJar) -> Result<CookieJar, serde_json::Error> {
        let value = urlencoding::encode(&serde_json::to_string(self)?).into_owned();
        let cookie = Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);

        Ok(jar.add(cookie))
    }

    /// Read the pending message, if any, and expire it.
    pub fn take(jar: CookieJar) -> (CookieJar, Option<Self>) {
        let flash = jar.get(FLASH_COOKIE).and_then(|cookie| {
            Self::decode(cookie.value())
                .map_err(|error| {
                    tracing::warn!(error.cause_chain = ?error, "Discarding unreadable flash message")
                })
                .ok()
        });

        (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
    }

    fn decode(value: &str) -> Result<Self, anyhow::Error> {
        let json = urlencoding::decode(value)?;
        Ok(serde_json::from_str(&json)?)
    }
}
