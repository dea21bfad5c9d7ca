use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{FromRef, MatchedPath},
    http::Request,
    routing::get,
    Router,
};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::configuration::DatabaseSettings;
use crate::repository::PostgresCustomerRepository;
use crate::routes::{check_email, check_health, home, register, registration_form, success};
use crate::service::RegistrationService;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub registration: RegistrationService,
}

pub fn get_connection_pool(settings: &DatabaseSettings) -> Result<Pool<Postgres>, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.pool_size)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(settings.connection_string().expose_secret())
}

pub fn get_app_state(pool: Pool<Postgres>) -> AppState {
    let repository = PostgresCustomerRepository::new(pool);

    AppState {
        registration: RegistrationService::new(Arc::new(repository)),
    }
}

pub async fn run(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/registration", get(registration_form).post(register))
        .route("/success", get(success))
        .route("/check-email", get(check_email))
        .route("/health_check", get(check_health))
        .with_state(state)
        .layer(
            // Refer to https://github.com/tokio-rs/axum/blob/main/examples/tracing-aka-logging/Cargo.toml
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);
                tracing::info_span!(
                    "Starting HTTP request",
                    method = ?request.method(),
                    path,
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
}
