use axum::extract::{Query, State};
use serde::Deserialize;

use crate::service::{RegistrationError, RegistrationService};

#[derive(Deserialize, Debug)]
pub struct Parameters {
    email: String,
}

/// Plain-text availability probe used by the form's live email check.
#[tracing::instrument(name = "Checking email availability for the form", skip(service))]
pub async fn check_email(
    State(service): State<RegistrationService>,
    Query(parameters): Query<Parameters>,
) -> Result<&'static str, RegistrationError> {
    let exists = service.is_email_registered(&parameters.email).await?;

    Ok(if exists { "exists" } else { "available" })
}
