use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::domain::{CustomerDetails, FieldErrors, FieldRule, NewCustomer};
use crate::flash::FlashMessage;
use crate::routes::render;
use crate::service::{RegistrationError, RegistrationService};

const EMAIL_ADDRESS: FieldRule = FieldRule::new("email_address", "Email address", 255);
const TITLE: FieldRule = FieldRule::new("title", "Title", 5);
const FIRST_NAME: FieldRule = FieldRule::new("first_name", "First name", 50);
const LAST_NAME: FieldRule = FieldRule::new("last_name", "Last name", 50);
const ADDRESS_LINE_1: FieldRule = FieldRule::new("address_line_1", "Address line 1", 255);
const ADDRESS_LINE_2: FieldRule = FieldRule::new("address_line_2", "Address line 2", 255);
const CITY: FieldRule = FieldRule::new("city", "City", 255);
const POSTCODE: FieldRule = FieldRule::new("postcode", "Postcode", 10);
const PHONE_NUMBER: FieldRule = FieldRule::new("phone_number", "Phone number", 20);

const DUPLICATE_EMAIL_MESSAGE: &str = "A customer with this email address already exists";
const GENERIC_FAILURE_MESSAGE: &str = "Registration failed, please try again later";

/// Raw registration form as submitted. Missing fields read as empty.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub email_address: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub address_line_1: String,
    pub address_line_2: String,
    pub city: String,
    pub postcode: String,
    pub phone_number: String,
}

impl TryFrom<&RegistrationForm> for NewCustomer {
    type Error = FieldErrors;

    fn try_from(form: &RegistrationForm) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::new();
        let details = CustomerDetails {
            email_address: EMAIL_ADDRESS.email(&form.email_address, &mut errors),
            title: TITLE.required(&form.title, &mut errors),
            first_name: FIRST_NAME.required(&form.first_name, &mut errors),
            last_name: LAST_NAME.required(&form.last_name, &mut errors),
            address_line_1: ADDRESS_LINE_1.required(&form.address_line_1, &mut errors),
            address_line_2: ADDRESS_LINE_2.optional(&form.address_line_2, &mut errors),
            city: CITY.optional(&form.city, &mut errors),
            postcode: POSTCODE.required(&form.postcode, &mut errors),
            phone_number: PHONE_NUMBER.optional(&form.phone_number, &mut errors),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewCustomer::new(details))
    }
}

#[derive(Template)]
#[template(path = "registration.html")]
pub struct RegistrationTemplate {
    pub form: RegistrationForm,
    pub errors: FieldErrors,
    pub error_message: Option<String>,
}

impl RegistrationTemplate {
    fn blank() -> Self {
        Self {
            form: RegistrationForm::default(),
            errors: FieldErrors::new(),
            error_message: None,
        }
    }
}

pub async fn registration_form() -> Response {
    render(StatusCode::OK, &RegistrationTemplate::blank())
}

#[tracing::instrument(
    name = "Submitting the registration form",
    skip(service, jar, form),
    fields(customer_email = %form.email_address)
)]
pub async fn register(
    State(service): State<RegistrationService>,
    jar: CookieJar,
    Form(form): Form<RegistrationForm>,
) -> Response {
    let candidate = match NewCustomer::try_from(&form) {
        Ok(candidate) => candidate,
        Err(errors) => {
            tracing::info!(invalid_fields = errors.len(), "Registration form failed validation");
            let template = RegistrationTemplate {
                form,
                errors,
                error_message: None,
            };
            return render(StatusCode::BAD_REQUEST, &template);
        }
    };

    let customer = match service.register_customer(candidate).await {
        Ok(customer) => customer,
        Err(error) => return rejected(form, error),
    };

    let flash = FlashMessage {
        message: format!("Registration successful! Welcome {}", customer.full_name()),
        customer_id: customer.id(),
    };
    match flash.attach(jar.clone()) {
        Ok(jar) => (jar, Redirect::to("/success")).into_response(),
        Err(error) => {
            tracing::warn!(error.cause_chain = ?error, "Failed to attach the success message");
            (jar, Redirect::to("/success")).into_response()
        }
    }
}

/// Re-render the submitted form annotated with the reason registration failed.
fn rejected(form: RegistrationForm, error: RegistrationError) -> Response {
    let mut errors = FieldErrors::new();
    let (status, error_message) = match &error {
        RegistrationError::InvalidArgument(message) => {
            errors.add("email_address", message.clone());
            (StatusCode::BAD_REQUEST, None)
        }
        RegistrationError::DuplicateEmail => {
            errors.add("email_address", DUPLICATE_EMAIL_MESSAGE);
            (StatusCode::CONFLICT, Some(DUPLICATE_EMAIL_MESSAGE.to_string()))
        }
        RegistrationError::NotFound(_) | RegistrationError::PersistenceFailure(_) => {
            tracing::error!("{:?}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(GENERIC_FAILURE_MESSAGE.to_string()),
            )
        }
    };

    let template = RegistrationTemplate {
        form,
        errors,
        error_message,
    };
    render(status, &template)
}
