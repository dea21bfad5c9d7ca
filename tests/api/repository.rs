use std::sync::Arc;

use claims::{assert_err, assert_matches, assert_none, assert_ok, assert_some};

use registration::domain::{CustomerDetails, CustomerId, NewCustomer};
use registration::repository::{CustomerRepository, PostgresCustomerRepository, RepositoryError};
use registration::service::{RegistrationError, RegistrationService};

use crate::helpers::App;

fn service(app: &App) -> RegistrationService {
    RegistrationService::new(Arc::new(PostgresCustomerRepository::new(app.pool.clone())))
}

fn candidate(email: &str, last_name: &str) -> NewCustomer {
    NewCustomer::new(CustomerDetails {
        email_address: email.to_string(),
        title: "Ms".to_string(),
        first_name: "Jane".to_string(),
        last_name: last_name.to_string(),
        address_line_1: "1 Road".to_string(),
        address_line_2: None,
        city: Some("London".to_string()),
        postcode: "AB1 2CD".to_string(),
        phone_number: None,
    })
}

#[tokio::test]
async fn deleting_an_unknown_id_is_not_found() {
    let app = App::new().await;

    let error = assert_err!(service(&app).delete_by_id(CustomerId::new(4242)).await);

    assert_matches!(error, RegistrationError::NotFound(_));
}

#[tokio::test]
async fn deleted_customer_can_no_longer_be_found() {
    let app = App::new().await;
    let service = service(&app);
    let customer = assert_ok!(
        service
            .register_customer(candidate("jane.doe@example.com", "Doe"))
            .await
    );
    assert_some!(assert_ok!(service.find_by_id(customer.id()).await));

    assert_ok!(service.delete_by_id(customer.id()).await);

    assert_none!(assert_ok!(service.find_by_id(customer.id()).await));
    assert_eq!(app.customer_count().await, 0);

    let error = assert_err!(service.delete_by_id(customer.id()).await);
    assert_matches!(error, RegistrationError::NotFound(_));
}

#[tokio::test]
async fn customer_is_found_by_email_in_any_casing() {
    let app = App::new().await;
    let service = service(&app);
    let candidate = candidate("Jane.Doe@Example.com", "Doe");
    let registered_at = candidate.registered_at();
    let customer = assert_ok!(service.register_customer(candidate).await);

    let found = assert_some!(assert_ok!(service.find_by_email("JANE.DOE@EXAMPLE.COM").await));

    assert_eq!(found, customer);
    assert_eq!(found.registered_at(), registered_at);
    assert_eq!(found.details.email_address, "jane.doe@example.com");
    assert_eq!(found.details.city.as_deref(), Some("London"));
    assert_none!(assert_ok!(service.find_by_email("john@example.com").await));
}

#[tokio::test]
async fn listing_returns_every_customer_in_id_order() {
    let app = App::new().await;
    let service = service(&app);
    let mut registered = Vec::new();
    for (email, last_name) in [
        ("c@example.com", "Carter"),
        ("a@example.com", "Adams"),
        ("b@example.com", "Brown"),
    ] {
        let customer = assert_ok!(service.register_customer(candidate(email, last_name)).await);
        registered.push(customer.id());
    }

    let listed: Vec<_> = assert_ok!(service.list_all().await)
        .iter()
        .map(|customer| customer.id())
        .collect();

    assert_eq!(listed, registered);
    let mut sorted = listed.clone();
    sorted.sort();
    assert_eq!(listed, sorted);
}

#[tokio::test]
async fn duplicate_insert_past_the_pre_check_is_reported_as_duplicate() {
    let app = App::new().await;
    let repository = PostgresCustomerRepository::new(app.pool.clone());
    assert_ok!(
        service(&app)
            .register_customer(candidate("race@example.com", "Doe"))
            .await
    );

    // Straight to the write, as a racing request would after a stale check.
    let error = assert_err!(
        repository
            .save(&candidate("RACE@example.com", "Doe"))
            .await
    );

    assert_matches!(error, RepositoryError::DuplicateEmail);
    assert_eq!(app.customer_count().await, 1);
}
