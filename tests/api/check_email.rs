use reqwest::StatusCode;

use crate::helpers::{jane_doe, App};

#[tokio::test]
async fn unknown_email_is_available() {
    let app = App::new().await;

    let response = app.get_check_email("nobody@example.com").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "available");
}

#[tokio::test]
async fn registered_email_exists_in_any_casing() {
    let app = App::new().await;
    app.post_registration(&jane_doe("john@example.com")).await;

    for email in ["john@example.com", "JOHN@EXAMPLE.COM", "John@Example.Com"] {
        let response = app.get_check_email(email).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "exists", "{email}");
    }
}

#[tokio::test]
async fn blank_email_is_rejected_with_400() {
    let app = App::new().await;

    let response = app.get_check_email("   ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_email_parameter_is_rejected_with_400() {
    let app = App::new().await;

    let response = app.get("/check-email").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
