use super::harness::{unreachable_client, MockApi};
use crate::AuthError;
use chrono::{TimeZone, Utc};
use eco_types::{LoginForm, RegistrationForm, Session};
use serde_json::json;

fn credentials() -> LoginForm {
    LoginForm::new(" ana@example.com ", "Secr3t!pass")
}

fn registration() -> RegistrationForm {
    RegistrationForm {
        names: "Ana".to_string(),
        last_names: "Pérez".to_string(),
        gender_id: Some(2),
        country_id: Some(1),
        user_type_id: Some(5),
        identification_type: "CC".to_string(),
        identification_number: "1020304050".to_string(),
        birth_date: "1990-04-01".to_string(),
        email: "ana@example.com".to_string(),
        password: "Secr3t!pass".to_string(),
        confirm_password: "Secr3t!pass".to_string(),
        contact: "3001234567".to_string(),
        accepted_terms: true,
    }
}

#[tokio::test]
async fn login_maps_response_to_session() {
    let mock = MockApi::start().await;
    mock.respond_json(
        200,
        json!({"userId": 7, "email": "ana@example.com", "userTypeId": 1}),
    );

    let session = mock.client().authenticator().login(&credentials()).await.unwrap();
    assert_eq!(session, Session::new(Some(7), "ana@example.com", 1));

    let request = mock.only_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/ControllerLogin");
    assert_eq!(
        request.json(),
        json!({"email": "ana@example.com", "password": "Secr3t!pass"})
    );
}

#[tokio::test]
async fn login_rejection_is_invalid_credentials() {
    let mock = MockApi::start().await;
    mock.respond(401, r#"{"message":"Unauthorized"}"#);

    let err = mock
        .client()
        .authenticator()
        .login(&credentials())
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);
}

#[tokio::test]
async fn login_unreachable_is_invalid_credentials() {
    let client = unreachable_client().await;
    let err = client.authenticator().login(&credentials()).await.unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);
}

#[tokio::test]
async fn invalid_login_form_sends_nothing() {
    let mock = MockApi::start().await;

    let err = mock
        .client()
        .authenticator()
        .login(&LoginForm::new("ana", "short"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(issues) if !issues.is_empty()));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn register_posts_new_user() {
    let mock = MockApi::start().await;
    mock.respond_json(201, json!({"userId": 12}));
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();

    mock.client()
        .registrar()
        .register(&registration(), now)
        .await
        .unwrap();

    let request = mock.only_request();
    assert_eq!(request.path, "/api/ControllerUser");
    let body = request.json();
    assert_eq!(body["lastnames"], "Pérez");
    assert_eq!(body["phone"], 3001234567i64);
    assert_eq!(body["countryId"], 1);
    assert_eq!(body["creationDate"], "2025-06-01T10:00:00.000Z");
}

#[tokio::test]
async fn register_surfaces_server_message() {
    let mock = MockApi::start().await;
    mock.respond(409, r#"{"message":"Email already registered"}"#);

    let err = mock
        .client()
        .registrar()
        .register(&registration(), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::Rejected("Email already registered".to_string()));
}

#[tokio::test]
async fn register_without_message_reports_status() {
    let mock = MockApi::start().await;
    mock.respond(500, "oops");

    let err = mock
        .client()
        .registrar()
        .register(&registration(), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Rejected(msg) if msg.starts_with("HTTP 500")));
}
