use serde_json::json;

use credential_gate::{
    AuthErrorKind, FormError, ProviderError, ProviderOperation, RegistrationInput, SignInMethod,
    StoreError,
};

use crate::common::{ALICE_EMAIL, in_memory_screens};

#[tokio::test]
async fn test_registration_writes_profile_once() {
    let screens = in_memory_screens().await;
    let input = RegistrationInput::new("Bob", "bob@example.com", "hunter22");

    let session = screens
        .register
        .submit_registration(&input)
        .await
        .expect("Failed to register");

    assert_eq!(screens.store.write_count().await, 1);
    let document = screens
        .store
        .get_document("users", &session.user.uid)
        .await
        .expect("Profile document missing");
    assert_eq!(
        document,
        json!({
            "uid": &session.user.uid,
            "displayName": "Bob",
            "email": "bob@example.com"
        })
    );
    assert_eq!(session.method, SignInMethod::Registration);
    assert_eq!(session.user.display_name.as_deref(), Some("Bob"));
    assert_eq!(screens.session.current(), Some(session));
    assert!(screens.register.state().loading);
}

#[tokio::test]
async fn test_registration_with_taken_email() {
    let screens = in_memory_screens().await;
    let input = RegistrationInput::new("Alice Again", ALICE_EMAIL, "hunter22");

    let err = screens
        .register
        .submit_registration(&input)
        .await
        .expect_err("Duplicate email must be rejected");

    assert_eq!(
        err,
        FormError::AuthenticationFailed(AuthErrorKind::EmailAlreadyInUse)
    );
    assert_eq!(
        screens.register.state().error_message().as_deref(),
        Some("Email already in use, Please try again.")
    );
    assert_eq!(screens.store.write_count().await, 0);
    assert!(!screens.register.state().loading);
}

#[tokio::test]
async fn test_registration_weak_password() {
    let screens = in_memory_screens().await;
    let input = RegistrationInput::new("Bob", "bob@example.com", "123");

    screens
        .register
        .submit_registration(&input)
        .await
        .expect_err("Weak password must be rejected");

    assert_eq!(
        screens.register.state().error_message().as_deref(),
        Some("Weak password, Please try again.")
    );
    assert!(!screens.identity.has_account("bob@example.com").await);
}

#[tokio::test]
async fn test_store_failure_rolls_back_account() {
    let screens = in_memory_screens().await;
    screens
        .store
        .fail_writes(StoreError::PermissionDenied("rules".to_string()))
        .await;
    let input = RegistrationInput::new("Bob", "bob@example.com", "hunter22");

    screens
        .register
        .submit_registration(&input)
        .await
        .expect_err("Store failure must fail the registration");

    assert!(!screens.identity.has_account("bob@example.com").await);
    assert!(!screens.session.is_signed_in());
    assert_eq!(
        screens
            .identity
            .call_count(ProviderOperation::DeleteAccount)
            .await,
        1
    );

    // The same email can register once the store recovers
    screens.store.clear_failure().await;
    screens
        .register
        .submit_registration(&input)
        .await
        .expect("Failed to register after recovery");
    assert!(screens.identity.has_account("bob@example.com").await);
}

#[tokio::test]
async fn test_display_name_failure_rolls_back_without_write() {
    let screens = in_memory_screens().await;
    screens
        .identity
        .fail_with(
            ProviderOperation::UpdateDisplayName,
            ProviderError::new("auth/user-token-expired", "TOKEN_EXPIRED"),
        )
        .await;
    let input = RegistrationInput::new("Bob", "bob@example.com", "hunter22");

    screens
        .register
        .submit_registration(&input)
        .await
        .expect_err("Profile update failure must fail the registration");

    assert_eq!(screens.store.write_count().await, 0);
    assert!(!screens.identity.has_account("bob@example.com").await);
    assert_eq!(
        screens.register.state().error_message().as_deref(),
        Some("User token expired, Please try again.")
    );
}

#[tokio::test]
async fn test_failed_rollback_reports_original_error() {
    let screens = in_memory_screens().await;
    screens
        .store
        .fail_writes(StoreError::Network("unreachable".to_string()))
        .await;
    screens
        .identity
        .fail_with(
            ProviderOperation::DeleteAccount,
            ProviderError::network("unreachable"),
        )
        .await;
    let input = RegistrationInput::new("Bob", "bob@example.com", "hunter22");

    let err = screens
        .register
        .submit_registration(&input)
        .await
        .expect_err("Store failure must fail the registration");

    assert_eq!(
        err,
        FormError::AuthenticationFailed(AuthErrorKind::Other("store/unavailable".to_string()))
    );
    // The orphaned account remains since the rollback itself failed
    assert!(screens.identity.has_account("bob@example.com").await);
}

#[tokio::test]
async fn test_login_form_cannot_register() {
    let screens = in_memory_screens().await;
    let input = RegistrationInput::new("Bob", "bob@example.com", "hunter22");

    let err = screens
        .login
        .submit_registration(&input)
        .await
        .expect_err("Login form has no provisioner");

    assert!(matches!(err, FormError::NotConfigured(_)));
    assert!(!screens.login.state().loading);
    assert_eq!(
        screens
            .identity
            .call_count(ProviderOperation::CreateAccount)
            .await,
        0
    );
}
