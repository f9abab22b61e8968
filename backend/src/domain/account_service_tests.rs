//! Tests for the account service.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{
    MockPasswordHasher, MockTokenBlacklist, MockTokenCodec, MockUserRepository,
    UserPersistenceError,
};
use crate::domain::{ErrorCode, PasswordDigest};
use crate::test_support::{MutableClock, TestBackend, signup_request};

#[fixture]
fn backend() -> TestBackend {
    TestBackend::new()
}

fn patch_email(raw: &str) -> AccountPatch {
    AccountPatch {
        email: Some(EmailAddress::new(raw).expect("valid email")),
        ..AccountPatch::default()
    }
}

#[rstest]
#[tokio::test]
async fn signup_registers_an_active_end_user(backend: TestBackend) {
    let user = backend
        .accounts
        .signup(signup_request("Ada", "9876543210"))
        .await
        .expect("signup succeeds");

    assert_eq!(user.role, UserRole::EndUser);
    assert!(user.is_active);
    assert_eq!(user.email.as_ref(), "ada@example.com");
    assert_ne!(user.password.as_str(), crate::test_support::TEST_PASSWORD);
    assert!(backend.store.user(&user.id).is_some());
}

#[rstest]
#[case::email(signup_request("Ada", "9000000001"), "email")]
#[case::contact(
    NewAccount {
        email: EmailAddress::new("other@example.com").expect("email"),
        ..signup_request("Grace", "9876543210")
    },
    "contact_number"
)]
#[tokio::test]
async fn signup_rejects_duplicates(
    backend: TestBackend,
    #[case] second: NewAccount,
    #[case] field: &str,
) {
    backend.register("Ada", "9876543210").await;

    let error = backend.accounts.signup(second).await.expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details(), Some(&json!({"field": field, "code": "duplicate"})));
}

#[rstest]
#[case::email("ada@example.com")]
#[case::upper_case_email("ADA@Example.com")]
#[case::contact_number("9876543210")]
#[tokio::test]
async fn login_accepts_email_or_contact_number(backend: TestBackend, #[case] identifier: &str) {
    let (user, _) = backend.register("Ada", "9876543210").await;

    let outcome = backend.login(identifier).await;

    assert_eq!(outcome.user.id, user.id);
    assert_eq!(outcome.tokens.access.claims.kind, TokenKind::Access);
    assert_eq!(outcome.tokens.refresh.claims.kind, TokenKind::Refresh);
    assert_eq!(outcome.tokens.access.claims.user_id, user.id);
}

#[rstest]
#[case::wrong_password("ada@example.com", "not the password")]
#[case::unknown_user("nobody@example.com", "open sesame")]
#[tokio::test]
async fn login_rejects_bad_credentials(
    backend: TestBackend,
    #[case] identifier: &str,
    #[case] password: &str,
) {
    backend.register("Ada", "9876543210").await;
    let credentials = LoginCredentials::try_from_parts(identifier, password).expect("shape");

    let error = backend.accounts.login(&credentials).await.expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "invalid credentials");
}

#[rstest]
#[tokio::test]
async fn login_rejects_deactivated_accounts(backend: TestBackend) {
    let (_, actor) = backend.register("Ada", "9876543210").await;
    backend
        .accounts
        .deactivate(&actor, None)
        .await
        .expect("deactivate");
    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", crate::test_support::TEST_PASSWORD)
            .expect("shape");

    let error = backend.accounts.login(&credentials).await.expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "account is deactivated");
}

#[rstest]
#[tokio::test]
async fn authenticate_resolves_access_tokens_only(backend: TestBackend) {
    let (user, _) = backend.register("Ada", "9876543210").await;
    let tokens = backend.login("ada@example.com").await.tokens;

    let actor = backend
        .accounts
        .authenticate(&tokens.access.token)
        .await
        .expect("access token accepted");
    assert_eq!(actor.user_id, user.id);

    let error = backend
        .accounts
        .authenticate(&tokens.refresh.token)
        .await
        .expect_err("refresh token is not an access token");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn authenticate_rejects_expired_and_garbled_tokens(backend: TestBackend) {
    backend.register("Ada", "9876543210").await;
    let tokens = backend.login("ada@example.com").await.tokens;

    let garbled = backend.accounts.authenticate("not-a-jwt").await;
    assert_eq!(garbled.map_err(|e| e.code()), Err(ErrorCode::Unauthorized));

    backend.clock.advance_seconds(3600);
    let error = backend
        .accounts
        .authenticate(&tokens.access.token)
        .await
        .expect_err("expired");
    assert_eq!(error.message(), "token has expired");
}

#[rstest]
#[tokio::test]
async fn authenticate_reflects_role_changes_without_relogin(backend: TestBackend) {
    let (_, actor) = backend.register("Ada", "9876543210").await;
    let tokens = backend.login("ada@example.com").await.tokens;
    backend
        .sellers
        .create(
            &actor,
            crate::test_support::seller_profile_input("Ada's Shop", 12.97, 77.59),
        )
        .await
        .expect("seller created");

    let refreshed = backend
        .accounts
        .authenticate(&tokens.access.token)
        .await
        .expect("still valid");

    assert_eq!(refreshed.role, UserRole::Seller);
}

#[rstest]
#[tokio::test]
async fn refresh_mints_a_new_access_token(backend: TestBackend) {
    backend.register("Ada", "9876543210").await;
    let tokens = backend.login("ada@example.com").await.tokens;
    backend.clock.advance_seconds(60);

    let issued = backend
        .accounts
        .refresh(&tokens.refresh.token)
        .await
        .expect("refresh accepted");

    assert_eq!(issued.claims.kind, TokenKind::Access);
    assert!(issued.claims.issued_at > tokens.access.claims.issued_at);
    backend
        .accounts
        .authenticate(&issued.token)
        .await
        .expect("new access token works");

    let error = backend
        .accounts
        .refresh(&tokens.access.token)
        .await
        .expect_err("access token cannot refresh");
    assert_eq!(error.message(), "expected refresh token");
}

#[rstest]
#[tokio::test]
async fn logout_revokes_both_tokens(backend: TestBackend) {
    backend.register("Ada", "9876543210").await;
    let tokens = backend.login("ada@example.com").await.tokens;
    let actor = backend
        .accounts
        .authenticate(&tokens.access.token)
        .await
        .expect("authenticated");

    backend
        .accounts
        .logout(&actor, &tokens.access.token, &tokens.refresh.token)
        .await
        .expect("logout succeeds");

    assert_eq!(backend.store.revoked_count(), 2);
    let access = backend.accounts.authenticate(&tokens.access.token).await;
    let refresh = backend.accounts.refresh(&tokens.refresh.token).await;
    for result in [access.map(|_| ()), refresh.map(|_| ())] {
        let error = result.expect_err("revoked");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "token has been revoked");
    }
}

#[rstest]
#[tokio::test]
async fn logout_rejects_foreign_or_malformed_refresh_tokens(backend: TestBackend) {
    backend.register("Ada", "9876543210").await;
    backend.register("Grace", "9876543211").await;
    let ada = backend.login("ada@example.com").await.tokens;
    let grace = backend.login("grace@example.com").await.tokens;
    let actor = backend
        .accounts
        .authenticate(&ada.access.token)
        .await
        .expect("authenticated");

    for refresh in [grace.refresh.token.as_str(), ada.access.token.as_str(), "garbage"] {
        let error = backend
            .accounts
            .logout(&actor, &ada.access.token, refresh)
            .await
            .expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
    assert_eq!(backend.store.revoked_count(), 0);
}

#[rstest]
#[tokio::test]
async fn logout_rejects_expired_refresh_tokens(backend: TestBackend) {
    let (_, actor) = backend.register("Ada", "9876543210").await;
    let stale = backend.login("ada@example.com").await.tokens;
    backend.clock.advance_seconds(3 * 24 * 60 * 60);
    let fresh = backend.login("ada@example.com").await.tokens;

    let error = backend
        .accounts
        .logout(&actor, &fresh.access.token, &stale.refresh.token)
        .await
        .expect_err("expired refresh token");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(backend.store.revoked_count(), 0);
}

#[rstest]
#[tokio::test]
async fn update_profile_rechecks_uniqueness_excluding_self(backend: TestBackend) {
    let (_, ada) = backend.register("Ada", "9876543210").await;
    backend.register("Grace", "9876543211").await;

    let unchanged = backend
        .accounts
        .update_profile(&ada, patch_email("ada@example.com"))
        .await
        .expect("own email is not a conflict");
    assert_eq!(unchanged.email.as_ref(), "ada@example.com");

    let error = backend
        .accounts
        .update_profile(&ada, patch_email("grace@example.com"))
        .await
        .expect_err("taken");
    assert_eq!(error.details(), Some(&json!({"field": "email", "code": "duplicate"})));
}

#[rstest]
#[tokio::test]
async fn update_profile_rehashes_passwords(backend: TestBackend) {
    let (_, ada) = backend.register("Ada", "9876543210").await;
    let patch = AccountPatch {
        last_name: Some(PersonName::new("Lovelace").expect("name")),
        password: Some(Password::new("new secret").expect("password")),
        ..AccountPatch::default()
    };

    let updated = backend
        .accounts
        .update_profile(&ada, patch)
        .await
        .expect("updated");

    assert_eq!(updated.last_name.as_ref(), "Lovelace");
    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", "new secret").expect("shape");
    backend
        .accounts
        .login(&credentials)
        .await
        .expect("new password works");
}

#[rstest]
#[tokio::test]
async fn deactivate_applies_to_self_for_non_admins(backend: TestBackend) {
    let (user, ada) = backend.register("Ada", "9876543210").await;
    let (other, _) = backend.register("Grace", "9876543211").await;

    let error = backend
        .accounts
        .deactivate(&ada, Some(other.id))
        .await
        .expect_err("cannot deactivate others");
    assert_eq!(error.code(), ErrorCode::Forbidden);

    let deactivated = backend
        .accounts
        .deactivate(&ada, None)
        .await
        .expect("self deactivation");
    assert_eq!(deactivated.id, user.id);
    assert!(!deactivated.is_active);
}

#[rstest]
#[tokio::test]
async fn deactivate_by_admin_requires_a_target(backend: TestBackend) {
    let (_, admin) = backend.register_admin("Root", "9000000000").await;
    let (user, _) = backend.register("Ada", "9876543210").await;

    let missing = backend
        .accounts
        .deactivate(&admin, None)
        .await
        .expect_err("user_id required");
    assert_eq!(
        missing.details(),
        Some(&json!({"field": "user_id", "code": "missing_field"}))
    );

    let unknown = backend
        .accounts
        .deactivate(&admin, Some(UserId::random()))
        .await
        .expect_err("unknown user");
    assert_eq!(unknown.code(), ErrorCode::NotFound);

    backend
        .accounts
        .deactivate(&admin, Some(user.id))
        .await
        .expect("deactivated");
    let again = backend
        .accounts
        .deactivate(&admin, Some(user.id))
        .await
        .expect_err("already inactive");
    assert_eq!(again.code(), ErrorCode::InvalidRequest);
    assert!(!backend.store.user(&user.id).expect("stored").is_active);
}

#[rstest]
#[tokio::test]
async fn deactivated_users_cannot_authenticate(backend: TestBackend) {
    let (_, ada) = backend.register("Ada", "9876543210").await;
    let tokens = backend.login("ada@example.com").await.tokens;
    backend.accounts.deactivate(&ada, None).await.expect("deactivated");

    let error = backend
        .accounts
        .authenticate(&tokens.access.token)
        .await
        .expect_err("inactive");

    assert_eq!(error.message(), "account is deactivated");
}

fn mocked_service(users: MockUserRepository) -> AccountService {
    AccountService::new(
        AccountPorts {
            users: Arc::new(users),
            blacklist: Arc::new(MockTokenBlacklist::new()),
            hasher: Arc::new(MockPasswordHasher::new()),
            tokens: Arc::new(MockTokenCodec::new()),
        },
        Arc::new(MutableClock::new(crate::test_support::start_of_tests())),
        TokenLifetimes::default(),
    )
}

#[rstest]
#[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_map_to_error_codes(
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Err(failure));
    let service = mocked_service(users);

    let error = service
        .signup(signup_request("Ada", "9876543210"))
        .await
        .expect_err("repository failure");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn insert_race_surfaces_as_duplicate() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users.expect_find_by_contact_number().return_once(|_| Ok(None));
    users
        .expect_insert()
        .return_once(|_| Err(UserPersistenceError::duplicate("email")));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(PasswordDigest::new("digest")));
    let service = AccountService::new(
        AccountPorts {
            users: Arc::new(users),
            blacklist: Arc::new(MockTokenBlacklist::new()),
            hasher: Arc::new(hasher),
            tokens: Arc::new(MockTokenCodec::new()),
        },
        Arc::new(MutableClock::new(crate::test_support::start_of_tests())),
        TokenLifetimes::default(),
    );

    let error = service
        .signup(signup_request("Ada", "9876543210"))
        .await
        .expect_err("duplicate");

    assert_eq!(error.details(), Some(&json!({"field": "email", "code": "duplicate"})));
}
