use std::time::{SystemTime, UNIX_EPOCH};

use bazaar_domain::role::Role;
use bazaar_identity::claims::{AuthError, validate_token};

use bazaar_market::error::MarketServiceError;
use bazaar_market::usecase::token::{
    LoginInput, LoginUseCase, RefreshSessionUseCase, issue_access_token, issue_refresh_token,
};

use crate::helpers::{MockUserRepo, TEST_JWT_SECRET, TEST_PASSWORD, active_user, moderator_user};

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

// ── issue_access_token / issue_refresh_token ─────────────────────────────────

#[tokio::test]
async fn should_issue_access_token_that_validates_successfully() {
    let user = active_user("seller@example.com");
    let token = issue_access_token(&user, TEST_JWT_SECRET).unwrap();

    assert!(!token.is_empty());

    let info = validate_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id);
    assert_eq!(info.role, Role::User);
    assert!(info.exp > now_secs(), "access token must expire in the future");
}

#[tokio::test]
async fn should_give_refresh_token_a_longer_lifetime_than_access() {
    let user = active_user("seller@example.com");
    let access = issue_access_token(&user, TEST_JWT_SECRET).unwrap();
    let refresh = issue_refresh_token(&user, TEST_JWT_SECRET).unwrap();

    let access_exp = validate_token(&access, TEST_JWT_SECRET).unwrap().exp;
    let refresh_exp = validate_token(&refresh, TEST_JWT_SECRET).unwrap().exp;
    assert!(
        refresh_exp > access_exp,
        "refresh exp {refresh_exp} must outlive access exp {access_exp}"
    );
}

#[tokio::test]
async fn should_embed_moderator_role_in_claims() {
    let user = moderator_user("mod@example.com");
    let token = issue_access_token(&user, TEST_JWT_SECRET).unwrap();

    let info = validate_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.role, Role::Moderator);
}

#[tokio::test]
async fn should_reject_token_signed_with_wrong_secret() {
    let user = active_user("seller@example.com");
    let token = issue_access_token(&user, TEST_JWT_SECRET).unwrap();

    let result = validate_token(&token, "wrong-secret");
    assert!(
        matches!(result, Err(AuthError::InvalidSignature)),
        "expected InvalidSignature, got {result:?}"
    );
}

// ── LoginUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_against_the_matching_account() {
    let other = active_user("first@example.com");
    let user = active_user("second@example.com");
    let user_id = user.id;

    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![other, user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let pair = usecase
        .execute(LoginInput {
            email: Some("second@example.com".to_owned()),
            password: Some(TEST_PASSWORD.to_owned()),
        })
        .await
        .unwrap();

    let info = validate_token(&pair.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user_id, "claims must describe the matched row");
    assert!(validate_token(&pair.refresh_token, TEST_JWT_SECRET).is_ok());
}

#[tokio::test]
async fn should_not_reveal_whether_email_or_password_was_wrong() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![active_user("seller@example.com")]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let unknown_email = usecase
        .execute(LoginInput {
            email: Some("ghost@example.com".to_owned()),
            password: Some(TEST_PASSWORD.to_owned()),
        })
        .await;
    let wrong_password = usecase
        .execute(LoginInput {
            email: Some("seller@example.com".to_owned()),
            password: Some("not-the-password".to_owned()),
        })
        .await;

    assert!(
        matches!(unknown_email, Err(MarketServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {unknown_email:?}"
    );
    assert!(
        matches!(wrong_password, Err(MarketServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {wrong_password:?}"
    );
}

#[tokio::test]
async fn should_reject_login_for_unconfirmed_account() {
    let mut user = active_user("seller@example.com");
    user.is_active = false;

    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = usecase
        .execute(LoginInput {
            email: Some("seller@example.com".to_owned()),
            password: Some(TEST_PASSWORD.to_owned()),
        })
        .await;
    assert!(
        matches!(result, Err(MarketServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

// ── RefreshSessionUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_rotate_the_pair_on_refresh() {
    let user = active_user("seller@example.com");
    let user_id = user.id;
    let refresh = issue_refresh_token(&user, TEST_JWT_SECRET).unwrap();

    let usecase = RefreshSessionUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let pair = usecase.execute(&refresh).await.unwrap();

    let info = validate_token(&pair.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user_id);
    assert!(validate_token(&pair.refresh_token, TEST_JWT_SECRET).is_ok());
}

#[tokio::test]
async fn should_reject_refresh_signed_with_wrong_secret() {
    let user = active_user("seller@example.com");
    let refresh = issue_refresh_token(&user, "other-secret").unwrap();

    let usecase = RefreshSessionUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = usecase.execute(&refresh).await;
    assert!(
        matches!(result, Err(MarketServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_refresh_after_account_deletion() {
    let user = active_user("seller@example.com");
    let refresh = issue_refresh_token(&user, TEST_JWT_SECRET).unwrap();

    let usecase = RefreshSessionUseCase {
        users: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = usecase.execute(&refresh).await;
    assert!(
        matches!(result, Err(MarketServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_refresh_for_deactivated_account() {
    let mut user = active_user("seller@example.com");
    let refresh = issue_refresh_token(&user, TEST_JWT_SECRET).unwrap();
    user.is_active = false;

    let usecase = RefreshSessionUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = usecase.execute(&refresh).await;
    assert!(
        matches!(result, Err(MarketServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}
