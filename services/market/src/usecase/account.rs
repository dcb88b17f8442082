use chrono::Utc;
use rand::RngExt;
use uuid::Uuid;

use bazaar_domain::role::Role;

use crate::domain::repository::{AccountTokenRepository, MailerPort, UserRepository};
use crate::domain::types::{AccountToken, OutboundEmail, TOKEN_LEN, TokenPurpose, User};
use crate::error::MarketServiceError;
use crate::password::hash_password;

/// Charset for opaque account tokens (16 bytes of entropy, hex encoded).
const CHARSET: &[u8] = b"0123456789abcdef";

fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

fn new_account_token(user_id: Uuid, purpose: TokenPurpose) -> AccountToken {
    let now = Utc::now();
    AccountToken {
        id: Uuid::now_v7(),
        user_id,
        token: generate_token(),
        purpose,
        expires_at: now + purpose.ttl(),
        used_at: None,
        created_at: now,
    }
}

fn confirmation_email(base_url: &str, user: &User, token: &str) -> OutboundEmail {
    OutboundEmail {
        to: user.email.clone(),
        subject: "Confirm your account".to_owned(),
        body: format!(
            "Follow the link to activate your account:\n{base_url}/users/email-confirm/{token}\n"
        ),
    }
}

fn reset_email(base_url: &str, user: &User, token: &str) -> OutboundEmail {
    OutboundEmail {
        to: user.email.clone(),
        subject: "Reset your password".to_owned(),
        body: format!(
            "Follow the link to set a new password:\n{base_url}/users/reset-password-confirm/{}/{token}\n",
            user.id
        ),
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct RegisterUseCase<U, T, M>
where
    U: UserRepository,
    T: AccountTokenRepository,
    M: MailerPort,
{
    pub users: U,
    pub tokens: T,
    pub mailer: M,
    pub public_base_url: String,
}

impl<U, T, M> RegisterUseCase<U, T, M>
where
    U: UserRepository,
    T: AccountTokenRepository,
    M: MailerPort,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<User, MarketServiceError> {
        let email = input
            .email
            .filter(|e| !e.is_empty())
            .ok_or(MarketServiceError::MissingEmail)?;
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .ok_or(MarketServiceError::MissingPassword)?;
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(MarketServiceError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email,
            password_hash: hash_password(&password)?,
            first_name: input.first_name.unwrap_or_default(),
            last_name: input.last_name.unwrap_or_default(),
            phone: input.phone,
            avatar_url: input.avatar_url,
            role: Role::User,
            is_active: false,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;

        let token = new_account_token(user.id, TokenPurpose::Activation);
        self.tokens.create(&token).await?;

        // Mail delivery is part of the request: a transport failure
        // fails the registration response even though the row exists.
        self.mailer
            .send(&confirmation_email(&self.public_base_url, &user, &token.token))
            .await?;

        Ok(user)
    }
}

// ── ConfirmEmail ─────────────────────────────────────────────────────────────

pub struct ConfirmEmailUseCase<U, T>
where
    U: UserRepository,
    T: AccountTokenRepository,
{
    pub users: U,
    pub tokens: T,
}

impl<U, T> ConfirmEmailUseCase<U, T>
where
    U: UserRepository,
    T: AccountTokenRepository,
{
    pub async fn execute(&self, token: &str) -> Result<(), MarketServiceError> {
        let token = self
            .tokens
            .find_valid(token, TokenPurpose::Activation)
            .await?
            .ok_or(MarketServiceError::TokenNotFound)?;

        // Burn the token before flipping the flag: an activation link
        // works exactly once.
        self.tokens.mark_used(token.id).await?;
        self.users.set_active(token.user_id).await?;
        Ok(())
    }
}

// ── RequestPasswordReset ─────────────────────────────────────────────────────

pub struct RequestPasswordResetInput {
    pub email: Option<String>,
}

pub struct RequestPasswordResetUseCase<U, T, M>
where
    U: UserRepository,
    T: AccountTokenRepository,
    M: MailerPort,
{
    pub users: U,
    pub tokens: T,
    pub mailer: M,
    pub public_base_url: String,
}

impl<U, T, M> RequestPasswordResetUseCase<U, T, M>
where
    U: UserRepository,
    T: AccountTokenRepository,
    M: MailerPort,
{
    pub async fn execute(&self, input: RequestPasswordResetInput) -> Result<(), MarketServiceError> {
        let email = input
            .email
            .filter(|e| !e.is_empty())
            .ok_or(MarketServiceError::MissingEmail)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(MarketServiceError::UserNotFound)?;

        let token = new_account_token(user.id, TokenPurpose::PasswordReset);
        self.tokens.create(&token).await?;
        self.mailer
            .send(&reset_email(&self.public_base_url, &user, &token.token))
            .await?;
        Ok(())
    }
}

// ── ConfirmPasswordReset ─────────────────────────────────────────────────────

pub struct ConfirmPasswordResetInput {
    pub user_id: Uuid,
    pub token: String,
    pub password: Option<String>,
}

pub struct ConfirmPasswordResetUseCase<U, T>
where
    U: UserRepository,
    T: AccountTokenRepository,
{
    pub users: U,
    pub tokens: T,
}

impl<U, T> ConfirmPasswordResetUseCase<U, T>
where
    U: UserRepository,
    T: AccountTokenRepository,
{
    pub async fn execute(
        &self,
        input: ConfirmPasswordResetInput,
    ) -> Result<(), MarketServiceError> {
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .ok_or(MarketServiceError::MissingPassword)?;

        // Mismatched, expired and already-used tokens all collapse into
        // one answer; the caller learns nothing about stored tokens.
        let token = self
            .tokens
            .find_valid_for_user(input.user_id, &input.token, TokenPurpose::PasswordReset)
            .await?
            .ok_or(MarketServiceError::ResetLinkInvalid)?;

        self.tokens.mark_used(token.id).await?;
        let password_hash = hash_password(&password)?;
        self.users
            .set_password_hash(input.user_id, &password_hash)
            .await?;
        Ok(())
    }
}
