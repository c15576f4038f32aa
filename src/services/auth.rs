//! Authentication, sessions, password reset and user creation

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::{
    config::{AuthConfig, BootstrapAdmin},
    error::{AppError, AppResult},
    models::user::{CreateUser, LoginResponse, Permission, User, UserClaims, UserInfo},
    repository::Repository,
    services::email::EmailService,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    email: EmailService,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, email: EmailService) -> Self {
        Self {
            repository,
            config,
            email,
        }
    }

    /// Check credentials, open a session and issue a JWT for it
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&user.password, password)? {
            tracing::info!("Failed login for {}", username);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let permissions = self.repository.users.get_permissions(user.id).await?;
        let sid = self.repository.sessions.create(user.id).await?;

        let now = Utc::now().timestamp();
        let expires_in = self.config.jwt_expiration_hours as i64 * 3600;
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            sid,
            is_superuser: user.is_superuser,
            permissions: permissions.clone(),
            exp: now + expires_in,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!("User {} logged in", user.username);
        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            user: UserInfo::new(user, permissions),
        })
    }

    /// Close the session the token belongs to
    pub async fn logout(&self, claims: &UserClaims) -> AppResult<()> {
        self.repository.sessions.delete(claims.sid).await?;
        tracing::info!("User {} logged out", claims.sub);
        Ok(())
    }

    /// Reject tokens whose session was closed, and replace the superuser
    /// flag and permissions carried by the token with the stored ones
    pub async fn verify_session(&self, mut claims: UserClaims) -> AppResult<UserClaims> {
        if !self
            .repository
            .sessions
            .is_active(claims.sid, claims.user_id)
            .await?
        {
            return Err(AppError::Authentication("Session has ended".to_string()));
        }

        let user = self.repository.users.get_by_id(claims.user_id).await?;
        claims.is_superuser = user.is_superuser;
        claims.permissions = self.repository.users.get_permissions(user.id).await?;
        Ok(claims)
    }

    /// Current user with fresh permissions
    pub async fn me(&self, claims: &UserClaims) -> AppResult<UserInfo> {
        let user = self.repository.users.get_by_id(claims.user_id).await?;
        let permissions = self.repository.users.get_permissions(user.id).await?;
        Ok(UserInfo::new(user, permissions))
    }

    /// Create a user (superusers only)
    pub async fn create_user(&self, actor: &UserClaims, user: CreateUser) -> AppResult<UserInfo> {
        actor.require_superuser()?;
        let created = self.insert_user(user).await?;
        tracing::info!("User {} created by {}", created.username, actor.sub);
        Ok(created)
    }

    async fn insert_user(&self, user: CreateUser) -> AppResult<UserInfo> {
        if self.repository.users.username_exists(&user.username).await? {
            return Err(AppError::Conflict(format!(
                "Username {} already exists",
                user.username
            )));
        }

        let hash = hash_password(&user.password)?;
        let created = self.repository.users.create(&user, &hash).await?;
        let permissions = self.repository.users.get_permissions(created.id).await?;
        Ok(UserInfo::new(created, permissions))
    }

    /// Create the configured superuser when no user exists yet
    pub async fn bootstrap_admin(&self, admin: &BootstrapAdmin) -> AppResult<Option<UserInfo>> {
        if self.repository.users.count().await? > 0 {
            return Ok(None);
        }

        let created = self
            .insert_user(CreateUser {
                username: admin.username.clone(),
                password: admin.password.clone(),
                email: admin.email.clone(),
                first_name: None,
                last_name: None,
                is_superuser: true,
                permissions: Permission::ALL.to_vec(),
            })
            .await?;

        tracing::warn!("Created bootstrap superuser {}", created.username);
        Ok(Some(created))
    }

    /// Email a single-use reset link to every account with this address.
    /// Unknown addresses are not reported to the caller.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let users = self.repository.users.get_by_email(email).await?;
        if users.is_empty() {
            tracing::info!("Password reset requested for unknown address");
            return Ok(());
        }

        for user in users {
            self.send_reset_link(&user, email).await?;
        }
        Ok(())
    }

    async fn send_reset_link(&self, user: &User, email: &str) -> AppResult<()> {
        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(self.config.password_reset_hours as i64);

        self.repository.password_resets.purge_for_user(user.id).await?;
        self.repository
            .password_resets
            .create(&hash_reset_token(&token), user.id, expires_at)
            .await?;

        let link = self.email.password_reset_link(&token);
        if let Err(e) = self
            .email
            .send_password_reset(email, &user.username, &link, self.config.password_reset_hours)
            .await
        {
            tracing::error!("Could not send password reset to user {}: {}", user.id, e);
        }
        Ok(())
    }

    /// Set a new password with a reset token and end the user's sessions
    pub async fn confirm_password_reset(&self, token: &str, new_password: &str) -> AppResult<()> {
        if new_password.chars().count() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let hash = hash_password(new_password)?;
        let user_id = self
            .repository
            .password_resets
            .reset_password(&hash_reset_token(token), &hash)
            .await?
            .ok_or_else(|| AppError::Validation("Invalid or expired reset token".to_string()))?;

        tracing::info!("Password reset for user {}, sessions closed", user_id);
        Ok(())
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 32 random bytes, hex encoded
fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Only the digest of a reset token is stored
pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
