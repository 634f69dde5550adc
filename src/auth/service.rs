// Authentication business logic

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, Role, User, UserResponse},
    password::PasswordService,
    policy::{authorize_role, Action, Caller},
    repository::{TokenRepository, UserRepository},
    token::TokenService,
};

/// Process-wide count of admin accounts, seeded once at boot from the
/// database and never reset. The very first admin registration in the
/// system's lifetime is granted Admin directly; every later request for the
/// Admin role is stored as PendingAdmin awaiting approval.
static ADMIN_COUNT: OnceLock<AtomicU64> = OnceLock::new();

/// Seed the admin bootstrap counter. Called once during startup, before the
/// server accepts requests.
pub fn seed_admin_bootstrap(count: u64) {
    // First seed wins; later calls are no-ops.
    ADMIN_COUNT.get_or_init(|| AtomicU64::new(count));
}

/// Decide which role an admin-role registration receives, atomically
/// claiming the first-admin slot when it is still free.
fn admin_disposition() -> Role {
    let counter = ADMIN_COUNT.get_or_init(|| AtomicU64::new(0));
    if counter
        .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
    {
        Role::Admin
    } else {
        Role::PendingAdmin
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    token_repository: TokenRepository,
    token_service: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        user_repository: UserRepository,
        token_repository: TokenRepository,
        token_service: TokenService,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            token_service,
        }
    }

    /// Register a new user
    ///
    /// Validates password strength, checks email uniqueness, hashes the
    /// password and stores the user. Admin role requests go through the
    /// bootstrap disposition above.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        phone: Option<&str>,
        requested_role: Option<Role>,
    ) -> Result<AuthResponse, AuthError> {
        PasswordService::validate_password_strength(password)?;

        if self.user_repository.email_exists(email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let role = match requested_role.unwrap_or_default() {
            Role::Admin | Role::PendingAdmin => {
                let granted = admin_disposition();
                info!("Admin registration for {} resolved to {}", email, granted);
                granted
            }
            other => other,
        };

        let password_hash = PasswordService::hash_password(password)?;
        let user = self
            .user_repository
            .create_user(email, &password_hash, name, phone.unwrap_or(""), role)
            .await?;

        info!("Registered user {} with role {}", user.email, user.role);
        self.issue_tokens(user).await
    }

    /// Authenticate a user and issue a token pair
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_tokens(user).await
    }

    /// Rotate a refresh token: verify the old one, invalidate it and issue a
    /// fresh pair
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.token_service.validate_refresh_token(refresh_token)?;

        let stored = self
            .token_repository
            .verify_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let user = self
            .user_repository
            .find_by_id(stored.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        // Claims and stored row must agree on the user
        if claims.sub != user.id {
            return Err(AuthError::InvalidToken);
        }

        self.token_repository.invalidate_token(refresh_token).await?;

        // Opportunistic housekeeping; a failure never blocks the refresh
        if let Err(e) = self.token_repository.delete_expired_tokens().await {
            warn!("Failed to purge expired refresh tokens: {}", e);
        }

        self.issue_tokens(user).await
    }

    /// Invalidate a refresh token
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.token_repository.invalidate_token(refresh_token).await
    }

    /// Look up the current user's profile
    pub async fn get_current_user(&self, user_id: i32) -> Result<UserResponse, AuthError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        Ok(user.into())
    }

    /// List every account (admin only)
    pub async fn list_users(&self, caller: &Caller) -> Result<Vec<UserResponse>, AuthError> {
        authorize_role(caller, Role::Admin, Action::ManageUsers)
            .map_err(|_| AuthError::Forbidden("Only admins may list users".to_string()))?;

        let users = self.user_repository.list_users().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Grant Admin to a pending admin request (admin only).
    ///
    /// Tokens the user already holds keep their old role claim until they
    /// expire; the promotion takes effect on the next login or refresh.
    pub async fn approve_admin(
        &self,
        caller: &Caller,
        user_id: i32,
    ) -> Result<UserResponse, AuthError> {
        authorize_role(caller, Role::Admin, Action::ManageUsers)
            .map_err(|_| AuthError::Forbidden("Only admins may approve admins".to_string()))?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.role != Role::PendingAdmin {
            return Err(AuthError::ValidationError(format!(
                "User is {} and has no pending admin request",
                user.role
            )));
        }

        let updated = self
            .user_repository
            .update_role(user.id, Role::Admin)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        info!("Admin request for {} approved by {}", updated.email, caller.email);
        Ok(updated.into())
    }

    /// Demote an admin, or reject a pending request, back to passenger
    /// (admin only). Admins cannot revoke themselves.
    pub async fn revoke_admin(
        &self,
        caller: &Caller,
        user_id: i32,
    ) -> Result<UserResponse, AuthError> {
        authorize_role(caller, Role::Admin, Action::ManageUsers)
            .map_err(|_| AuthError::Forbidden("Only admins may revoke admins".to_string()))?;

        if caller.user_id == user_id {
            return Err(AuthError::Forbidden(
                "Admins may not revoke their own access".to_string(),
            ));
        }

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        match user.role {
            Role::Admin | Role::PendingAdmin => {}
            other => {
                return Err(AuthError::ValidationError(format!(
                    "User is {} and holds no admin access",
                    other
                )));
            }
        }

        let updated = self
            .user_repository
            .update_role(user.id, Role::Passenger)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        info!("Admin access for {} revoked by {}", updated.email, caller.email);
        Ok(updated.into())
    }

    async fn issue_tokens(&self, user: User) -> Result<AuthResponse, AuthError> {
        let (access_token, refresh_token) =
            self.token_service
                .generate_token_pair(user.id, &user.email, user.role)?;

        let expires_at = Utc::now() + Duration::days(7);
        self.token_repository
            .store_refresh_token(user.id, &refresh_token, expires_at)
            .await?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }
}
