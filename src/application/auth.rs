//! Registration and login use cases

use std::sync::Arc;

use crate::application::errors::ApplicationError;
use crate::domain::entities::User;
use crate::domain::errors::DomainError;
use crate::domain::repositories::IUserRepository;
use crate::domain::validation;
use crate::domain::value_objects::{UserId, Username};
use crate::infrastructure::auth::{JwtService, PasswordHasher};

/// A freshly authenticated session: the user plus their signed token.
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

/// Use case for registering a new account
pub struct RegisterUserUseCase {
    users: Arc<dyn IUserRepository>,
    password_hasher: Arc<PasswordHasher>,
    jwt_service: Arc<JwtService>,
}

impl RegisterUserUseCase {
    pub fn new(
        users: Arc<dyn IUserRepository>,
        password_hasher: Arc<PasswordHasher>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            password_hasher,
            jwt_service,
        }
    }

    pub async fn execute(
        &self,
        username: String,
        password: String,
    ) -> Result<AuthenticatedUser, ApplicationError> {
        let username = Username::new(username)
            .map_err(|reason| DomainError::InvalidUsername { reason })?;

        if !validation::is_valid_password(&password) {
            return Err(DomainError::InvalidPassword {
                reason: "Password must be at least 6 characters with at least one letter and one digit"
                    .to_string(),
            }
            .into());
        }

        if let Some(_existing) = self.users.find_by_username(username.as_str()).await? {
            return Err(DomainError::UsernameAlreadyExists {
                username: username.as_str().to_string(),
            }
            .into());
        }

        let password_hash = self.password_hasher.hash(password).await?;
        let user = User::new(UserId::generate(), username, password_hash);
        // The unique index still backstops racing registrations.
        self.users.create(&user).await?;

        let token = self
            .jwt_service
            .generate_token(user.user_id, user.username.as_str())?;

        tracing::info!(user_id = %user.user_id, "User registered");
        Ok(AuthenticatedUser { user, token })
    }
}

/// Use case for logging in with username and password
pub struct LoginUseCase {
    users: Arc<dyn IUserRepository>,
    password_hasher: Arc<PasswordHasher>,
    jwt_service: Arc<JwtService>,
}

impl LoginUseCase {
    pub fn new(
        users: Arc<dyn IUserRepository>,
        password_hasher: Arc<PasswordHasher>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            password_hasher,
            jwt_service,
        }
    }

    pub async fn execute(
        &self,
        username: String,
        password: String,
    ) -> Result<AuthenticatedUser, ApplicationError> {
        let username = validation::sanitize_string(&username);

        // Unknown user and wrong password collapse to the same error so the
        // response does not leak which usernames exist.
        let user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let verified = self
            .password_hasher
            .verify(password, user.password_hash.clone())
            .await?;
        if !verified {
            return Err(DomainError::InvalidCredentials.into());
        }

        let token = self
            .jwt_service
            .generate_token(user.user_id, user.username.as_str())?;

        tracing::info!(user_id = %user.user_id, "User logged in");
        Ok(AuthenticatedUser { user, token })
    }
}
