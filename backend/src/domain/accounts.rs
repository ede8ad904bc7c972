//! Sign-up and login.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::form::{NON_FIELD_ERRORS, REQUIRED, cleaned};
use super::ports::{AccountService, PasswordHasher, UserPersistenceError, UserRepository};
use super::{BoundForm, Error, FormErrors, FormOutcome, NewPassword, User, UserId, Username};

/// Reported when the username is already registered.
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Reported when credentials do not match any account.
pub const INVALID_LOGIN: &str = "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Raw sign-up form submission.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SignupInput {
    /// Desired login name.
    pub username: Option<String>,
    /// Password.
    #[schema(value_type = Option<String>)]
    pub password1: Option<Zeroizing<String>>,
    /// Password confirmation.
    #[schema(value_type = Option<String>)]
    pub password2: Option<Zeroizing<String>>,
}

/// Raw login form submission.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginInput {
    /// Login name.
    pub username: Option<String>,
    /// Password.
    #[schema(value_type = Option<String>)]
    pub password: Option<Zeroizing<String>>,
}

impl LoginInput {
    fn to_form(&self) -> BoundForm {
        match &self.username {
            Some(username) => BoundForm::empty().with_value("username", username.clone()),
            None => BoundForm::empty(),
        }
    }
}

impl SignupInput {
    fn to_form(&self) -> BoundForm {
        match &self.username {
            Some(username) => BoundForm::empty().with_value("username", username.clone()),
            None => BoundForm::empty(),
        }
    }

    fn validate(&self) -> Result<(Username, NewPassword), FormErrors> {
        let mut errors = FormErrors::new();

        let username = match cleaned(self.username.as_deref()) {
            None => {
                errors.add("username", REQUIRED);
                None
            }
            Some(raw) => Username::for_signup(raw)
                .map_err(|err| errors.add("username", err.to_string()))
                .ok(),
        };

        let password1 = self.password1.as_deref().filter(|p| !p.is_empty());
        let password2 = self.password2.as_deref().filter(|p| !p.is_empty());
        if password1.is_none() {
            errors.add("password1", REQUIRED);
        }
        if password2.is_none() {
            errors.add("password2", REQUIRED);
        }
        let password = match (password1, password2) {
            (Some(first), Some(second)) => NewPassword::confirm(first, second)
                .map_err(|violations| {
                    for violation in violations {
                        errors.add("password2", violation.to_string());
                    }
                })
                .ok(),
            _ => None,
        };

        match (username, password) {
            (Some(username), Some(password)) if errors.is_empty() => Ok((username, password)),
            _ => Err(errors),
        }
    }
}

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

/// Account use-cases backed by a [`UserRepository`] and a [`PasswordHasher`].
#[derive(Clone)]
pub struct AccountServiceImpl<U: ?Sized, H: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U: ?Sized, H: ?Sized> AccountServiceImpl<U, H> {
    /// Create a service over the given repository and hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

// Argon2 runs for tens of milliseconds per call, so it goes to the blocking
// pool rather than an async worker.
impl<U: ?Sized, H> AccountServiceImpl<U, H>
where
    H: PasswordHasher + ?Sized + 'static,
{
    async fn hash_password(&self, password: &str) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }

    async fn verify_password(&self, password: &str, stored_hash: String) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))
    }
}

#[async_trait]
impl<U, H> AccountService for AccountServiceImpl<U, H>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized + 'static,
{
    async fn signup(&self, input: SignupInput) -> Result<FormOutcome<User>, Error> {
        let form = input.to_form();
        let (username, password) = match input.validate() {
            Ok(valid) => valid,
            Err(errors) => return Ok(FormOutcome::Invalid(form.with_errors(errors))),
        };

        let existing = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            return Ok(FormOutcome::Invalid(form.with_error("username", USERNAME_TAKEN)));
        }

        let hash = self.hash_password(password.expose()).await?;
        let user = User::new(UserId::random(), username);
        match self.users.insert(&user, &hash).await {
            Ok(()) => {
                info!(user_id = %user.id(), "account created");
                Ok(FormOutcome::Saved(user))
            }
            Err(UserPersistenceError::DuplicateUsername { .. }) => {
                Ok(FormOutcome::Invalid(form.with_error("username", USERNAME_TAKEN)))
            }
            Err(error) => Err(map_repository_error(error)),
        }
    }

    async fn login(&self, input: LoginInput) -> Result<FormOutcome<User>, Error> {
        let mut errors = FormErrors::new();
        let username = cleaned(input.username.as_deref());
        let password = input.password.as_deref().filter(|p| !p.is_empty());
        if username.is_none() {
            errors.add("username", REQUIRED);
        }
        if password.is_none() {
            errors.add("password", REQUIRED);
        }
        let (Some(username), Some(password)) = (username, password) else {
            return Ok(FormOutcome::Invalid(input.to_form().with_errors(errors)));
        };

        let invalid =
            || FormOutcome::Invalid(input.to_form().with_error(NON_FIELD_ERRORS, INVALID_LOGIN));
        let Ok(username) = Username::new(username) else {
            return Ok(invalid());
        };
        let stored = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_repository_error)?;
        let verified = match stored {
            Some(stored) => self
                .verify_password(password, stored.password_hash)
                .await?
                .then_some(stored.user),
            None => None,
        };
        match verified {
            Some(user) => Ok(FormOutcome::Saved(user)),
            None => {
                warn!(username = %username, "login rejected");
                Ok(invalid())
            }
        }
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
