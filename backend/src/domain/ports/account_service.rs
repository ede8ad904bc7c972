//! Driving port for sign-up and login.

use async_trait::async_trait;

use crate::domain::{Error, FormOutcome, LoginInput, SignupInput, User, UserId};

/// Account use-cases shared by both sites.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new account.
    async fn signup(&self, input: SignupInput) -> Result<FormOutcome<User>, Error>;

    /// Check credentials; invalid ones come back as a form error.
    async fn login(&self, input: LoginInput) -> Result<FormOutcome<User>, Error>;

    /// Resolve a session user id to an account, if it still exists.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
