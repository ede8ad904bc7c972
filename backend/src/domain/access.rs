//! Ownership authorization.
//!
//! Every mutating or owner-only read resolves the requesting principal to one
//! of three outcomes before touching storage. Anonymous callers are sent to
//! log in; authenticated callers who do not own the object see the same
//! response as for a missing object, so existence is never disclosed.

use super::{Error, UserId};

/// Who is making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// No authenticated session.
    Anonymous,
    /// Session bound to this user.
    User(UserId),
}

impl Principal {
    /// The authenticated user id, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }

    /// `true` when a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

impl From<Option<UserId>> for Principal {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(Self::Anonymous, Self::User)
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Redirect to the login page, remembering the original URL.
    LoginRequired,
    /// Respond as though the object does not exist.
    NotFound,
    /// Proceed on behalf of this user.
    Proceed(UserId),
}

impl Access {
    /// Collapse a post-authentication outcome into a result.
    ///
    /// `LoginRequired` cannot occur once the caller is known to be logged
    /// in; if it does, it is reported as `Unauthorized`.
    pub fn into_result(self, what: &str) -> Result<UserId, Error> {
        match self {
            Self::Proceed(id) => Ok(id),
            Self::NotFound => Err(Error::not_found(format!("{what} not found"))),
            Self::LoginRequired => Err(Error::unauthorized("login required")),
        }
    }
}

/// Gate for actions that only need a logged-in user.
///
/// # Examples
/// ```
/// use ya_backend::domain::{require_authenticated, Access, Principal, UserId};
///
/// assert_eq!(require_authenticated(&Principal::Anonymous), Access::LoginRequired);
/// let id = UserId::random();
/// assert_eq!(require_authenticated(&Principal::User(id)), Access::Proceed(id));
/// ```
pub fn require_authenticated(principal: &Principal) -> Access {
    match principal {
        Principal::Anonymous => Access::LoginRequired,
        Principal::User(id) => Access::Proceed(*id),
    }
}

/// Gate for actions restricted to the owner of an object.
///
/// # Examples
/// ```
/// use ya_backend::domain::{authorize_owner, Access, Principal, UserId};
///
/// let owner = UserId::random();
/// let other = UserId::random();
/// assert_eq!(authorize_owner(&Principal::User(other), &owner), Access::NotFound);
/// assert_eq!(authorize_owner(&Principal::User(owner), &owner), Access::Proceed(owner));
/// ```
pub fn authorize_owner(principal: &Principal, owner: &UserId) -> Access {
    match principal {
        Principal::Anonymous => Access::LoginRequired,
        Principal::User(id) if id == owner => Access::Proceed(*id),
        Principal::User(_) => Access::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn owner() -> UserId {
        UserId::random()
    }

    #[rstest]
    fn anonymous_must_log_in_even_for_owned_objects(owner: UserId) {
        assert_eq!(
            authorize_owner(&Principal::Anonymous, &owner),
            Access::LoginRequired
        );
    }

    #[rstest]
    fn non_owner_sees_not_found(owner: UserId) {
        let intruder = Principal::User(UserId::random());
        let access = authorize_owner(&intruder, &owner);
        assert_eq!(access, Access::NotFound);
        let err = access.into_result("note").expect_err("denied");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "note not found");
    }

    #[rstest]
    fn owner_proceeds(owner: UserId) {
        let access = authorize_owner(&Principal::User(owner), &owner);
        assert_eq!(access.into_result("note"), Ok(owner));
    }

    #[rstest]
    fn principal_from_optional_id(owner: UserId) {
        assert_eq!(Principal::from(None), Principal::Anonymous);
        let principal = Principal::from(Some(owner));
        assert!(principal.is_authenticated());
        assert_eq!(principal.user_id(), Some(&owner));
    }
}
