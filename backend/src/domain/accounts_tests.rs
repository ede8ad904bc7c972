//! Tests for sign-up and login.

use std::sync::Arc;

use rstest::rstest;
use zeroize::Zeroizing;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository, StoredUser};

fn make_service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
) -> AccountServiceImpl<MockUserRepository, MockPasswordHasher> {
    AccountServiceImpl::new(Arc::new(users), Arc::new(hasher))
}

fn secret(value: &str) -> Option<Zeroizing<String>> {
    Some(Zeroizing::new(value.to_owned()))
}

fn signup(username: &str, password1: &str, password2: &str) -> SignupInput {
    SignupInput {
        username: Some(username.to_owned()),
        password1: secret(password1),
        password2: secret(password2),
    }
}

fn login(username: &str, password: &str) -> LoginInput {
    LoginInput {
        username: Some(username.to_owned()),
        password: secret(password),
    }
}

fn stored(username: &str) -> StoredUser {
    StoredUser {
        user: User::new(
            UserId::random(),
            Username::new(username).expect("valid username"),
        ),
        password_hash: "hashed".to_owned(),
    }
}

#[tokio::test]
async fn signup_hashes_password_and_stores_user() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().returning(|_| Ok(None));
    users
        .expect_insert()
        .times(1)
        .returning(|user, hash| {
            assert_eq!(user.username().as_str(), "reader");
            assert_eq!(hash, "hashed:correct horse");
            Ok(())
        });
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|password| Ok(format!("hashed:{password}")));

    let service = make_service(users, hasher);
    let user = service
        .signup(signup("reader", "correct horse", "correct horse"))
        .await
        .expect("signup succeeds")
        .saved()
        .expect("account created");

    assert_eq!(user.username().as_str(), "reader");
}

#[tokio::test]
async fn signup_rejects_taken_username() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(|name| Ok(Some(stored(name.as_str()))));
    users.expect_insert().never();
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().never();

    let service = make_service(users, hasher);
    let form = service
        .signup(signup("reader", "correct horse", "correct horse"))
        .await
        .expect("signup succeeds")
        .invalid()
        .expect("form rejected");

    assert_eq!(form.errors().field("username"), [USERNAME_TAKEN]);
    assert_eq!(form.value("username"), Some("reader"));
}

#[tokio::test]
async fn signup_reports_insert_race_as_taken_username() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().returning(|_| Ok(None));
    users
        .expect_insert()
        .returning(|user, _| Err(UserPersistenceError::duplicate_username(user.username().as_str())));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().returning(|_| Ok("hash".to_owned()));

    let service = make_service(users, hasher);
    let form = service
        .signup(signup("reader", "correct horse", "correct horse"))
        .await
        .expect("signup succeeds")
        .invalid()
        .expect("form rejected");

    assert_eq!(form.errors().field("username"), [USERNAME_TAKEN]);
}

#[rstest]
#[case::mismatch(signup("reader", "correct horse", "battery staple"), "password2")]
#[case::short_password(signup("reader", "1234", "1234"), "password2")]
#[case::spaces_in_username(signup("two words", "correct horse", "correct horse"), "username")]
#[case::missing_username(SignupInput { username: None, ..signup("", "correct horse", "correct horse") }, "username")]
#[tokio::test]
async fn signup_rejects_invalid_input_before_storage(
    #[case] input: SignupInput,
    #[case] field: &str,
) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().never();
    users.expect_insert().never();

    let service = make_service(users, MockPasswordHasher::new());
    let form = service
        .signup(input)
        .await
        .expect("signup succeeds")
        .invalid()
        .expect("form rejected");

    assert!(!form.errors().field(field).is_empty(), "{field} has errors");
}

#[tokio::test]
async fn login_returns_user_for_matching_password() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .times(1)
        .returning(|name| Ok(Some(stored(name.as_str()))));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .times(1)
        .returning(|password, hash| password == "correct horse" && hash == "hashed");

    let service = make_service(users, hasher);
    let user = service
        .login(login("Username Username", "correct horse"))
        .await
        .expect("login succeeds")
        .saved()
        .expect("credentials accepted");

    assert_eq!(user.username().as_str(), "Username Username");
}

#[rstest]
#[case::unknown_user(None)]
#[case::wrong_password(Some("reader"))]
#[tokio::test]
async fn login_rejects_bad_credentials_with_form_error(#[case] known: Option<&'static str>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(move |_| Ok(known.map(stored)));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(|_, _| false);

    let service = make_service(users, hasher);
    let form = service
        .login(login("reader", "wrong"))
        .await
        .expect("login succeeds")
        .invalid()
        .expect("credentials refused");

    assert_eq!(form.errors().field(NON_FIELD_ERRORS), [INVALID_LOGIN]);
    assert_eq!(form.value("username"), Some("reader"));
}

#[tokio::test]
async fn login_requires_both_fields() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().never();

    let service = make_service(users, MockPasswordHasher::new());
    let form = service
        .login(LoginInput::default())
        .await
        .expect("login succeeds")
        .invalid()
        .expect("form rejected");

    assert_eq!(form.errors().field("username"), [REQUIRED]);
    assert_eq!(form.errors().field("password"), [REQUIRED]);
}

#[tokio::test]
async fn find_user_maps_connection_failure() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|_| Err(UserPersistenceError::connection("refused")));

    let service = make_service(users, MockPasswordHasher::new());
    let error = service
        .find_user(&UserId::random())
        .await
        .expect_err("failure surfaces");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
