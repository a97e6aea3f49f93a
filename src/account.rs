//! Accounts
//!
//! Signup and login against the locally stored user list, with the session
//! held as a "current user" record. Passwords are kept in plain text, as
//! the original storefront does; this is not security-grade authentication.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{Storage, StorageError};

/// Errors raised by signup and login. All recoverable; the messages are
/// surfaced inline.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A required signup or login field was empty.
    #[error("Please complete required fields")]
    MissingFields,

    /// The password has fewer than four characters.
    #[error("Password must be at least 4 characters")]
    PasswordTooShort,

    /// The password and its confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Another user already holds this email or number.
    #[error("User with that email or number already exists")]
    AlreadyExists,

    /// No user matches the given email or number.
    #[error("User not found")]
    NotFound,

    /// The password does not match the stored one.
    #[error("Invalid password")]
    InvalidCredentials,

    /// The user list or session could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Registered user record. Created by signup; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Epoch milliseconds at signup time; unique per user.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Postal address; may be empty.
    #[serde(default)]
    pub address: String,

    /// Phone number; unique, matched exactly.
    pub number: String,

    /// Email; unique, matched case-insensitively.
    pub email: String,

    /// Plain-text password.
    pub password: String,
}

/// Public-safe record of the signed-in user. Never contains the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Id of the underlying user.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Email the user signed up with.
    pub email: String,

    /// Number the user signed up with.
    pub number: String,
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            number: user.number.clone(),
        }
    }
}

impl Session {
    /// Display initials: the first letters of the first two name words,
    /// upper-cased, or `"U"` when the name yields none.
    #[must_use]
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect();

        if initials.is_empty() {
            "U".to_owned()
        } else {
            initials
        }
    }
}

/// Signup form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    /// Display name (required).
    pub name: String,

    /// Postal address.
    pub address: String,

    /// Phone number (required).
    pub number: String,

    /// Email (required).
    pub email: String,

    /// Password (required, at least four characters).
    pub password: String,

    /// Password confirmation; must equal the password.
    pub confirm: String,
}

/// Find a user whose email (case-insensitively) or number (exactly)
/// matches `who`.
fn find_by_email_or_number<'a>(users: &'a [User], who: &str) -> Option<&'a User> {
    users
        .iter()
        .find(|user| user.email.to_lowercase() == who.to_lowercase() || user.number == who)
}

/// Register a new user and start a session for them.
///
/// The new user's id is the current time in epoch milliseconds. Exactly one
/// user is appended and one session established on success.
///
/// # Errors
///
/// Returns [`AccountError::MissingFields`], [`AccountError::PasswordTooShort`],
/// [`AccountError::PasswordMismatch`] or [`AccountError::AlreadyExists`] on
/// invalid input, or [`AccountError::Storage`] when persisting fails.
pub fn signup(
    storage: &mut Storage,
    form: &SignupForm,
    now: Timestamp,
) -> Result<Session, AccountError> {
    let name = form.name.trim();
    let number = form.number.trim();
    let email = form.email.trim();

    if name.is_empty() || number.is_empty() || email.is_empty() || form.password.is_empty() {
        return Err(AccountError::MissingFields);
    }

    if form.password.chars().count() < 4 {
        return Err(AccountError::PasswordTooShort);
    }

    if form.password != form.confirm {
        return Err(AccountError::PasswordMismatch);
    }

    let mut users = storage.users();

    // The original checks the new email and the new number against every
    // existing email and number, so a new email colliding with a stored
    // number is rejected too.
    if find_by_email_or_number(&users, email).is_some()
        || find_by_email_or_number(&users, number).is_some()
    {
        return Err(AccountError::AlreadyExists);
    }

    let user = User {
        id: now.as_millisecond(),
        name: name.to_owned(),
        address: form.address.trim().to_owned(),
        number: number.to_owned(),
        email: email.to_owned(),
        password: form.password.clone(),
    };
    let session = Session::from(&user);

    users.push(user);
    storage.set_users(&users)?;
    storage.set_session(&session)?;

    Ok(session)
}

/// Log in with an email or number and a password.
///
/// # Errors
///
/// Returns [`AccountError::MissingFields`] when either input is empty,
/// [`AccountError::NotFound`] when no user matches,
/// [`AccountError::InvalidCredentials`] on a password mismatch, or
/// [`AccountError::Storage`] when persisting the session fails.
pub fn login(storage: &mut Storage, who: &str, password: &str) -> Result<Session, AccountError> {
    let who = who.trim();

    if who.is_empty() || password.is_empty() {
        return Err(AccountError::MissingFields);
    }

    let users = storage.users();
    let user = find_by_email_or_number(&users, who).ok_or(AccountError::NotFound)?;

    if user.password != password {
        return Err(AccountError::InvalidCredentials);
    }

    let session = Session::from(user);
    storage.set_session(&session)?;

    Ok(session)
}

/// End the current session, if any.
///
/// # Errors
///
/// Returns a [`StorageError`] when the store cannot be persisted.
pub fn logout(storage: &mut Storage) -> Result<(), StorageError> {
    storage.clear_session()
}

/// The currently signed-in user, if any.
#[must_use]
pub fn current(storage: &Storage) -> Option<Session> {
    storage.session()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn form(name: &str, number: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            name: name.to_owned(),
            address: "1 High Street".to_owned(),
            number: number.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            confirm: password.to_owned(),
        }
    }

    #[test]
    fn signup_creates_one_user_and_one_session() -> TestResult {
        let mut storage = Storage::in_memory();
        let now = Timestamp::from_millisecond(1_700_000_000_000)?;

        let session = signup(
            &mut storage,
            &form("Ada Lovelace", "07000000001", "ada@example.com", "s3cret"),
            now,
        )?;

        assert_eq!(session.id, 1_700_000_000_000);
        assert_eq!(storage.users().len(), 1);
        assert_eq!(current(&storage), Some(session));

        Ok(())
    }

    #[test]
    fn signup_rejects_missing_fields() {
        let mut storage = Storage::in_memory();

        let result = signup(
            &mut storage,
            &form("Ada", "", "ada@example.com", "s3cret"),
            Timestamp::UNIX_EPOCH,
        );

        assert!(matches!(result, Err(AccountError::MissingFields)));
        assert!(storage.users().is_empty());
    }

    #[test]
    fn signup_rejects_short_password() {
        let mut storage = Storage::in_memory();

        let result = signup(
            &mut storage,
            &form("Ada", "07000000001", "ada@example.com", "abc"),
            Timestamp::UNIX_EPOCH,
        );

        assert!(matches!(result, Err(AccountError::PasswordTooShort)));
    }

    #[test]
    fn signup_rejects_mismatched_confirmation() {
        let mut storage = Storage::in_memory();
        let mut bad = form("Ada", "07000000001", "ada@example.com", "s3cret");
        bad.confirm = "other".to_owned();

        let result = signup(&mut storage, &bad, Timestamp::UNIX_EPOCH);

        assert!(matches!(result, Err(AccountError::PasswordMismatch)));
    }

    #[test]
    fn signup_rejects_duplicate_email_case_insensitively() -> TestResult {
        let mut storage = Storage::in_memory();

        signup(
            &mut storage,
            &form("Ada", "07000000001", "ada@example.com", "s3cret"),
            Timestamp::UNIX_EPOCH,
        )?;

        let result = signup(
            &mut storage,
            &form("Other Ada", "07000000002", "ADA@Example.COM", "s3cret"),
            Timestamp::UNIX_EPOCH,
        );

        assert!(matches!(result, Err(AccountError::AlreadyExists)));
        assert_eq!(storage.users().len(), 1);

        Ok(())
    }

    #[test]
    fn signup_rejects_duplicate_number() -> TestResult {
        let mut storage = Storage::in_memory();

        signup(
            &mut storage,
            &form("Ada", "07000000001", "ada@example.com", "s3cret"),
            Timestamp::UNIX_EPOCH,
        )?;

        let result = signup(
            &mut storage,
            &form("Grace", "07000000001", "grace@example.com", "s3cret"),
            Timestamp::UNIX_EPOCH,
        );

        assert!(matches!(result, Err(AccountError::AlreadyExists)));

        Ok(())
    }

    #[test]
    fn login_by_email_is_case_insensitive_and_excludes_password() -> TestResult {
        let mut storage = Storage::in_memory();

        signup(
            &mut storage,
            &form("Ada Lovelace", "07000000001", "ada@example.com", "s3cret"),
            Timestamp::UNIX_EPOCH,
        )?;
        logout(&mut storage)?;

        let session = login(&mut storage, "ADA@EXAMPLE.COM", "s3cret")?;

        assert_eq!(session.name, "Ada Lovelace");
        assert_eq!(current(&storage), Some(session.clone()));

        // The persisted session record carries no password field.
        let raw = serde_json::to_string(&session)?;

        assert!(!raw.contains("password"));
        assert!(!raw.contains("s3cret"));

        Ok(())
    }

    #[test]
    fn login_by_number_is_exact() -> TestResult {
        let mut storage = Storage::in_memory();

        signup(
            &mut storage,
            &form("Ada", "07000000001", "ada@example.com", "s3cret"),
            Timestamp::UNIX_EPOCH,
        )?;

        assert!(login(&mut storage, "07000000001", "s3cret").is_ok());
        assert!(matches!(
            login(&mut storage, "0700000000 1", "s3cret"),
            Err(AccountError::NotFound)
        ));

        Ok(())
    }

    #[test]
    fn login_unknown_user_and_wrong_password() -> TestResult {
        let mut storage = Storage::in_memory();

        signup(
            &mut storage,
            &form("Ada", "07000000001", "ada@example.com", "s3cret"),
            Timestamp::UNIX_EPOCH,
        )?;

        assert!(matches!(
            login(&mut storage, "nobody@example.com", "s3cret"),
            Err(AccountError::NotFound)
        ));
        assert!(matches!(
            login(&mut storage, "ada@example.com", "wrong"),
            Err(AccountError::InvalidCredentials)
        ));

        Ok(())
    }

    #[test]
    fn logout_clears_the_session() -> TestResult {
        let mut storage = Storage::in_memory();

        signup(
            &mut storage,
            &form("Ada", "07000000001", "ada@example.com", "s3cret"),
            Timestamp::UNIX_EPOCH,
        )?;
        logout(&mut storage)?;

        assert!(current(&storage).is_none());

        Ok(())
    }

    #[test]
    fn initials_come_from_the_first_two_words() {
        let session = Session {
            id: 1,
            name: "Ada King Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            number: "07000000001".to_owned(),
        };

        assert_eq!(session.initials(), "AK");

        let nameless = Session {
            name: String::new(),
            ..session
        };

        assert_eq!(nameless.initials(), "U");
    }
}
