//! Registration, login and credential storage.
//!
//! Credentials are stored as `pbkdf2-sha256$<rounds>$<salt-hex>$<hash-hex>`.
//! Rows written by the first revision of the app hold the password verbatim;
//! those are still accepted once and re-hashed on the next successful login.

use crate::db::queries::{find_user_by_username, insert_user, update_user_password};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use sha2::Sha256;

const SCHEME: &str = "pbkdf2-sha256";
const ROUNDS: u32 = 10_000;
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;
const MAX_USERNAME_LEN: usize = 100;

/// Outcome of checking a password against a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Invalid,
    Valid,
    /// Correct, but stored in a legacy form and should be re-hashed.
    ValidNeedsUpgrade,
}

fn derive(password: &str, salt: &[u8], rounds: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut key);
    key
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    let key = derive(password, &salt, ROUNDS);
    format!(
        "{SCHEME}${ROUNDS}${}${}",
        hex::encode(salt),
        hex::encode(key)
    )
}

pub fn verify_password(password: &str, stored: &str) -> PasswordCheck {
    let Some(rest) = stored.strip_prefix(SCHEME).and_then(|r| r.strip_prefix('$')) else {
        // plaintext row from the first revision
        return if stored == password {
            PasswordCheck::ValidNeedsUpgrade
        } else {
            PasswordCheck::Invalid
        };
    };

    let parts: Vec<&str> = rest.split('$').collect();
    let [rounds, salt, hash] = parts.as_slice() else {
        return PasswordCheck::Invalid;
    };

    let (Ok(rounds), Ok(salt), Ok(expected)) =
        (rounds.parse::<u32>(), hex::decode(salt), hex::decode(hash))
    else {
        return PasswordCheck::Invalid;
    };

    if expected.len() != KEY_LEN {
        return PasswordCheck::Invalid;
    }

    if derive(password, &salt, rounds).as_slice() != expected.as_slice() {
        PasswordCheck::Invalid
    } else if rounds < ROUNDS {
        PasswordCheck::ValidNeedsUpgrade
    } else {
        PasswordCheck::Valid
    }
}

fn validate_credentials(username: &str, password: &str) -> AppResult<()> {
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(())
}

pub struct AuthLogic;

impl AuthLogic {
    /// Create a user. Fails with `UsernameTaken` when the name is in use.
    pub fn register(pool: &mut DbPool, username: &str, password: &str) -> AppResult<i64> {
        validate_credentials(username, password)?;

        if find_user_by_username(&pool.conn, username)?.is_some() {
            return Err(AppError::UsernameTaken);
        }

        // The UNIQUE constraint still decides when two registrations race.
        match insert_user(&pool.conn, username, &hash_password(password)) {
            Err(e) if e.is_constraint_violation() => Err(AppError::UsernameTaken),
            other => other,
        }
    }

    /// Exact username match plus a matching password, or `InvalidCredentials`.
    pub fn login(pool: &mut DbPool, username: &str, password: &str) -> AppResult<User> {
        let user = find_user_by_username(&pool.conn, username)?
            .ok_or(AppError::InvalidCredentials)?;

        match verify_password(password, &user.password) {
            PasswordCheck::Invalid => Err(AppError::InvalidCredentials),
            PasswordCheck::Valid => Ok(user),
            PasswordCheck::ValidNeedsUpgrade => {
                let credential = hash_password(password);
                update_user_password(&pool.conn, user.id, &credential)?;
                tracing::info!(user_id = user.id, "upgraded stored credential");
                Ok(User {
                    password: credential,
                    ..user
                })
            }
        }
    }

    /// Resolve a username to its id (CLI commands act on behalf of a user).
    pub fn user_id(pool: &DbPool, username: &str) -> AppResult<i64> {
        find_user_by_username(&pool.conn, username)?
            .map(|u| u.id)
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))
    }
}
