//! Authentication Manager
//! Mission: Check an email/password pair against the user directory

use crate::auth::{models::User, user_store::UserDirectory};
use std::sync::Arc;
use tracing::warn;

/// Cost-10 hash checked when the email is unknown, so a miss costs as much
/// as a wrong password.
const UNKNOWN_USER_HASH: &str = "$2a$10$u98UVvWxO3kXqlt1dP9gNeKmh3xmBj2UwJmitxO8HaK/i5vjXfZu6";

/// Login failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    InvalidCredentials,
}

impl std::fmt::Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginError::InvalidCredentials => write!(f, "Invalid email or password"),
        }
    }
}

impl std::error::Error for LoginError {}

/// Password-based authentication over a [`UserDirectory`]
#[derive(Clone)]
pub struct AuthenticationManager {
    users: Arc<dyn UserDirectory>,
}

impl AuthenticationManager {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Verify credentials. Unknown emails and wrong passwords are
    /// indistinguishable to the caller.
    ///
    /// Runs a bcrypt comparison, so call it off the async executor.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, LoginError> {
        let user = match self.users.find_by_email(email) {
            Ok(user) => user,
            Err(_) => {
                let _ = bcrypt::verify(password, UNKNOWN_USER_HASH);
                return Err(LoginError::InvalidCredentials);
            }
        };

        match bcrypt::verify(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => Err(LoginError::InvalidCredentials),
            Err(e) => {
                warn!("Stored hash for {} could not be checked: {}", user.email, e);
                Err(LoginError::InvalidCredentials)
            }
        }
    }
}
