//! User Storage
//! Mission: Serve the fixed set of application accounts

use crate::auth::models::{Role, User};
use tracing::debug;

/// Lookup miss in a [`UserDirectory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotFound {
    pub email: String,
}

impl std::fmt::Display for UserNotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No user was found for {}", self.email)
    }
}

impl std::error::Error for UserNotFound {}

/// Read-only user lookup handed to the auth filter, the authentication
/// manager and the login endpoint.
pub trait UserDirectory: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<User, UserNotFound>;
}

/// In-memory user storage, immutable after construction
#[derive(Debug, Clone)]
pub struct UserStore {
    users: Vec<User>,
}

impl UserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// The two compiled-in application accounts (password `12345` for both)
    pub fn with_default_users() -> Self {
        Self::new(vec![
            User::new(
                "admin@gmail.com",
                "$2a$10$u98UVvWxO3kXqlt1dP9gNeKmh3xmBj2UwJmitxO8HaK/i5vjXfZu6",
                Role::Admin,
            ),
            User::new(
                "user@gmail.com",
                "$2a$10$yzCRTNhP46MV4rmrYvSBvun5lHhCiuuvALdFNA.AKgMLDRfdIvAhq",
                Role::User,
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserDirectory for UserStore {
    fn find_by_email(&self, email: &str) -> Result<User, UserNotFound> {
        let found = self.users.iter().find(|user| user.email == email).cloned();
        if found.is_none() {
            debug!("User lookup missed: {}", email);
        }
        found.ok_or_else(|| UserNotFound {
            email: email.to_string(),
        })
    }
}
