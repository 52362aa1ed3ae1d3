//! Authentication Models
//! Mission: Define user, claim and identity data structures

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: Role,
}

impl User {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            role,
        }
    }
}

/// Single authority granted to a user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_USER")]
    User,
}

impl Role {
    pub fn as_authority(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::User => "ROLE_USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_authority())
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user email)
    pub role: Role,
    pub iat: i64, // issued-at, unix seconds
    pub exp: i64, // expiration, unix seconds
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct AuthenticationRequest {
    pub email: String,
    pub password: String,
}

/// Identity attached to a request once its bearer token has been accepted.
///
/// Lives in the request extensions for the lifetime of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
    pub role: Role,
    /// Peer address, when the server was started with connection info.
    pub client_ip: Option<IpAddr>,
}

impl AuthenticatedUser {
    pub fn from_user(user: &User, client_ip: Option<IpAddr>) -> Self {
        Self {
            email: user.email.clone(),
            role: user.role,
            client_ip,
        }
    }
}
