//! Runtime configuration
//!
//! Flags fall back to environment variables (after `.env` has been loaded),
//! then to the defaults below.

use crate::auth::jwt::{JwtHandler, DEFAULT_TTL_HOURS};
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "greetings")]
#[command(about = "Greetings API guarded by bearer-token authentication")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub server: ServerConfig,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a bcrypt hash for a password, for the compiled-in account list
    HashPassword {
        password: String,

        /// bcrypt work factor
        #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
        cost: u32,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "GREETINGS_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Shared secret used to sign and verify tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Token lifetime in hours
    #[arg(long, env = "JWT_TTL_HOURS", default_value_t = DEFAULT_TTL_HOURS)]
    pub token_ttl_hours: i64,
}

impl ServerConfig {
    /// Build the token codec, refusing to start without a usable secret
    pub fn jwt_handler(&self) -> Result<JwtHandler> {
        let secret = match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => secret,
            _ => bail!("JWT_SECRET must be set to a non-empty value"),
        };

        if self.token_ttl_hours <= 0 {
            bail!(
                "Token lifetime must be positive, got {}h",
                self.token_ttl_hours
            );
        }

        Ok(JwtHandler::with_ttl(
            secret,
            chrono::Duration::hours(self.token_ttl_hours),
        ))
    }
}
