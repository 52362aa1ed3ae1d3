//! HTTP Handlers
//! Mission: Greeting, fallback and health endpoints

pub mod fallback;
pub mod greetings;
pub mod health;

pub use fallback::not_found;
pub use greetings::{say_good_bye, say_hello};
pub use health::health_check;
