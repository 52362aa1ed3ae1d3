//! Greeting Routes
//! Mission: Static responses behind the authentication gate

/// GET /api/v1/greetings
pub async fn say_hello() -> &'static str {
    "Hello from our API"
}

/// GET /api/v1/greetings/say-good-bye
pub async fn say_good_bye() -> &'static str {
    "Goodbye and see you later"
}
