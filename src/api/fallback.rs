//! Fallback Route
//! Mission: Keep unmatched paths behind the authentication gate

use axum::http::StatusCode;

/// Unmatched path. Mounted behind the required-authentication policy, so
/// anonymous callers see 401 and only authenticated ones learn it is a 404.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
