//! Authentication Middleware
//! Mission: Attach bearer-token identities to requests and gate protected routes

use crate::auth::{
    jwt::JwtHandler,
    models::AuthenticatedUser,
    user_store::UserDirectory,
};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{net::SocketAddr, sync::Arc};
use tracing::debug;

const BEARER_PREFIX: &str = "Bearer ";

/// Collaborators the auth filter needs, handed in at router construction
#[derive(Clone)]
pub struct AuthFilter {
    pub jwt_handler: Arc<JwtHandler>,
    pub users: Arc<dyn UserDirectory>,
}

impl AuthFilter {
    pub fn new(jwt_handler: Arc<JwtHandler>, users: Arc<dyn UserDirectory>) -> Self {
        Self { jwt_handler, users }
    }
}

/// Runs once per request. Resolves `Authorization: Bearer <token>` into an
/// [`AuthenticatedUser`] extension when the token checks out; otherwise the
/// request continues anonymously. Never rejects.
pub async fn jwt_auth_filter(
    State(filter): State<AuthFilter>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(|t| t.to_string());

    let Some(token) = token else {
        return next.run(req).await;
    };

    let email = match filter.jwt_handler.extract_subject(&token) {
        Ok(email) => email,
        Err(e) => {
            debug!("Ignoring bearer token: {}", e);
            return next.run(req).await;
        }
    };

    if req.extensions().get::<AuthenticatedUser>().is_none() {
        match filter.users.find_by_email(&email) {
            Ok(user) if filter.jwt_handler.is_valid(&token, &user) => {
                let client_ip = req
                    .extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip());
                debug!("Authenticated {} ({})", user.email, user.role);
                req.extensions_mut()
                    .insert(AuthenticatedUser::from_user(&user, client_ip));
            }
            Ok(user) => debug!("Token not valid for {}", user.email),
            Err(e) => debug!("Ignoring bearer token: {}", e),
        }
    }

    next.run(req).await
}

/// Route policy: only requests carrying an [`AuthenticatedUser`] get through
pub async fn require_authentication(req: Request, next: Next) -> Result<Response, AuthError> {
    if extract_identity(&req).is_none() {
        debug!("Rejecting anonymous request to {}", req.uri().path());
        return Err(AuthError::Unauthenticated);
    }

    Ok(next.run(req).await)
}

/// Identity attached by [`jwt_auth_filter`], if any
pub fn extract_identity(req: &Request) -> Option<&AuthenticatedUser> {
    req.extensions().get::<AuthenticatedUser>()
}

/// Auth error types
#[derive(Debug)]
pub enum AuthError {
    Unauthenticated,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                "Full authentication is required to access this resource",
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{
        models::{Role, User},
        user_store::UserStore,
    };
    use axum::{
        body::{to_bytes, Body},
        http::Request as HttpRequest,
        middleware,
        routing::get,
        Router,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    const SECRET: &str = "middleware-test-secret";

    fn create_test_user() -> User {
        User::new("alice@example.com", "hash", Role::Admin)
    }

    fn create_filter() -> AuthFilter {
        AuthFilter::new(
            Arc::new(JwtHandler::new(SECRET)),
            Arc::new(UserStore::new(vec![create_test_user()])),
        )
    }

    async fn whoami(req: Request) -> String {
        match extract_identity(&req) {
            Some(identity) => format!("{} {}", identity.email, identity.role),
            None => "anonymous".to_string(),
        }
    }

    fn filtered_app() -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(create_filter(), jwt_auth_filter))
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = HttpRequest::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_no_header_is_anonymous() {
        let (status, body) = call(filtered_app(), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let token = JwtHandler::new(SECRET).issue(&create_test_user()).unwrap();

        let (status, body) = call(filtered_app(), Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice@example.com ROLE_ADMIN");
    }

    #[tokio::test]
    async fn test_garbage_token_is_anonymous() {
        let (status, body) = call(filtered_app(), Some("Bearer not-a-jwt")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn test_other_schemes_are_anonymous() {
        let token = JwtHandler::new(SECRET).issue(&create_test_user()).unwrap();

        for value in [
            format!("bearer {}", token),
            format!("Basic {}", token),
            format!("Bearer{}", token),
            token.clone(),
        ] {
            let (_, body) = call(filtered_app(), Some(&value)).await;
            assert_eq!(body, "anonymous", "header {:?} should be ignored", value);
        }
    }

    #[tokio::test]
    async fn test_expired_token_is_anonymous() {
        let issued = Utc::now() - Duration::days(2);
        let token = JwtHandler::new(SECRET)
            .issue_at(&create_test_user(), issued)
            .unwrap();

        let (_, body) = call(filtered_app(), Some(&format!("Bearer {}", token))).await;
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn test_unknown_subject_is_anonymous() {
        let stranger = User::new("ghost@example.com", "hash", Role::User);
        let token = JwtHandler::new(SECRET).issue(&stranger).unwrap();

        let (_, body) = call(filtered_app(), Some(&format!("Bearer {}", token))).await;
        assert_eq!(body, "anonymous");
    }

    async fn attach_bob(mut req: Request, next: Next) -> Response {
        req.extensions_mut().insert(AuthenticatedUser {
            email: "bob@example.com".to_string(),
            role: Role::User,
            client_ip: None,
        });
        next.run(req).await
    }

    #[tokio::test]
    async fn test_existing_identity_is_kept() {
        let token = JwtHandler::new(SECRET).issue(&create_test_user()).unwrap();
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(create_filter(), jwt_auth_filter))
            .layer(middleware::from_fn(attach_bob));

        let (status, body) = call(app, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "bob@example.com ROLE_USER");
    }

    #[tokio::test]
    async fn test_require_authentication_rejects_anonymous() {
        let app = Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn(require_authentication))
            .layer(middleware::from_fn_with_state(create_filter(), jwt_auth_filter));

        let response = app
            .clone()
            .oneshot(HttpRequest::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let token = JwtHandler::new(SECRET).issue(&create_test_user()).unwrap();
        let (status, body) = call(app, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice@example.com ROLE_ADMIN");
    }

    #[test]
    fn test_extract_identity_from_request() {
        let mut req = HttpRequest::new(Body::empty());

        assert!(extract_identity(&req).is_none());

        req.extensions_mut().insert(AuthenticatedUser {
            email: "alice@example.com".to_string(),
            role: Role::Admin,
            client_ip: None,
        });

        let extracted = extract_identity(&req).unwrap();
        assert_eq!(extracted.email, "alice@example.com");
    }
}
