use crate::core::error::AppError;
use crate::features::auth::SessionResolver;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        // Parse origins into HeaderValue
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(auth_header) = auth_header {
                if let Some(encoded) = auth_header.strip_prefix("Basic ") {
                    if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                        if let Ok(creds) = String::from_utf8(decoded) {
                            if creds == *credentials {
                                return Ok(next.run(req).await);
                            }
                        }
                    }
                }
            }

            let mut response = Response::new(Body::from("Unauthorized"));
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"Swagger UI\""),
            );

            Err(response)
        })
    }
}

/// Resolve the caller's session from `Authorization: Bearer <jwt>`.
///
/// No header means an anonymous request; route guards decide what anonymous
/// callers may reach. A header that is present but unusable is rejected here.
pub async fn session_middleware(
    State(resolver): State<Arc<SessionResolver>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(next.run(req).await);
    };

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Invalid authorization header format".to_string())
        })?;

    let session = resolver.resolve(token).await?;
    tracing::debug!(user_id = %session.user_id, role = %session.role, "Session resolved");

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::{JwtValidator, SessionResolver};
    use crate::features::profiles::models::Role;
    use crate::features::profiles::ProfileService;
    use crate::modules::store::MemoryStore;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use axum_test::TestServer;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use std::time::Duration;

    const SECRET: &str = "middleware-test-secret";
    const ISSUER: &str = "https://auth.civiclens.test";

    async fn whoami(session: Option<crate::features::auth::model::Session>) -> String {
        session
            .map(|s| s.role.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    async fn server() -> (TestServer, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let validator = JwtValidator::with_secret(
            SECRET,
            ISSUER.to_string(),
            "authenticated".to_string(),
            Duration::from_secs(30),
        );
        let resolver = Arc::new(SessionResolver::new(
            validator,
            Arc::new(ProfileService::new(store.clone())),
        ));

        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(resolver, session_middleware));
        (TestServer::new(app).unwrap(), store)
    }

    fn bearer(user_id: Uuid) -> String {
        let claims = serde_json::json!({
            "sub": user_id.to_string(),
            "iss": ISSUER,
            "aud": "authenticated",
            "exp": chrono::Utc::now().timestamp() + 300,
        });
        let jwt = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {}", jwt)
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        let (server, _) = server().await;
        let response = server.get("/whoami").await;
        response.assert_status_ok();
        response.assert_text("anonymous");
    }

    #[tokio::test]
    async fn test_valid_token_carries_profile_role() {
        let (server, store) = server().await;
        let user_id = Uuid::new_v4();
        store.seed_profile(user_id, "Admin One", Role::Admin).await;

        let response = server
            .get("/whoami")
            .add_header(header::AUTHORIZATION, bearer(user_id))
            .await;
        response.assert_text("admin");
    }

    #[tokio::test]
    async fn test_non_bearer_header_is_rejected() {
        let (server, _) = server().await;
        let response = server
            .get("/whoami")
            .add_header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let (server, _) = server().await;
        let response = server
            .get("/whoami")
            .add_header(header::AUTHORIZATION, "Bearer nope")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_request_ids_are_uuid_v7() {
        let request = axum::http::Request::new(());
        let id = MakeRequestUuid.make_request_id(&request).unwrap();
        let parsed = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }
}
