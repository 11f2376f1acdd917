use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{AccessDecisionDto, LifecycleDto};
use super::{evaluate, Lifecycle, RouteClass};
use crate::core::error::Result;
use crate::features::auth::model::Session;
use crate::shared::types::ApiResponse;

/// Evaluate the access policy for the caller against a route class
///
/// Anonymous callers are allowed; the decision tells them where to go.
#[utoipa::path(
    get,
    path = "/api/access/{route}",
    params(
        ("route" = RouteClass, Path, description = "browse, submit, console or admin")
    ),
    responses(
        (status = 200, description = "Access decision", body = ApiResponse<AccessDecisionDto>),
        (status = 400, description = "Unknown route class")
    ),
    tag = "policy"
)]
pub async fn check_access(
    session: Option<Session>,
    Path(route): Path<RouteClass>,
) -> Result<Json<ApiResponse<AccessDecisionDto>>> {
    let decision = evaluate(session.as_ref(), route);
    Ok(Json(ApiResponse::success(
        Some(AccessDecisionDto::new(route, decision)),
        None,
        None,
    )))
}

/// Status catalogue with allowed next statuses
#[utoipa::path(
    get,
    path = "/api/lifecycle",
    responses(
        (status = 200, description = "Complaint lifecycle", body = ApiResponse<LifecycleDto>),
    ),
    tag = "policy"
)]
pub async fn get_lifecycle(
    State(lifecycle): State<Lifecycle>,
) -> Result<Json<ApiResponse<LifecycleDto>>> {
    Ok(Json(ApiResponse::success(
        Some(LifecycleDto::from(lifecycle)),
        None,
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::policy::{routes, Lifecycle, TransitionMode};
    use crate::shared::test_helpers::{citizen_session, with_session};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server(mode: TransitionMode) -> TestServer {
        TestServer::new(routes::routes(Lifecycle::new(mode))).unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_console_redirects_to_sign_in() {
        let response = server(TransitionMode::Open).get("/api/access/console").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["allowed"], false);
        assert_eq!(body["data"]["redirect_to"], "/auth");
        assert_eq!(body["data"]["notice"], "Please sign in");
    }

    #[tokio::test]
    async fn test_anonymous_submit_names_the_action() {
        let body: Value = server(TransitionMode::Open)
            .get("/api/access/submit")
            .await
            .json();
        assert_eq!(body["data"]["redirect_to"], "/auth");
        assert_eq!(
            body["data"]["notice"],
            "Please sign in to submit a complaint"
        );
    }

    #[tokio::test]
    async fn test_user_admin_redirects_home() {
        let app = with_session(routes::routes(Lifecycle::default()), citizen_session());
        let server = TestServer::new(app).unwrap();

        let body: Value = server.get("/api/access/admin").await.json();
        assert_eq!(body["data"]["allowed"], false);
        assert_eq!(body["data"]["redirect_to"], "/");
        assert_eq!(body["data"]["notice"], "Access denied. Admin role required.");

        let submit: Value = server.get("/api/access/submit").await.json();
        assert_eq!(submit["data"]["allowed"], true);
        assert!(submit["data"]["redirect_to"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_route_class_is_rejected() {
        let response = server(TransitionMode::Open).get("/api/access/backstage").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lifecycle_reports_mode_and_locks() {
        let body: Value = server(TransitionMode::ForwardOnly)
            .get("/api/lifecycle")
            .await
            .json();

        assert_eq!(body["data"]["mode"], "forward_only");
        let statuses = body["data"]["statuses"].as_array().unwrap();
        assert_eq!(statuses.len(), 5);

        let resolved = statuses
            .iter()
            .find(|s| s["status"] == "RESOLVED")
            .unwrap();
        assert_eq!(resolved["terminal"], true);
        assert_eq!(resolved["next"].as_array().unwrap().len(), 0);
        assert_eq!(resolved["label"], "Resolved");
    }
}
