use axum::{extract::Request, middleware::Next, Router};
use uuid::Uuid;

use crate::features::auth::model::Session;
use crate::features::profiles::models::Role;

pub fn session_with_role(role: Role) -> Session {
    Session {
        user_id: Uuid::new_v4(),
        email: Some(format!("{}@civiclens.test", role)),
        full_name: Some(format!("Test {}", role)),
        role,
    }
}

pub fn citizen_session() -> Session {
    session_with_role(Role::User)
}

pub fn authority_session() -> Session {
    session_with_role(Role::Authority)
}

pub fn admin_session() -> Session {
    session_with_role(Role::Admin)
}

/// Attach a fixed session to every request, standing in for the token middleware
pub fn with_session(router: Router, session: Session) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let session = session.clone();
            async move {
                request.extensions_mut().insert(session);
                next.run(request).await
            }
        },
    ))
}
