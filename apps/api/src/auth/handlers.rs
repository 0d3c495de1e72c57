use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::capabilities::Capabilities;
use crate::auth::session::Session;

#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub capabilities: Capabilities,
}

/// GET /api/v1/me
pub async fn handle_me(session: Session) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: session.user_id,
        email: session.email,
        capabilities: session.capabilities,
    })
}
