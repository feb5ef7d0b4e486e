use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::activity::DashboardStats;
use crate::routes::TenantId;
use crate::state::AppState;

/// GET /api/v1/dashboard/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    owner: TenantId,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(state.vectors.dashboard_stats(&owner.0).await?))
}
