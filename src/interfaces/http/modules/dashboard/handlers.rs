//! Owner dashboard handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{DashboardResponse, UpdateStatusRequest, UpdateStatusResponse};
use crate::application::DashboardService;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

pub const MSG_MISSING_FIELDS: &str = "Missing required fields: bookingId and status";

#[derive(Clone)]
pub struct DashboardAppState {
    pub dashboard: Arc<DashboardService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Owner's listings, booking requests and income", body = ApiResponse<DashboardResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_dashboard(
    State(state): State<DashboardAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError<DashboardResponse>> {
    let dashboard = state
        .dashboard
        .read_dashboard(&user.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(dashboard.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/dashboard/update-booking-status",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status applied or already set", body = ApiResponse<UpdateStatusResponse>),
        (status = 400, description = "Invalid status or transition not allowed"),
        (status = 404, description = "Booking not found or unauthorized")
    )
)]
pub async fn update_booking_status(
    State(state): State<DashboardAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<UpdateStatusResponse>>, ApiError<UpdateStatusResponse>> {
    let booking_id = request.booking_id.trim();
    let status = request.status.trim();
    if booking_id.is_empty() || status.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(MSG_MISSING_FIELDS)),
        ));
    }

    let update = state
        .dashboard
        .update_status(booking_id, &user.user_id, status)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(update.into())))
}
