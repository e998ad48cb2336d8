//! Booking API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    BookingDto, CreateBookingRequest, MyBookingsQuery, MyBookingsResponse, PriceQuoteDto,
    QuoteRequestDto,
};
use crate::application::services::StatusFilter;
use crate::application::BookingService;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct BookingAppState {
    pub bookings: Arc<BookingService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/book",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Listing ID")),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking request submitted", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid form or booking not allowed"),
        (status = 404, description = "Listing no longer exists")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    Path(listing_id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDto>>), ApiError<BookingDto>> {
    let booking = state
        .bookings
        .create(&listing_id, &user.user_id, request.into())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/mine",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(MyBookingsQuery),
    responses(
        (status = 200, description = "Caller's bookings, newest first", body = ApiResponse<MyBookingsResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_bookings(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<MyBookingsQuery>,
) -> Result<Json<ApiResponse<MyBookingsResponse>>, ApiError<MyBookingsResponse>> {
    let filter = StatusFilter::parse(query.status.as_deref());
    let mine = state
        .bookings
        .my_bookings(&user.user_id, filter)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(mine.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Pending request withdrawn"),
        (status = 400, description = "Booking is no longer pending"),
        (status = 403, description = "Caller is not the renter"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError<EmptyData>> {
    state
        .bookings
        .cancel(&id, &user.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/quote",
    tag = "Bookings",
    request_body = QuoteRequestDto,
    responses(
        (status = 200, description = "Price breakdown", body = ApiResponse<PriceQuoteDto>),
        (status = 400, description = "Unparseable rate or dates")
    )
)]
pub async fn quote_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<QuoteRequestDto>,
) -> Result<Json<ApiResponse<PriceQuoteDto>>, ApiError<PriceQuoteDto>> {
    let quote = state
        .bookings
        .quote(&request.into())
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(quote.into())))
}
