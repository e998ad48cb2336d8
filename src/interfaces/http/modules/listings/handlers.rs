//! Listing API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    ListingDeletionDto, ListingDetailsDto, ListingDto, ListingQuery, ListingRequest, ReviewDto,
    ReviewRequest,
};
use crate::application::ListingService;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct ListingAppState {
    pub listings: Arc<ListingService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/listings",
    tag = "Listings",
    params(ListingQuery),
    responses(
        (status = 200, description = "Matching listings", body = ApiResponse<Vec<ListingDto>>)
    )
)]
pub async fn list_listings(
    State(state): State<ListingAppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ApiResponse<Vec<ListingDto>>>, ApiError<Vec<ListingDto>>> {
    let listings = state
        .listings
        .index(&query.into_filter())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        listings.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    tag = "Listings",
    params(("id" = String, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing with reviews and the caller's booking state", body = ApiResponse<ListingDetailsDto>),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    State(state): State<ListingAppState>,
    Path(id): Path<String>,
    viewer: Option<Extension<AuthenticatedUser>>,
) -> Result<Json<ApiResponse<ListingDetailsDto>>, ApiError<ListingDetailsDto>> {
    let viewer = viewer.as_ref().map(|Extension(u)| u.user_id.as_str());
    let details = state.listings.show(&id, viewer).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(details.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/listings",
    tag = "Listings",
    security(("bearer_auth" = [])),
    request_body = ListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ApiResponse<ListingDto>),
        (status = 400, description = "Validation error or unknown location"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_listing(
    State(state): State<ListingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ListingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ListingDto>>), ApiError<ListingDto>> {
    let listing = state
        .listings
        .create(&user.user_id, request.into())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(listing.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/listings/{id}",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Listing ID")),
    request_body = ListingRequest,
    responses(
        (status = 200, description = "Listing updated", body = ApiResponse<ListingDto>),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn update_listing(
    State(state): State<ListingAppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ListingRequest>,
) -> Result<Json<ApiResponse<ListingDto>>, ApiError<ListingDto>> {
    let listing = state
        .listings
        .update(&id, &user.user_id, request.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(listing.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing, its bookings and reviews deleted", body = ApiResponse<ListingDeletionDto>),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn delete_listing(
    State(state): State<ListingAppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<ListingDeletionDto>>, ApiError<ListingDeletionDto>> {
    let deletion = state
        .listings
        .delete(&id, &user.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(deletion.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Listing ID")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review added", body = ApiResponse<ReviewDto>),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn add_review(
    State(state): State<ListingAppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewDto>>), ApiError<ReviewDto>> {
    let review = state
        .listings
        .add_review(&id, &user.user_id, request.rating, &request.comment)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(review.into()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}/reviews/{review_id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Listing ID"),
        ("review_id" = String, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<ListingAppState>,
    Path((id, review_id)): Path<(String, String)>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError<EmptyData>> {
    state
        .listings
        .delete_review(&id, &review_id, &user.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
