//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, EmptyData};
use super::middleware::{auth_middleware, optional_auth_middleware, AuthState};
use super::modules::request_id::request_id_middleware;
use super::modules::{auth, bookings, dashboard, health, listings, metrics};
use crate::application::{BookingService, DashboardService, ListingService, UserService};
use crate::infrastructure::crypto::jwt::JwtConfig;

/// Application services the HTTP layer delegates to
#[derive(Clone)]
pub struct ApiServices {
    pub users: Arc<UserService>,
    pub listings: Arc<ListingService>,
    pub bookings: Arc<BookingService>,
    pub dashboard: Arc<DashboardService>,
}

/// State shared by every `/api/v1/listings/*` route. The booking request
/// endpoint lives under a listing, so the router carries both services and
/// each handler extracts its own state through `FromRef`.
#[derive(Clone)]
pub struct ListingUnifiedState {
    pub listings: Arc<ListingService>,
    pub bookings: Arc<BookingService>,
}

impl FromRef<ListingUnifiedState> for listings::ListingAppState {
    fn from_ref(s: &ListingUnifiedState) -> Self {
        listings::ListingAppState {
            listings: Arc::clone(&s.listings),
        }
    }
}

impl FromRef<ListingUnifiedState> for bookings::BookingAppState {
    fn from_ref(s: &ListingUnifiedState) -> Self {
        bookings::BookingAppState {
            bookings: Arc::clone(&s.bookings),
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by /api/v1/auth/login or /signup"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::signup,
        auth::login,
        auth::get_current_user,
        // Listings
        listings::list_listings,
        listings::get_listing,
        listings::create_listing,
        listings::update_listing,
        listings::delete_listing,
        // Reviews
        listings::add_review,
        listings::delete_review,
        // Bookings
        bookings::create_booking,
        bookings::my_bookings,
        bookings::cancel_booking,
        bookings::quote_booking,
        // Dashboard
        dashboard::get_dashboard,
        dashboard::update_booking_status,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            // Auth
            auth::LoginRequest,
            auth::SignupRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Listings
            crate::domain::ListingTag,
            listings::ImageDto,
            listings::GeometryDto,
            listings::ListingDto,
            listings::ReviewDto,
            listings::ListingDetailsDto,
            listings::ListingDeletionDto,
            listings::ListingRequest,
            listings::ReviewRequest,
            // Bookings
            bookings::BookingDto,
            bookings::CreateBookingRequest,
            bookings::PriceQuoteDto,
            bookings::RenterBookingDto,
            bookings::StatusCountsDto,
            bookings::MyBookingsResponse,
            bookings::RateInput,
            bookings::QuoteRequestDto,
            // Dashboard
            dashboard::OwnerBookingDto,
            dashboard::SkippedBookingDto,
            dashboard::DashboardResponse,
            dashboard::UpdateStatusRequest,
            dashboard::UpdateStatusResponse,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Authentication", description = "Signup, login (JWT) and the current account"),
        (name = "Listings", description = "Car listing catalogue and owner listing management"),
        (name = "Reviews", description = "Listing reviews"),
        (name = "Bookings", description = "Booking requests, renter history and price quotes"),
        (name = "Dashboard", description = "Owner view: incoming requests, approvals and income"),
    ),
    info(
        title = "CarCruise Rental API",
        version = "1.0.0",
        description = "REST API for car listings, booking requests and owner dashboards",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    services: ApiServices,
    jwt_config: JwtConfig,
    health_state: health::HealthState,
    metrics_handle: PrometheusHandle,
) -> Router {
    let middleware_state = AuthState { jwt_config };

    // ── Auth ───────────────────────────────────────────────────

    let auth_state = auth::AuthHandlerState {
        users: Arc::clone(&services.users),
    };

    let auth_public = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    let auth_protected = Router::new()
        .route("/me", get(auth::get_current_user))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ));

    let auth_routes = auth_public.merge(auth_protected).with_state(auth_state);

    // ── Listings (+ booking requests and reviews) ──────────────

    let listing_state = ListingUnifiedState {
        listings: Arc::clone(&services.listings),
        bookings: Arc::clone(&services.bookings),
    };

    // Anonymous browsing; a valid token adds the caller's booking panel.
    let listing_public = Router::new()
        .route("/", get(listings::list_listings))
        .route("/{id}", get(listings::get_listing))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            optional_auth_middleware,
        ));

    let listing_protected = Router::new()
        .route("/", post(listings::create_listing))
        .route(
            "/{id}",
            axum::routing::put(listings::update_listing).delete(listings::delete_listing),
        )
        .route("/{id}/book", post(bookings::create_booking))
        .route("/{id}/reviews", post(listings::add_review))
        .route("/{id}/reviews/{review_id}", delete(listings::delete_review))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ));

    let listing_routes = listing_public
        .merge(listing_protected)
        .with_state(listing_state);

    // ── Bookings ───────────────────────────────────────────────

    let booking_state = bookings::BookingAppState {
        bookings: Arc::clone(&services.bookings),
    };

    let booking_public = Router::new().route("/quote", post(bookings::quote_booking));

    let booking_protected = Router::new()
        .route("/mine", get(bookings::my_bookings))
        .route("/{id}", delete(bookings::cancel_booking))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ));

    let booking_routes = booking_public
        .merge(booking_protected)
        .with_state(booking_state);

    // ── Dashboard ──────────────────────────────────────────────

    let dashboard_routes = Router::new()
        .route("/", get(dashboard::get_dashboard))
        .route(
            "/update-booking-status",
            post(dashboard::update_booking_status),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(dashboard::DashboardAppState {
            dashboard: Arc::clone(&services.dashboard),
        });

    // ── Operational ────────────────────────────────────────────

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: metrics_handle,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/listings", listing_routes)
        .nest("/api/v1/bookings", booking_routes)
        .nest("/api/v1/dashboard", dashboard_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

// ── Tests ──────────────────────────────────────────────────────
