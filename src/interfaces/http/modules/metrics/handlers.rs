//! Prometheus scrape endpoint
//!
//! Renders the process-wide `metrics-exporter-prometheus` recorder installed
//! at startup. Booking counters (`bookings_created_total`,
//! `booking_status_updates_total`, `income_skipped_bookings_total`) show up
//! here next to the HTTP series.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// `GET /metrics`, unauthenticated
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
