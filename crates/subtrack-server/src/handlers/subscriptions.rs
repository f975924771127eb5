//! Subscription handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, AppState, SuccessResponse};
use subtrack_core::{
    Clock, Database, MonthlyCost, NewSubscription, Pagination, Subscription, SubscriptionPage,
    SubscriptionQuery, SubscriptionService,
};

/// Query params shared by list, sum and monthly
#[derive(Debug, Deserialize)]
pub struct SubscriptionQueryParams {
    #[serde(default)]
    pub user_id: String,
    pub service_name: Option<String>,
    /// First month of the window (MM-YYYY)
    pub start_date: Option<String>,
    /// Last month of the window (MM-YYYY)
    pub end_date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SubscriptionQueryParams {
    fn parse(&self) -> subtrack_core::Result<SubscriptionQuery> {
        SubscriptionQuery::parse(
            &self.user_id,
            self.service_name.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )
    }
}

#[derive(Serialize)]
pub struct SumResponse {
    pub sum: i64,
}

#[derive(Serialize)]
pub struct MonthlyResponse {
    pub months: Vec<MonthlyCost>,
    pub total: i64,
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("invalid subscription id"))
}

fn service(state: &AppState) -> SubscriptionService<'_, Database, dyn Clock> {
    SubscriptionService::new(&state.db, state.clock.as_ref())
}

/// POST /api/subscriptions - Create a subscription
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewSubscription>,
) -> Result<(StatusCode, Json<Subscription>), AppError> {
    let sub = service(&state).create(&body)?;
    Ok((StatusCode::CREATED, Json(sub)))
}

/// GET /api/subscriptions/:id - Get a single subscription
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Subscription>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(service(&state).get(id)?))
}

/// PUT /api/subscriptions/:id - Replace a subscription's fields
pub async fn update_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<NewSubscription>,
) -> Result<Json<Subscription>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(service(&state).update(id, &body)?))
}

/// DELETE /api/subscriptions/:id - Delete a subscription
pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_id(&id)?;
    service(&state).delete(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/subscriptions/list - One ordered page of matching subscriptions
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubscriptionQueryParams>,
) -> Result<Json<SubscriptionPage>, AppError> {
    let query = params.parse()?;

    // Input validation: clamp pagination parameters
    let pagination = Pagination::clamped(params.limit, params.offset);

    let page = service(&state).list(&query.filter(), pagination)?;
    Ok(Json(page))
}

/// GET /api/subscriptions/sum - Total cost over the window
pub async fn sum_subscriptions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubscriptionQueryParams>,
) -> Result<Json<SumResponse>, AppError> {
    let query = params.parse()?;
    let sum = service(&state).sum(&query.filter())?;
    Ok(Json(SumResponse { sum }))
}

/// GET /api/subscriptions/monthly - Per-month costs behind the sum
pub async fn monthly_costs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubscriptionQueryParams>,
) -> Result<Json<MonthlyResponse>, AppError> {
    let query = params.parse()?;
    let months = service(&state).monthly(&query.filter())?;
    let total = months.iter().map(|m| m.cost).sum();
    Ok(Json(MonthlyResponse { months, total }))
}
