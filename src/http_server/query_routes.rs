//! Query HTTP Routes
//!
//! Endpoints for filtering records, listing distinct values and computing
//! price statistics. All of them read the shared, immutable [`DataStore`].

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json, Router,
};

use super::errors::{ApiError, ApiResult};
use super::extract::{ApiPath, ApiQuery};
use super::response::{RecordList, UniqueListing};
use crate::data::DataStore;
use crate::observability::{log_event_with_fields, Event};
use crate::query::{
    Category, FilterEngine, PathPair, QueryRefinement, StatsAggregator, UniqueValuesIndex,
};

/// Path segment names of the variadic filter endpoints, in order
const FILTER_SEGMENTS: [&str; 8] = [
    "type1", "value1", "type2", "value2", "type3", "value3", "type4", "value4",
];

/// Number of `type/value` pairs a filter path can carry
const MAX_PAIRS: usize = FILTER_SEGMENTS.len() / 2;

// ==================
// Query Routes
// ==================

/// Create query routes
///
/// Every path is also served with a trailing slash.
pub fn query_routes(store: Arc<DataStore>) -> Router {
    let mut router = Router::new();
    router = route_both(router, "/api/commodities", get(all_records_handler));
    // Distinct values
    router = route_both(router, "/api/unique", get(unique_all_handler));
    router = route_both(router, "/api/unique/{type}", get(unique_type_handler));
    // Statistics
    router = route_both(router, "/api/stats", get(stats_all_handler));
    router = route_both(router, "/api/stats/{commodity}", get(stats_commodity_handler));

    // One route per arity: type1/value1 up to type4/value4
    for arity in 2..=FILTER_SEGMENTS.len() {
        let suffix = filter_path(arity);
        router = route_both(
            router,
            &format!("/api/commodities{}", suffix),
            get(general_filter_handler),
        );
        router = route_both(
            router,
            &format!("/api/commodity{}", suffix),
            get(strict_filter_handler),
        );
    }

    router.with_state(store)
}

/// Register `path` and `path/` with the same handler
fn route_both(
    router: Router<Arc<DataStore>>,
    path: &str,
    method_router: MethodRouter<Arc<DataStore>>,
) -> Router<Arc<DataStore>> {
    router
        .route(path, method_router.clone())
        .route(&format!("{}/", path), method_router)
}

fn filter_path(arity: usize) -> String {
    FILTER_SEGMENTS[..arity]
        .iter()
        .map(|name| format!("/{{{}}}", name))
        .collect()
}

/// Group captured path segments into `type/value` pairs
fn path_pairs(params: &HashMap<String, String>) -> Vec<PathPair> {
    (1..=MAX_PAIRS)
        .map(|i| {
            PathPair::new(
                params.get(&format!("type{}", i)).cloned(),
                params.get(&format!("value{}", i)).cloned(),
            )
        })
        .collect()
}

fn reject(endpoint: &str, err: ApiError) -> ApiError {
    let reason = match &err {
        ApiError::InvalidType(kind) => format!("invalid type {:?}", kind),
        other => other.to_string(),
    };
    log_event_with_fields(
        Event::QueryRejected,
        &[("endpoint", endpoint), ("reason", reason.as_str())],
    );
    err
}

fn served(endpoint: &str, total: usize) {
    let total = total.to_string();
    log_event_with_fields(
        Event::QueryServed,
        &[("endpoint", endpoint), ("total", total.as_str())],
    );
}

// ==================
// Record Handlers
// ==================

async fn all_records_handler(State(store): State<Arc<DataStore>>) -> Response {
    let records = FilterEngine::new(&store).all();
    served("commodities", records.len());

    Json(RecordList::new(records)).into_response()
}

async fn general_filter_handler(
    State(store): State<Arc<DataStore>>,
    ApiPath(params): ApiPath<HashMap<String, String>>,
    ApiQuery(refinement): ApiQuery<QueryRefinement>,
) -> ApiResult<Response> {
    let records = FilterEngine::new(&store)
        .general(&path_pairs(&params), &refinement)
        .map_err(|e| reject("commodities", e.into()))?;
    served("commodities", records.len());

    Ok(Json(RecordList::new(records)).into_response())
}

async fn strict_filter_handler(
    State(store): State<Arc<DataStore>>,
    ApiPath(params): ApiPath<HashMap<String, String>>,
) -> ApiResult<Response> {
    let records = FilterEngine::new(&store)
        .strict(&path_pairs(&params))
        .map_err(|e| reject("commodity", e.into()))?;

    if records.is_empty() {
        return Err(reject("commodity", ApiError::NoMatchingRecords));
    }
    served("commodity", records.len());

    Ok(Json(records).into_response())
}

// ==================
// Distinct Value Handlers
// ==================

async fn unique_all_handler(State(store): State<Arc<DataStore>>) -> Response {
    unique_response(&store, None)
}

async fn unique_type_handler(
    State(store): State<Arc<DataStore>>,
    ApiPath(kind): ApiPath<String>,
) -> ApiResult<Response> {
    Ok(unique_response(&store, Some(&kind)))
}

/// Unknown categories fall back to the full listing
fn unique_response(store: &DataStore, kind: Option<&str>) -> Response {
    let unique = UniqueValuesIndex::compute(store);

    match kind.and_then(|k| k.parse::<Category>().ok()) {
        Some(category) => Json(unique.only(category)).into_response(),
        None => Json(UniqueListing::new(unique)).into_response(),
    }
}

// ==================
// Statistics Handlers
// ==================

async fn stats_all_handler(State(store): State<Arc<DataStore>>) -> ApiResult<Response> {
    stats_response(&store, None)
}

async fn stats_commodity_handler(
    State(store): State<Arc<DataStore>>,
    ApiPath(commodity): ApiPath<String>,
) -> ApiResult<Response> {
    stats_response(&store, Some(&commodity))
}

fn stats_response(store: &DataStore, commodity: Option<&str>) -> ApiResult<Response> {
    let stats = StatsAggregator::for_commodity(store, commodity)
        .ok_or_else(|| reject("stats", ApiError::CommodityNotFound))?;
    served("stats", stats.total_records);

    Ok(Json(stats).into_response())
}
