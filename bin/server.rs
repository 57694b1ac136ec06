// Splitit - Web Server
// Stateless JSON API over the allocation engine

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use splitit::{
    collection_plan, currency_for_region, summary_view, Action, AllocationEngine, CollectionPlan,
    Currency, CurrencyError, CurrencyFormat, Reducer, SettleProgress, Settings, SplitState,
    SplitSummary, SummaryView, ViewMode, COMMON_CURRENCIES,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Shared application state
#[derive(Clone)]
struct AppState {
    engine: AllocationEngine,
    currency: Currency,
    cache: Arc<Mutex<EvaluationCache>>,
}

impl AppState {
    fn new(currency: Currency, cache_capacity: usize) -> Self {
        Self {
            engine: AllocationEngine::new(),
            currency,
            cache: Arc::new(Mutex::new(EvaluationCache::new(cache_capacity))),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: String) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message),
        }
    }
}

#[derive(Debug, Error)]
enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error(transparent)]
    Currency(#[from] CurrencyError),

    #[error("evaluation cache is unavailable")]
    CachePoisoned,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidBody(_) | ApiError::Currency(_) => StatusCode::BAD_REQUEST,
            ApiError::CachePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(error = %self, "request failed");
        (status, Json(ApiResponse::err(self.to_string()))).into_response()
    }
}

// ============================================================================
// Memo cache
// ============================================================================

/// Evaluations keyed by snapshot fingerprint; oldest entry is evicted first
struct EvaluationCache {
    capacity: usize,
    entries: HashMap<String, EvaluateResponse>,
    order: VecDeque<String>,
}

impl EvaluationCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&self, key: &str) -> Option<EvaluateResponse> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: String, value: EvaluateResponse) {
        if self.capacity == 0 || self.entries.contains_key(&key) {
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest {
    state: SplitState,
    #[serde(default)]
    progress: Option<SettleProgress>,
    /// Overrides the server's configured currency
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateResponse {
    fingerprint: String,
    summary: SplitSummary,
    view: SummaryView,
    /// Only in settle view
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<CollectionPlan>,
}

#[derive(Deserialize)]
struct ReduceRequest {
    state: SplitState,
    action: Action,
}

#[derive(Serialize)]
struct ReduceResponse {
    fingerprint: String,
    state: SplitState,
    summary: SplitSummary,
}

#[derive(Serialize)]
struct CurrencyResponse {
    code: String,
    name: Option<&'static str>,
    symbol: String,
    decimals: u32,
}

impl From<Currency> for CurrencyResponse {
    fn from(currency: Currency) -> Self {
        Self {
            name: currency.name(),
            symbol: currency.symbol().to_string(),
            decimals: currency.decimals(),
            code: currency.code,
        }
    }
}

#[derive(Serialize)]
struct CountryResponse {
    country: Option<String>,
    currency: &'static str,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/evaluate - Summary, formatted view and collection plan
async fn evaluate(
    State(app): State<AppState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<EvaluateResponse>>, ApiError> {
    let Json(request) = payload?;

    let currency = match &request.currency {
        Some(code) => Currency::parse(code)?,
        None => app.currency.clone(),
    };

    let fingerprint = request.state.fingerprint();
    let progress = request.progress.unwrap_or_default();
    let key = format!(
        "{}:{}:{}",
        fingerprint,
        currency.code,
        serde_json::to_string(&progress).unwrap_or_default()
    );

    if let Some(hit) = app.cache.lock().map_err(|_| ApiError::CachePoisoned)?.get(&key) {
        debug!(%fingerprint, "evaluation cache hit");
        return Ok(Json(ApiResponse::ok(hit)));
    }

    let state = request.state;
    let summary = app.engine.evaluate(&state);
    let plan = collection_plan(&state, &summary, &progress);
    let view = summary_view(&state, &summary, Some(&plan), &currency);
    let response = EvaluateResponse {
        fingerprint,
        plan: (state.view_mode == ViewMode::Settle).then_some(plan),
        summary,
        view,
    };

    let mut cache = app.cache.lock().map_err(|_| ApiError::CachePoisoned)?;
    cache.insert(key, response.clone());
    debug!(entries = cache.len(), "evaluation cached");

    Ok(Json(ApiResponse::ok(response)))
}

/// POST /api/reduce - Apply one action to a snapshot
async fn reduce(
    State(app): State<AppState>,
    payload: Result<Json<ReduceRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ReduceResponse>>, ApiError> {
    let Json(request) = payload?;

    let reducer = Reducer::with_engine(app.engine.clone());
    let state = reducer.apply(&request.state, request.action);
    let summary = app.engine.evaluate(&state);

    Ok(Json(ApiResponse::ok(ReduceResponse {
        fingerprint: state.fingerprint(),
        state,
        summary,
    })))
}

/// GET /api/currencies - Common currencies for pickers
async fn list_currencies() -> impl IntoResponse {
    let currencies: Vec<CurrencyResponse> = COMMON_CURRENCIES
        .iter()
        .filter_map(|(code, _)| Currency::parse(code).ok())
        .map(CurrencyResponse::from)
        .collect();

    Json(ApiResponse::ok(currencies))
}

/// GET /api/currencies/:code - Symbol and decimals for one code
async fn get_currency(Path(code): Path<String>) -> Result<Json<ApiResponse<CurrencyResponse>>, ApiError> {
    // Decode URL-encoded code
    let decoded = urlencoding::decode(&code)
        .unwrap_or_else(|_| code.clone().into())
        .into_owned();

    let currency = Currency::parse(&decoded)?;
    Ok(Json(ApiResponse::ok(currency.into())))
}

/// GET /api/country - Currency for the caller's edge-reported country
async fn detect_country(headers: HeaderMap) -> impl IntoResponse {
    let country = headers
        .get("cf-ipcountry")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_ascii_uppercase())
        .filter(|value| value.len() == 2);

    let currency = country.as_deref().map(currency_for_region).unwrap_or(splitit::currency::DEFAULT_CURRENCY);

    Json(ApiResponse::ok(CountryResponse { country, currency }))
}

fn router(state: AppState) -> Router {
    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/evaluate", post(evaluate))
        .route("/reduce", post(reduce))
        .route("/currencies", get(list_currencies))
        .route("/currencies/:code", get(get_currency))
        .route("/country", get(detect_country))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("🌐 Splitit - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let settings = Settings::new().context("Failed to load settings")?;
    let currency = settings.currency()?;
    info!(currency = %currency.code, cache = settings.server.cache_capacity, "settings loaded");

    let app = router(AppState::new(currency, settings.server.cache_capacity));

    // Start server
    let addr = settings.server.bind.as_str();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/evaluate", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn decimal(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    fn app() -> Router {
        router(AppState::new(Currency::default(), 8))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn sample_with_total(total: &str) -> Value {
        let mut state = SplitState::sample();
        state.manual_total = total.to_string();
        serde_json::to_value(state).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_evaluate_manual_split() {
        let request = post_json("/api/evaluate", json!({ "state": sample_with_total("100") }));
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(decimal(&body["data"]["summary"]["total"]), Decimal::from(100));
        assert_eq!(body["data"]["summary"]["isBalanced"], true);
        assert_eq!(body["data"]["view"]["badge"], "balanced");
        assert!(body["data"].get("plan").is_none());
    }

    #[tokio::test]
    async fn test_evaluate_is_memoized() {
        let state = AppState::new(Currency::default(), 8);
        let app = router(state.clone());

        for _ in 0..2 {
            let request = post_json("/api/evaluate", json!({ "state": sample_with_total("30") }));
            let (status, _) = send(app.clone(), request).await;
            assert_eq!(status, StatusCode::OK);
        }
        assert_eq!(state.cache.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reduce_then_settle_plan() {
        let request = post_json(
            "/api/reduce",
            json!({ "state": sample_with_total("100"), "action": { "type": "setViewMode", "mode": "settle" } }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["state"]["viewMode"], "settle");

        let mut settled = body["data"]["state"].clone();
        settled["payerId"] = json!("1");
        let request = post_json(
            "/api/evaluate",
            json!({ "state": settled, "progress": { "subMode": "onePayer", "paid": ["2"], "observedPayer": "1" } }),
        );
        let (_, body) = send(app(), request).await;
        assert_eq!(decimal(&body["data"]["plan"]["toCollect"]), Decimal::from(50));
        assert_eq!(body["data"]["view"]["remainingLabel"], "To Collect");
        assert_eq!(body["data"]["view"]["coveredLabel"], "Rus's Share");
    }

    #[tokio::test]
    async fn test_bad_body_is_json_error() {
        let request = post_json("/api/evaluate", json!({ "nope": true }));
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("invalid request body"));
    }

    #[tokio::test]
    async fn test_currency_lookup() {
        let request = Request::builder().uri("/api/currencies/jpy").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["code"], "JPY");
        assert_eq!(body["data"]["decimals"], 0);
        assert_eq!(body["data"]["name"], "Japanese Yen");

        let request = Request::builder().uri("/api/currencies/dollars").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_currency_list() {
        let request = Request::builder().uri("/api/currencies").body(Body::empty()).unwrap();
        let (_, body) = send(app(), request).await;
        assert_eq!(body["data"].as_array().unwrap().len(), COMMON_CURRENCIES.len());
    }

    #[tokio::test]
    async fn test_country_header() {
        let request = Request::builder()
            .uri("/api/country")
            .header("cf-ipcountry", "de")
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(app(), request).await;
        assert_eq!(body["data"]["country"], "DE");
        assert_eq!(body["data"]["currency"], "EUR");

        let request = Request::builder().uri("/api/country").body(Body::empty()).unwrap();
        let (_, body) = send(app(), request).await;
        assert_eq!(body["data"]["country"], Value::Null);
        assert_eq!(body["data"]["currency"], "USD");
    }
}
