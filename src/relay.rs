//! Relay server
//!
//! Shields dashboards from the upstream API. Every route answers either
//! with the upstream data as JSON or with a plain `500 Server Error`; the
//! kind of upstream failure is logged here and never sent to the client.

use crate::{
    config::Config,
    constants::{DEFAULT_CHART_DAYS, DEFAULT_CURRENCY, RELAY_FAILURE_BODY},
    error::MarketDataError,
    provider::MarketDataProvider,
    providers::MeteredProvider,
    types::{MarketListQuery, PriceSeriesQuery},
};
use actix_web::{
    error::{InternalError, QueryPayloadError},
    get,
    middleware::Logger,
    web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared state of the relay routes
pub struct RelayState {
    provider: MeteredProvider,
}

impl RelayState {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider: MeteredProvider::new(provider),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartParams {
    vs_currency: Option<String>,
    days: Option<u32>,
}

fn failure(route: &'static str, err: &MarketDataError) -> HttpResponse {
    tracing::error!(route, kind = err.kind(), error = %err, "Upstream request failed");
    HttpResponse::InternalServerError()
        .content_type("text/plain; charset=utf-8")
        .body(RELAY_FAILURE_BODY)
}

/// Market list with fixed paging: usd, market cap descending, 10 per page, page 1
#[get("/cryptos")]
async fn get_cryptos(state: web::Data<RelayState>) -> impl Responder {
    match state
        .provider
        .fetch_market_list(&MarketListQuery::default())
        .await
    {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => failure("/api/cryptos", &e),
    }
}

#[get("/cryptos/{id}/chart")]
async fn get_chart(
    path: web::Path<String>,
    params: web::Query<ChartParams>,
    state: web::Data<RelayState>,
) -> impl Responder {
    let params = params.into_inner();
    let query = PriceSeriesQuery::new(
        &path.into_inner(),
        params.vs_currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
        params.days.unwrap_or(DEFAULT_CHART_DAYS),
    );

    match state.provider.fetch_price_series(&query).await {
        Ok(points) => HttpResponse::Ok().json(points),
        Err(e) => failure("/api/cryptos/{id}/chart", &e),
    }
}

/// Malformed query strings get the same answer as upstream failures
fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = failure("query", &MarketDataError::invalid(err.to_string()));
    InternalError::from_response(err, response).into()
}

#[get("/metrics")]
async fn get_metrics(state: web::Data<RelayState>) -> impl Responder {
    HttpResponse::Ok().json(state.provider.get_metrics().await)
}

/// Registers the relay routes under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .service(get_cryptos)
            .service(get_chart)
            .service(get_metrics),
    );
}

/// Serves the relay routes until the process is stopped
pub async fn run(config: &Config, provider: Arc<dyn MarketDataProvider>) -> std::io::Result<()> {
    let state = web::Data::new(RelayState::new(provider));

    match &config.database_url {
        Some(_) => tracing::info!("MONGO_URI is set; the user store is not used by the relay"),
        None => tracing::debug!("MONGO_URI is not set"),
    }
    tracing::info!(host = %config.host, port = config.port, "Starting relay server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
