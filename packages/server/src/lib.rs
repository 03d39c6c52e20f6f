#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for property risk assessment.
//!
//! Exposes the assessment pipeline over a small JSON API:
//!
//! - `GET /` service description
//! - `GET /api/health` health check
//! - `POST /api/assess` run one assessment
//!
//! `GET /health` and `POST /assess/` are kept as aliases for older clients.

mod handlers;

use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use property_risk_assessment::{Assessment, RiskAssessor};
use property_risk_geocoder::GeocoderConfig;
use property_risk_models::PropertyInput;
use property_risk_server_models::{ApiError, ApiSources, AssessmentResponse, Coordinates};

/// Service name reported by `GET /` and `GET /api/health`.
pub const SERVICE_NAME: &str = "Property Risk Assessment Service";

/// Shared application state.
pub struct AppState {
    /// Assessment pipeline with its configured providers.
    pub assessor: RiskAssessor,
}

/// Listen address of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, falling back to `127.0.0.1:8080`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        Self { bind_addr, port }
    }
}

/// Builds the API response body for a completed assessment.
#[must_use]
pub fn assessment_response(input: PropertyInput, assessment: Assessment) -> AssessmentResponse {
    let coordinates = assessment
        .coordinates()
        .map(|(latitude, longitude)| Coordinates {
            latitude,
            longitude,
        });

    AssessmentResponse {
        address: input.address,
        property_type: input.property_type,
        fenced: input.fenced,
        gated: input.gated,
        operating_hours: input.operating_hours,
        notes: input.notes,
        risk_dimensions: assessment.dimensions,
        overall_score: assessment.result.overall_score,
        confidence: assessment.result.confidence,
        recommendations: assessment.result.recommendations,
        api_sources_used: ApiSources {
            crime_data: assessment.crime.source,
            geolocation: assessment.geo.source,
        },
        coordinates,
    }
}

/// Registers the API routes and the JSON extractor configuration.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/", web::get().to(handlers::root))
        .route("/health", web::get().to(handlers::health))
        .route("/assess/", web::post().to(handlers::assess))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/assess", web::post().to(handlers::assess)),
        );
}

/// Malformed JSON is a 400; well-formed JSON with missing or mistyped
/// fields is a 422.
fn json_error(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let response = match &err {
        JsonPayloadError::Deserialize(e) if e.is_data() => {
            HttpResponse::UnprocessableEntity().json(ApiError::validation(message))
        }
        _ => HttpResponse::BadRequest().json(ApiError::validation(message)),
    };
    log::debug!("Rejected request body: {err}");
    InternalError::from_response(err, response).into()
}

/// Starts the property risk API server.
///
/// Builds the provider chains from the embedded registries and `geocoder`,
/// then serves until shutdown. The caller provides the async runtime
/// (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Error` if the HTTP client cannot be built, or the
/// server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(server: ServerConfig, geocoder: &GeocoderConfig) -> std::io::Result<()> {
    let assessor = RiskAssessor::from_config(geocoder).map_err(std::io::Error::other)?;

    if geocoder.google_maps_api_key.is_none() {
        log::info!("GOOGLE_MAPS_API_KEY not set, Google Maps geocoding disabled");
    }

    let state = web::Data::new(AppState { assessor });

    log::info!("Starting server on {}:{}", server.bind_addr, server.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((server.bind_addr, server.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::http::header::ContentType;
    use actix_web::test;
    use property_risk_crime::estimate::default_regions;
    use property_risk_crime::resolver::CrimeDataResolver;
    use property_risk_geocoder::resolver::GeolocationResolver;
    use serde_json::{Value, json};

    use super::*;

    fn offline_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            assessor: RiskAssessor::new(
                GeolocationResolver::new(Vec::new()),
                CrimeDataResolver::new(Vec::new(), default_regions(), None),
            ),
        })
    }

    macro_rules! app {
        () => {
            test::init_service(App::new().app_data(offline_state()).configure(configure)).await
        };
    }

    #[actix_rt::test]
    async fn root_describes_the_service() {
        let app = app!();
        let resp: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request())
                .await;
        assert_eq!(resp["service"], SERVICE_NAME);
        assert_eq!(resp["status"], "running");
        assert_eq!(resp["api"], "/api/assess");
    }

    #[actix_rt::test]
    async fn health_is_ok() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["healthy"], true);
        assert_eq!(resp["status"], "healthy");
        assert_eq!(resp["service"], SERVICE_NAME);
    }

    #[actix_rt::test]
    async fn legacy_paths_are_still_served() {
        let app = app!();

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["status"], "healthy");

        let req = test::TestRequest::post()
            .uri("/assess/")
            .set_json(json!({
                "address": "1 Main St",
                "property_type": "rental",
                "fenced": false,
                "gated": false
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["property_type"], "rental");
    }

    #[actix_rt::test]
    async fn assess_returns_full_response() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/assess")
            .set_json(json!({
                "address": "  12 Harbor View Rd  ",
                "property_type": "Business",
                "fenced": true,
                "gated": true,
                "operating_hours": "24/7",
                "notes": "Recent theft reported"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["address"], "12 Harbor View Rd");
        assert_eq!(body["property_type"], "business");
        assert_eq!(body["operating_hours"], "24/7");
        assert_eq!(body["api_sources_used"]["geolocation"], "simulated_fallback");
        assert!(
            body["api_sources_used"]["crime_data"]
                .as_str()
                .unwrap()
                .starts_with("coordinate_estimation_")
        );
        assert_eq!(body["confidence"], 0.7);
        assert!(body["coordinates"]["latitude"].is_f64());

        let dims = &body["risk_dimensions"];
        for key in [
            "crime_risk",
            "property_exposure_risk",
            "accessibility_risk",
            "neighborhood_risk",
            "operational_risk",
        ] {
            assert!(dims[key].as_u64().unwrap() <= 100);
            assert!(dims["summaries"][key].is_string());
        }
        // 20 base + 30 for 24/7 + 20 for theft
        assert_eq!(dims["operational_risk"], 70);

        let score = body["overall_score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));
        assert!(!body["recommendations"].as_array().unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn blank_address_is_unprocessable() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/assess")
            .set_json(json!({
                "address": "   ",
                "property_type": "home",
                "fenced": false,
                "gated": false
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Validation error");
        assert_eq!(body["message"], "address cannot be empty");
    }

    #[actix_rt::test]
    async fn unknown_property_type_is_unprocessable() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/assess")
            .set_json(json!({
                "address": "1 Main St",
                "property_type": "warehouse",
                "fenced": false,
                "gated": false
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_rt::test]
    async fn missing_field_is_unprocessable() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/assess")
            .set_json(json!({ "address": "1 Main St", "fenced": false, "gated": false }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Validation error");
    }

    #[actix_rt::test]
    async fn malformed_json_is_bad_request() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/assess")
            .insert_header(ContentType::json())
            .set_payload("{\"address\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Validation error");
    }

    #[actix_rt::test]
    async fn server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }
}
