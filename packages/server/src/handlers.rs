//! HTTP handler functions for the property risk API.

use actix_web::{HttpResponse, web};
use property_risk_server_models::{ApiError, ApiHealth, ApiInfo, AssessmentRequest};

use crate::{AppState, SERVICE_NAME, assessment_response};

/// `GET /`
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(ApiInfo {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        docs: "/".to_string(),
        health: "/api/health".to_string(),
        api: "/api/assess".to_string(),
    })
}

/// `GET /api/health` (also served at `/health`)
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/assess` (also served at `/assess/`)
///
/// Validates the request, runs the assessment pipeline and returns the
/// scored result. Provider failures never surface here; only validation
/// errors (422) and scoring failures (500) do.
pub async fn assess(
    state: web::Data<AppState>,
    body: web::Json<AssessmentRequest>,
) -> HttpResponse {
    let input = match body.into_inner().validate() {
        Ok(input) => input,
        Err(e) => {
            log::debug!("Invalid assessment request: {e}");
            return HttpResponse::UnprocessableEntity().json(ApiError::validation(e.to_string()));
        }
    };

    match state.assessor.assess(&input).await {
        Ok(assessment) => HttpResponse::Ok().json(assessment_response(input, assessment)),
        Err(e) => {
            log::error!("Assessment failed for '{}': {e}", input.address);
            HttpResponse::InternalServerError().json(ApiError::internal(e.to_string()))
        }
    }
}
