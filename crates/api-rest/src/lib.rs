//! # API REST
//!
//! HTTP front end for EMIS.
//!
//! Handles:
//! - The browser flow on `/`: the registration form, and the read-only summary reached by
//!   scanning a patient's code (`/?patient_id=...`)
//! - JSON endpoints with OpenAPI/Swagger documentation
//! - REST-specific concerns (form and JSON decoding, CORS, admin key checks)
//!
//! Store and mirror work is blocking, so every handler runs it on the blocking thread pool.

#![warn(rust_2018_idioms)]

pub mod html;

use api_shared::{
    validate_api_key, AuthError, HealthRes, HealthService, ListPatientsRes, LookupRes,
    PatientSummary, RegisterPatientReq, RegisterPatientRes, ResyncRes, ValidationErrorRes,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use base64::Engine;
use emis_core::{
    resolve_config, MirrorStatus, MirroredTable, Patient, PatientError, PatientService,
    PatientSubmission, UpsertOutcome, ValidatedSubmission, ValidationError,
};
use html::FormFields;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// REST listen address.
pub const ENV_REST_ADDR: &str = "EMIS_REST_ADDR";
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";
/// Key required by admin endpoints. Admin endpoints are disabled when unset.
pub const ENV_API_KEY: &str = "EMIS_API_KEY";
const API_KEY_HEADER: &str = "x-api-key";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PatientService>,
    api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(service: Arc<PatientService>, api_key: Option<String>) -> Self {
        Self {
            service,
            api_key: api_key.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        register_patient,
        list_patients,
        lookup_patient,
        patient_qr,
        resync_table,
    ),
    components(schemas(
        HealthRes,
        RegisterPatientReq,
        RegisterPatientRes,
        PatientSummary,
        LookupRes,
        ListPatientsRes,
        ResyncRes,
        ValidationErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit_form))
        .route("/health", get(health))
        .route("/patients", get(list_patients).post(register_patient))
        .route("/patients/:public_id", get(lookup_patient))
        .route("/patients/:public_id/qr", get(patient_qr))
        .route("/resync/:table", post(resync_table))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolves configuration from the process environment, prepares the record store and builds
/// the handler state. Called once at startup.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the mirror credentials cannot be loaded or
/// the schema cannot be created.
pub fn state_from_env() -> anyhow::Result<AppState> {
    let cfg = Arc::new(resolve_config(|key| std::env::var(key).ok())?);
    let service = PatientService::from_config(cfg.clone())?;
    service.initialise()?;

    tracing::info!(
        "EMIS store {} (links under {}, codes in {})",
        cfg.database_path().display(),
        cfg.base_url(),
        cfg.qr_dir().display()
    );

    let api_key = std::env::var(ENV_API_KEY).ok();
    if api_key.as_deref().map_or(true, str::is_empty) {
        tracing::info!("{} not set: admin endpoints disabled", ENV_API_KEY);
    }
    Ok(AppState::new(Arc::new(service), api_key))
}

// ============================================================================
// Errors
// ============================================================================

/// Failures of the JSON endpoints.
#[derive(Debug)]
enum ApiError {
    Validation(ValidationError),
    NotFound,
    Unauthorised(AuthError),
    BadRequest(String),
    Mirror(String),
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorRes {
                    field: e.field().to_string(),
                    message: e.to_string(),
                }),
            )
                .into_response(),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "No patient record found").into_response(),
            ApiError::Unauthorised(AuthError::Disabled) => {
                (StatusCode::FORBIDDEN, "Admin API disabled").into_response()
            }
            ApiError::Unauthorised(_) => {
                (StatusCode::UNAUTHORIZED, "Invalid or missing API key").into_response()
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::Mirror(message) => (StatusCode::BAD_GATEWAY, message).into_response(),
            ApiError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<PatientError> for ApiError {
    fn from(e: PatientError) -> Self {
        match e {
            PatientError::Validation(v) => ApiError::Validation(v),
            PatientError::InvalidInput(message) => ApiError::BadRequest(message),
            PatientError::Mirror(m) => {
                tracing::error!("Mirror error: {:?}", m);
                ApiError::Mirror(format!("spreadsheet mirror error: {}", m))
            }
            other => {
                tracing::error!("Patient service error: {:?}", other);
                ApiError::Internal
            }
        }
    }
}

/// Runs blocking store/mirror work off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, PatientError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            tracing::error!("Blocking task failed: {:?}", e);
            Err(ApiError::Internal)
        }
    }
}

fn authorise(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    validate_api_key(provided, state.api_key.as_deref()).map_err(|e| {
        tracing::warn!("Admin request refused: {}", e);
        ApiError::Unauthorised(e)
    })
}

// ============================================================================
// Conversions
// ============================================================================

fn summary(patient: &Patient) -> PatientSummary {
    PatientSummary {
        public_id: patient.public_id.to_string(),
        name: patient.name.to_string(),
        age: patient.age.years().into(),
        phone: patient.phone.to_string(),
        emergency_contact: patient.emergency_contact.to_string(),
        genotype: patient.genotype.to_string(),
        blood_type: patient.blood_type.to_string(),
        allergies: patient.allergies.entries().map(String::from).collect(),
        medical_history: patient.medical_history.entries().map(String::from).collect(),
        link: patient.link.clone(),
    }
}

fn submission_from_request(req: RegisterPatientReq) -> PatientSubmission {
    PatientSubmission {
        name: req.name,
        age: req.age.to_string(),
        nin: req.nin,
        phone: req.phone,
        emergency_contact: req.emergency_contact,
        genotype: req.genotype,
        blood_type: req.blood_type,
        allergies: req.allergies,
        medical_history: req.medical_history,
        consent: req.consent,
    }
}

fn submission_from_form(fields: &FormFields) -> PatientSubmission {
    PatientSubmission {
        name: fields.name.clone(),
        age: fields.age.clone(),
        nin: fields.nin.clone(),
        phone: fields.phone.clone(),
        emergency_contact: fields.emergency_contact.clone(),
        genotype: fields.genotype.clone(),
        blood_type: fields.blood_type.clone(),
        allergies: fields.allergies.clone(),
        medical_history: fields.medical_history.clone(),
        consent: fields.consent.is_some(),
    }
}

/// Upserts and issues the code in one blocking task.
async fn register(
    state: &AppState,
    submission: ValidatedSubmission,
) -> Result<(UpsertOutcome, String), ApiError> {
    let service = state.service.clone();
    blocking(move || {
        let outcome = service.upsert(&submission)?;
        let code = service.issue_code(&outcome.patient)?;
        let png_base64 = base64::engine::general_purpose::STANDARD.encode(&code.png);
        Ok((outcome, png_base64))
    })
    .await
}

// ============================================================================
// Browser flow
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    patient_id: Option<String>,
}

/// `/` without `patient_id` serves the registration form; with it, the medical summary.
async fn index(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> (StatusCode, Html<String>) {
    let Some(public_id) = query.patient_id.filter(|id| !id.trim().is_empty()) else {
        return (
            StatusCode::OK,
            Html(html::registration_form(None, &FormFields::default())),
        );
    };

    let service = state.service.clone();
    let lookup_id = public_id.clone();
    match blocking(move || service.resolve(&lookup_id)).await {
        Ok(Some(resolved)) => (StatusCode::OK, Html(html::summary_page(&resolved.patient))),
        Ok(None) => (StatusCode::NOT_FOUND, Html(html::not_found_page(&public_id))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(html::error_page("The record could not be loaded. Please try again.")),
        ),
    }
}

async fn submit_form(
    State(state): State<AppState>,
    Form(fields): Form<FormFields>,
) -> (StatusCode, Html<String>) {
    let submission = match submission_from_form(&fields).validate() {
        Ok(valid) => valid,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(html::registration_form(Some(&e), &fields)),
            )
        }
    };

    match register(&state, submission).await {
        Ok((outcome, png_base64)) => (
            StatusCode::OK,
            Html(html::registered_page(
                &outcome.patient,
                outcome.created,
                &png_base64,
                outcome.mirror_warning.as_deref(),
            )),
        ),
        Err(ApiError::BadRequest(message)) => (
            StatusCode::BAD_REQUEST,
            Html(html::error_page(&message)),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(html::error_page("The record could not be saved. Please try again.")),
        ),
    }
}

// ============================================================================
// JSON endpoints
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = RegisterPatientReq,
    responses(
        (status = 201, description = "Patient registered", body = RegisterPatientRes),
        (status = 200, description = "Existing patient updated", body = RegisterPatientRes),
        (status = 422, description = "Submission rejected", body = ValidationErrorRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Register a patient, or update the patient with the same NIN or phone.
///
/// Returns the patient's link and its scannable code.
#[axum::debug_handler]
async fn register_patient(
    State(state): State<AppState>,
    Json(req): Json<RegisterPatientReq>,
) -> Result<(StatusCode, Json<RegisterPatientRes>), ApiError> {
    let submission = submission_from_request(req)
        .validate()
        .map_err(ApiError::Validation)?;
    let (outcome, qr_png_base64) = register(&state, submission).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(RegisterPatientRes {
            public_id: outcome.patient.public_id.to_string(),
            link: outcome.link,
            created: outcome.created,
            qr_png_base64,
            mirror_warning: outcome.mirror_warning,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/patients",
    params(("x-api-key" = String, Header, description = "Admin API key")),
    responses(
        (status = 200, description = "All patients", body = ListPatientsRes),
        (status = 401, description = "Invalid or missing API key"),
        (status = 403, description = "Admin API disabled"),
        (status = 500, description = "Internal server error")
    )
)]
/// List every registered patient.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListPatientsRes>, ApiError> {
    authorise(&state, &headers)?;
    let service = state.service.clone();
    let patients = blocking(move || service.list_patients()).await?;
    Ok(Json(ListPatientsRes {
        patients: patients.iter().map(summary).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/patients/{public_id}",
    params(("public_id" = String, Path, description = "Public identifier, e.g. PAT8901295678")),
    responses(
        (status = 200, description = "Patient found; a scan was recorded", body = LookupRes),
        (status = 404, description = "No patient with this identifier"),
        (status = 500, description = "Internal server error")
    )
)]
/// Look a patient up by public identifier, recording a scan activity.
#[axum::debug_handler]
async fn lookup_patient(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<LookupRes>, ApiError> {
    let service = state.service.clone();
    let resolved = blocking(move || service.resolve(&public_id))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(LookupRes {
        patient: summary(&resolved.patient),
        scanned_at: resolved.scan.timestamp.to_rfc3339(),
        mirror_warning: resolved.mirror_warning,
    }))
}

#[utoipa::path(
    get,
    path = "/patients/{public_id}/qr",
    params(("public_id" = String, Path, description = "Public identifier")),
    responses(
        (status = 200, description = "PNG scannable code (image/png)"),
        (status = 404, description = "No patient with this identifier"),
        (status = 500, description = "Internal server error")
    )
)]
/// Fetch the scannable code for a patient's link. Does not count as a scan.
#[axum::debug_handler]
async fn patient_qr(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Response, ApiError> {
    let service = state.service.clone();
    let code = blocking(move || service.code_for(&public_id))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], code.png).into_response())
}

#[utoipa::path(
    post,
    path = "/resync/{table}",
    params(
        ("table" = String, Path, description = "patients, scan_activities or logs"),
        ("x-api-key" = String, Header, description = "Admin API key")
    ),
    responses(
        (status = 200, description = "Sheet overwritten, or mirror disabled", body = ResyncRes),
        (status = 400, description = "Unknown table"),
        (status = 401, description = "Invalid or missing API key"),
        (status = 403, description = "Admin API disabled"),
        (status = 502, description = "Spreadsheet mirror failed")
    )
)]
/// Overwrite one sheet of the mirror with the current table contents.
#[axum::debug_handler]
async fn resync_table(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(table): Path<String>,
) -> Result<Json<ResyncRes>, ApiError> {
    authorise(&state, &headers)?;
    let table: MirroredTable = table.parse()?;
    let service = state.service.clone();
    let status = blocking(move || service.resync(table)).await?;

    let (synced, rows) = match status {
        MirrorStatus::Synced { rows } => (true, rows),
        MirrorStatus::Disabled => (false, 0),
    };
    Ok(Json(ResyncRes {
        table: table.to_string(),
        synced,
        rows,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use emis_core::CoreConfig;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const KEY: &str = "test-admin-key";

    fn test_app() -> (TempDir, Router) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(
            temp_dir.path().join("patients.db"),
            "http://localhost:3000".into(),
            temp_dir.path().join("qr_codes"),
        )
        .expect("config should be valid");
        let service = PatientService::new(Arc::new(cfg), None);
        service.initialise().expect("initialise should succeed");
        let app = router(AppState::new(Arc::new(service), Some(KEY.into())));
        (temp_dir, app)
    }

    fn ada_json() -> serde_json::Value {
        serde_json::json!({
            "name": "Ada Obi",
            "age": 29,
            "nin": "12345678901",
            "phone": "08012345678",
            "emergency_contact": "08098765432",
            "genotype": "AA",
            "blood_type": "O+",
            "allergies": "Penicillin, penicillin",
            "medical_history": "",
            "consent": true
        })
    }

    fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_temp_dir, app) = test_app();
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let res: HealthRes = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(res.ok);
    }

    #[tokio::test]
    async fn test_register_then_update() {
        let (_temp_dir, app) = test_app();

        let response = app
            .clone()
            .oneshot(post_json("/patients", &ada_json()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let res: RegisterPatientRes = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(res.public_id, "PAT8901295678");
        assert_eq!(res.link, "http://localhost:3000/?patient_id=PAT8901295678");
        assert!(res.created);
        let png = base64::engine::general_purpose::STANDARD
            .decode(&res.qr_png_base64)
            .unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let mut again = ada_json();
        again["allergies"] = "Dust".into();
        let response = app.oneshot(post_json("/patients", &again)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let res: RegisterPatientRes = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!res.created);
        assert_eq!(res.public_id, "PAT8901295678");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_submission() {
        let (_temp_dir, app) = test_app();
        let mut bad = ada_json();
        bad["nin"] = "1234".into();

        let response = app.oneshot(post_json("/patients", &bad)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let res: ValidationErrorRes = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(res.field, "nin");
    }

    #[tokio::test]
    async fn test_lookup_json_and_not_found() {
        let (_temp_dir, app) = test_app();
        app.clone()
            .oneshot(post_json("/patients", &ada_json()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(get("/patients/PAT8901295678"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let res: LookupRes = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(res.patient.name, "Ada Obi");
        assert_eq!(res.patient.phone, "+2348012345678");
        assert_eq!(res.patient.allergies, vec!["Penicillin"]);
        assert!(res.patient.medical_history.is_empty());

        let response = app.oneshot(get("/patients/PAT0000000000")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_serves_form_and_summary() {
        let (_temp_dir, app) = test_app();

        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("<form method=\"post\""));

        app.clone()
            .oneshot(post_json("/patients", &ada_json()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(get("/?patient_id=PAT8901295678"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_string(response).await;
        assert!(page.contains("Emergency medical summary"));
        assert!(page.contains("<li>Penicillin</li>"));
        assert!(page.contains("O+"));

        let response = app.oneshot(get("/?patient_id=PAT404")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("No record"));
    }

    #[tokio::test]
    async fn test_form_submission() {
        let (_temp_dir, app) = test_app();
        let form = "name=Ada+Obi&age=29&nin=12345678901&phone=08012345678\
                    &emergency_contact=08098765432&genotype=AA&blood_type=O%2B\
                    &allergies=Penicillin&medical_history=&consent=on";

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_string(response).await;
        assert!(page.contains("Patient registered"));
        assert!(page.contains("data:image/png;base64,"));

        let unconsented = form.replace("&consent=on", "");
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(unconsented))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_string(response).await.contains("data-field=\"consent\""));
    }

    #[tokio::test]
    async fn test_qr_endpoint_returns_png() {
        let (_temp_dir, app) = test_app();
        app.clone()
            .oneshot(post_json("/patients", &ada_json()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(get("/patients/PAT8901295678/qr"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        let response = app.oneshot(get("/patients/PAT0000000000/qr")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_endpoints_require_key() {
        let (_temp_dir, app) = test_app();

        let response = app.clone().oneshot(get("/patients")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/patients")
            .header(API_KEY_HEADER, KEY)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let res: ListPatientsRes = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(res.patients.is_empty());

        let request = Request::builder()
            .method("POST")
            .uri("/resync/logs")
            .header(API_KEY_HEADER, KEY)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let res: ResyncRes = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!res.synced, "mirror is not configured in tests");

        let request = Request::builder()
            .method("POST")
            .uri("/resync/visits")
            .header(API_KEY_HEADER, KEY)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
