use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use std::sync::{Mutex, MutexGuard};

use crate::config::RosterConfig;
use crate::parser::read_availability;
use crate::report::{build_roster, RosterReport};

// Only the latest roster is kept, in memory.
pub struct AppState {
    pub config: RosterConfig,
    pub report: Mutex<Option<RosterReport>>,
    pub admin_password: String,
}

impl AppState {
    pub fn new(config: RosterConfig, admin_password: String) -> Self {
        Self {
            config,
            report: Mutex::new(None),
            admin_password,
        }
    }

    fn report(&self) -> Result<MutexGuard<'_, Option<RosterReport>>> {
        self.report
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("roster state poisoned"))
    }
}

// Availability CSV upload, guarded by the admin password header
async fn upload(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    let password = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if password != state.admin_password {
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"})));
    }

    match read_availability(body.as_ref(), &state.config) {
        Ok(availability) => {
            let report = build_roster(&availability, &state.config);
            let warnings = report.warnings.len();
            *state.report()? = Some(report);
            log::info!("Roster rebuilt from upload with {} warnings", warnings);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "warnings": warnings,
            })))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to process CSV: {}", e)
        }))),
    }
}

fn with_report<F>(state: &AppState, f: F) -> Result<HttpResponse>
where
    F: FnOnce(&RosterReport) -> HttpResponse,
{
    match state.report()?.as_ref() {
        Some(report) => Ok(f(report)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Roster not available"}))),
    }
}

async fn get_roster(state: web::Data<AppState>) -> Result<HttpResponse> {
    with_report(&state, |report| HttpResponse::Ok().json(report))
}

async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    with_report(&state, |report| HttpResponse::Ok().json(&report.people))
}

async fn get_warnings(state: web::Data<AppState>) -> Result<HttpResponse> {
    with_report(&state, |report| HttpResponse::Ok().json(&report.warnings))
}

async fn get_config(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(&state.config))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/upload", web::post().to(upload))
        .route("/api/roster", web::get().to(get_roster))
        .route("/api/stats", web::get().to(get_stats))
        .route("/api/warnings", web::get().to(get_warnings))
        .route("/api/config", web::get().to(get_config));
}

pub async fn start_server(port: u16, config: RosterConfig, admin_password: String) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(config, admin_password));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
