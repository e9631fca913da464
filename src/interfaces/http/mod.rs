use crate::application::use_cases::csv_export::EXPORT_FILE_NAME;
use crate::application::use_cases::insights::build_prompt;
use crate::application::{
    DashboardSession, GenerationKind, IngestionUseCase, InsightsUseCase, LoadSummary,
};
use crate::domain::data_source::DataSource;
use crate::domain::error::AppError;
use crate::domain::filter::FilterCriteria;
use crate::infrastructure::config::AppConfig;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

const LOG_CAPACITY: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub config: AppConfig,
    pub session: Mutex<DashboardSession>,
    pub ingestion: IngestionUseCase,
    pub insights: InsightsUseCase,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl HttpState {
    pub fn new(config: AppConfig, ingestion: IngestionUseCase, insights: InsightsUseCase) -> Self {
        Self {
            config,
            session: Mutex::new(DashboardSession::new()),
            ingestion,
            insights,
            logs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn session(&self) -> MutexGuard<'_, DashboardSession> {
        // state stays consistent: every mutation is a whole-value swap
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fetch and normalize outside the lock; swap in only on success.
    pub async fn load(&self, source: &DataSource) -> Result<LoadSummary, AppError> {
        let dataset = self.ingestion.load(source).await?;
        Ok(self.session().replace_dataset(dataset))
    }
}

#[derive(Deserialize, Default)]
pub struct LoadRequest {
    #[serde(default)]
    pub source: Option<DataSource>,
}

#[derive(Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct GenerationResponse {
    pub kind: GenerationKind,
    pub result: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(err: &AppError) -> HttpResponse {
    let body = ErrorBody {
        error: err.to_string(),
    };
    match err {
        AppError::ParseError(_) | AppError::HeaderMismatch(_) | AppError::EmptyDataset => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        AppError::TransportError(_) | AppError::GenerationError(_) => {
            HttpResponse::BadGateway().json(body)
        }
        AppError::Busy(_) => HttpResponse::Conflict().json(body),
        AppError::ConfigError(_) => HttpResponse::BadRequest().json(body),
        AppError::Internal(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn not_loaded() -> HttpResponse {
    HttpResponse::Conflict().json(ErrorBody {
        error: "No dataset loaded yet".to_string(),
    })
}

/// A missing body reloads the configured source.
#[post("/load")]
async fn load(data: web::Data<HttpState>, req: Option<web::Json<LoadRequest>>) -> impl Responder {
    let source = req
        .and_then(|req| req.into_inner().source)
        .unwrap_or_else(|| data.config.data_source.clone());

    add_log(
        &data.logs,
        "INFO",
        "Ingestion",
        &format!("Loading {}", source.describe()),
    );

    match data.load(&source).await {
        Ok(summary) => {
            add_log(
                &data.logs,
                "INFO",
                "Ingestion",
                &format!("Loaded {} records", summary.records),
            );
            HttpResponse::Ok().json(summary)
        }
        Err(e) => {
            add_log(&data.logs, "ERROR", "Ingestion", &e.to_string());
            error_response(&e)
        }
    }
}

#[get("/load")]
async fn last_load(data: web::Data<HttpState>) -> impl Responder {
    match data.session().last_load() {
        Some(summary) => HttpResponse::Ok().json(summary),
        None => not_loaded(),
    }
}

#[get("/filters/options")]
async fn filter_options(data: web::Data<HttpState>) -> impl Responder {
    match data.session().filter_options() {
        Some(options) => HttpResponse::Ok().json(options),
        None => not_loaded(),
    }
}

#[post("/filters")]
async fn apply_filters(
    data: web::Data<HttpState>,
    criteria: web::Json<FilterCriteria>,
) -> impl Responder {
    let mut session = data.session();
    match session.apply_filters(criteria.into_inner()) {
        Some(views) => HttpResponse::Ok().json(views),
        None => not_loaded(),
    }
}

#[get("/dashboard")]
async fn dashboard(data: web::Data<HttpState>) -> impl Responder {
    match data.session().views() {
        Some(views) => HttpResponse::Ok().json(views),
        None => not_loaded(),
    }
}

#[get("/table")]
async fn table(data: web::Data<HttpState>, query: web::Query<TableQuery>) -> impl Responder {
    match data.session().table(query.search.as_deref()) {
        Some(page) => HttpResponse::Ok().json(page),
        None => not_loaded(),
    }
}

#[get("/export")]
async fn export_csv(data: web::Data<HttpState>) -> impl Responder {
    match data.session().export_csv() {
        Some(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ))
            .body(csv),
        None => not_loaded(),
    }
}

#[post("/insights/{kind}")]
async fn generate_insight(
    data: web::Data<HttpState>,
    kind: web::Path<String>,
) -> impl Responder {
    let kind = match kind.as_str() {
        "summary" => GenerationKind::Summary,
        "email" => GenerationKind::Email,
        other => {
            return HttpResponse::NotFound().json(ErrorBody {
                error: format!("Unknown insight kind: {}", other),
            })
        }
    };

    // build the prompt under the lock, generate without it
    let prompt = {
        let session = data.session();
        match session.filtered() {
            Some(subset) => build_prompt(kind, subset),
            None => return not_loaded(),
        }
    };

    let result = match prompt {
        Ok(prompt) => data.insights.execute(&data.config.llm, kind, &prompt).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(result) => HttpResponse::Ok().json(GenerationResponse { kind, result }),
        Err(e) => {
            add_log(&data.logs, "ERROR", "Insights", &e.to_string());
            error_response(&e)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data
        .logs
        .lock()
        .map(|logs| logs.clone())
        .unwrap_or_default();
    HttpResponse::Ok().json(logs)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > LOG_CAPACITY {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Routes under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(load)
            .service(last_load)
            .service(filter_options)
            .service(apply_filters)
            .service(dashboard)
            .service(table)
            .service(export_csv)
            .service(generate_insight)
            .service(get_logs),
    );
}

pub fn start_server(state: web::Data<HttpState>) -> std::io::Result<Server> {
    let host = state.config.server.host.clone();
    let port = state.config.server.port;

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // dashboard page may be served from anywhere

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run();

    Ok(server)
}
