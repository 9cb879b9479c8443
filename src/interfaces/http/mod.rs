use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{
    dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder, ResponseError,
};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::application::ReportDispatcher;
use crate::domain::analysis_config::ColumnRoles;
use crate::domain::error::AppError;
use crate::domain::table::UploadedDocument;
use crate::domain::tier::Tier;
use crate::infrastructure::config::AppConfig;

const FILE_FIELD: &str = "file";

pub struct HttpState {
    pub dispatcher: ReportDispatcher,
    pub max_upload_bytes: usize,
}

impl HttpState {
    pub fn new(dispatcher: ReportDispatcher, max_upload_bytes: usize) -> Self {
        Self {
            dispatcher,
            max_upload_bytes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub revenue_column: Option<String>,
    #[serde(default)]
    pub profit_column: Option<String>,
}

impl AnalyzeQuery {
    fn roles(&self) -> ColumnRoles {
        ColumnRoles {
            revenue: non_blank(&self.revenue_column),
            profit: non_blank(&self.profit_column),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Serialize)]
struct LiveResponse {
    message: &'static str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ProcessingFailure(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::UnsupportedFormat(_)
            | AppError::ParseError(_)
            | AppError::InsufficientColumns(_)
            | AppError::EmptyTable
            | AppError::UnknownColumn(_)
            | AppError::InvalidTier(_)
            | AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", self);
        }

        HttpResponse::build(status).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}

#[get("/")]
async fn live() -> impl Responder {
    HttpResponse::Ok().json(LiveResponse {
        message: "AI Report API is live",
    })
}

/// Tier chosen by the `agent` query parameter, `standard` when absent.
#[post("/analyze")]
async fn analyze(
    data: web::Data<HttpState>,
    query: web::Query<AnalyzeQuery>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let tier = Tier::from_selector(query.agent.as_deref())?;
    run_analysis(data, tier, query.roles(), payload).await
}

/// Tier fixed by the enclosing scope.
async fn analyze_scoped(
    data: web::Data<HttpState>,
    tier: web::Data<Tier>,
    query: web::Query<AnalyzeQuery>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    run_analysis(data, **tier, query.roles(), payload).await
}

async fn run_analysis(
    data: web::Data<HttpState>,
    tier: Tier,
    roles: ColumnRoles,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let document = read_upload(payload, data.max_upload_bytes).await?;
    info!(
        tier = %tier,
        filename = %document.filename,
        bytes = document.len(),
        "Analyzing upload"
    );

    let state = data.clone();
    let response = web::block(move || state.dispatcher.analyze(tier, &document, &roles))
        .await
        .map_err(|e| AppError::ProcessingFailure(e.to_string()))??;

    Ok(HttpResponse::Ok().json(response))
}

/// Pull the `file` field out of a multipart body, enforcing `limit` as it streams.
async fn read_upload(mut payload: Multipart, limit: usize) -> Result<UploadedDocument, AppError> {
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| AppError::InvalidUpload(e.to_string()))?;

        if field.name() != Some(FILE_FIELD) {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| AppError::InvalidUpload(e.to_string()))?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidUpload("file field has no filename".to_string()))?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidUpload(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::UploadTooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(UploadedDocument::new(filename, bytes));
    }

    Err(AppError::MissingFile)
}

fn tier_scope(tier: Tier) -> actix_web::Scope {
    web::scope(&format!("/{}", tier.as_str()))
        .app_data(web::Data::new(tier))
        .route("/analyze", web::post().to(analyze_scoped))
}

/// Register every route. Expects `web::Data<HttpState>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(live).service(analyze);
    for tier in Tier::ALL {
        cfg.service(tier_scope(tier));
    }
}

pub fn start_server(config: &AppConfig) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState::new(
        ReportDispatcher::new(config.analysis.clone()),
        config.max_upload_bytes,
    ));

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Browser front-ends upload from any origin

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(config.bind_address())?
    .run();

    info!(host = %config.host, port = config.port, "Report API listening");
    Ok(server)
}
