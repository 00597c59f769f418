//! Spreadsheet and PDF downloads, workbook upload and the import template.

use crate::core::{ExpenseLogic, ImportLogic};
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, ExportLogic, REPORT_TITLE, template_xlsx_bytes};
use crate::models::MonthFilter;
use crate::web::session::SessionContext;
use crate::web::{AppState, see_other, with_db};
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;

const UPLOAD_FIELDS: [&str; 2] = ["excel_file", "file"];
const TEMPLATE_NAME: &str = "expense_template.xlsx";

fn attachment(content_type: &str, filename: String, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(bytes)
}

async fn export(
    state: web::Data<AppState>,
    session: SessionContext,
    format: ExportFormat,
) -> AppResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let currency = state.currency.clone();

    let bytes = with_db(&state, move |pool| {
        let expenses = ExpenseLogic::list(pool, user_id, &MonthFilter::Lifetime)?;
        ExportLogic::render(&expenses, format, &currency, REPORT_TITLE)
    })
    .await?;

    Ok(attachment(
        format.content_type(),
        format.download_name(),
        bytes,
    ))
}

pub async fn export_csv(
    state: web::Data<AppState>,
    session: SessionContext,
) -> AppResult<HttpResponse> {
    export(state, session, ExportFormat::Csv).await
}

pub async fn export_excel(
    state: web::Data<AppState>,
    session: SessionContext,
) -> AppResult<HttpResponse> {
    export(state, session, ExportFormat::Xlsx).await
}

pub async fn export_pdf(
    state: web::Data<AppState>,
    session: SessionContext,
) -> AppResult<HttpResponse> {
    export(state, session, ExportFormat::Pdf).await
}

pub async fn download_template(session: SessionContext) -> AppResult<HttpResponse> {
    session.require_user_id()?;
    let bytes = template_xlsx_bytes()?;
    Ok(attachment(
        ExportFormat::Xlsx.content_type(),
        TEMPLATE_NAME.to_string(),
        bytes,
    ))
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// First file field named `excel_file`, else `file`.
async fn read_upload(mut payload: Multipart) -> AppResult<Option<Upload>> {
    let mut found: Option<(usize, Upload)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::InvalidImport(format!("upload failed: {e}")))?;

        let (name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(str::to_string),
            ),
            None => (String::new(), None),
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::InvalidImport(format!("upload failed: {e}")))?;
            bytes.extend_from_slice(&chunk);
        }

        let Some(rank) = UPLOAD_FIELDS.iter().position(|f| *f == name) else {
            continue;
        };
        let Some(filename) = filename else {
            continue;
        };

        if found.as_ref().is_none_or(|(best, _)| rank < *best) {
            found = Some((rank, Upload { filename, bytes }));
        }
    }

    Ok(found.map(|(_, upload)| upload))
}

pub async fn import_excel(
    state: web::Data<AppState>,
    session: SessionContext,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let user_id = session.require_user_id()?;

    let upload = match read_upload(payload).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            session.danger("No file part. Please choose a file before uploading.")?;
            return Ok(see_other("/dashboard"));
        }
        Err(e) => {
            tracing::warn!(user_id, error = %e, "unreadable upload");
            session.danger(format!("Error importing file: {e}"))?;
            return Ok(see_other("/dashboard"));
        }
    };

    if upload.filename.trim().is_empty() {
        session.warning("No selected file. Please choose a valid Excel file.")?;
        return Ok(see_other("/dashboard"));
    }

    let filename = upload.filename.clone();
    let result = with_db(&state, move |pool| {
        ImportLogic::import(pool, user_id, &upload.filename, &upload.bytes)
    })
    .await;

    match result {
        Ok(count) => {
            tracing::info!(user_id, %filename, count, "expenses imported");
            session.success(format!("Imported {count} expenses successfully!"))?;
        }
        Err(AppError::InvalidImport(msg)) if msg == crate::core::import::INVALID_FORMAT => {
            tracing::info!(user_id, %filename, "import rejected: unknown layout");
            session.danger(msg)?;
        }
        Err(e) => {
            tracing::warn!(user_id, %filename, error = %e, "import failed");
            session.danger(format!("Error importing file: {e}"))?;
        }
    }

    Ok(see_other("/dashboard"))
}
