//! HTTP front end: routes, session cookies and server bootstrap.

pub mod error;
pub mod forms;
pub mod handlers;
pub mod session;
pub mod trace;
pub mod views;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, HttpResponse, HttpServer, web};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub use trace::RequestLog;

pub const SESSION_COOKIE: &str = "session";
pub const SESSION_KEY_MIN_LEN: usize = 32;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub database: String,
    pub currency: String,
}

impl AppState {
    pub fn new(database: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            currency: currency.into(),
        }
    }
}

/// Run `f` with a fresh connection on the blocking pool.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> AppResult<T>
where
    F: FnOnce(&mut DbPool) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let db = state.database.clone();
    web::block(move || {
        let mut pool = DbPool::new(&db)?;
        f(&mut pool)
    })
    .await
    .map_err(|e| AppError::Other(format!("blocking task failed: {e}")))?
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    use handlers::{auth, dashboard, expenses, goals, transfer};

    cfg.route("/", web::get().to(auth::index))
        .service(
            web::resource("/register")
                .route(web::get().to(auth::register_form))
                .route(web::post().to(auth::register)),
        )
        .service(
            web::resource("/login")
                .route(web::get().to(auth::login_form))
                .route(web::post().to(auth::login)),
        )
        .route("/logout", web::get().to(auth::logout))
        .service(
            web::resource("/add_expense")
                .route(web::get().to(expenses::add_form))
                .route(web::post().to(expenses::add)),
        )
        .service(
            web::resource("/edit_expense/{id}")
                .route(web::get().to(expenses::edit_form))
                .route(web::post().to(expenses::edit)),
        )
        .route("/delete_expense/{id}", web::get().to(expenses::delete))
        .route(
            "/delete_multiple_expenses",
            web::post().to(expenses::delete_multiple),
        )
        .route("/set_goal", web::post().to(goals::set_goal))
        .service(
            web::resource("/dashboard")
                .route(web::get().to(dashboard::show))
                .route(web::post().to(dashboard::show_posted)),
        )
        .route("/export/csv", web::get().to(transfer::export_csv))
        .route("/export/excel", web::get().to(transfer::export_excel))
        .route("/export/pdf", web::get().to(transfer::export_pdf))
        .route("/import_excel", web::post().to(transfer::import_excel))
        .route(
            "/download_template",
            web::get().to(transfer::download_template),
        );
}

pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    session_middleware(Key::generate(), false)
}

pub fn build_app(
    state: AppState,
    key: Key,
    cookie_secure: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(session_middleware(key, cookie_secure))
        .wrap(RequestLog)
        .configure(configure)
}

/// Derive the cookie key from `path`, or fall back to a per-process key.
pub fn load_session_key(path: &str) -> AppResult<Key> {
    if path.trim().is_empty() {
        tracing::warn!("no session_key_file configured; sessions will not survive a restart");
        return Ok(Key::generate());
    }

    match fs::read(Path::new(path)) {
        Ok(bytes) => {
            if bytes.len() < SESSION_KEY_MIN_LEN {
                return Err(AppError::Config(format!(
                    "session key file {path} must hold at least {SESSION_KEY_MIN_LEN} bytes"
                )));
            }
            Ok(Key::derive_from(&bytes))
        }
        Err(e) => {
            tracing::warn!(path, error = %e, "using temporary session key");
            Ok(Key::generate())
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Migrate the database and serve until interrupted.
pub fn run(cfg: &Config) -> AppResult<()> {
    init_tracing(&cfg.log_filter);

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    drop(pool);

    let key = load_session_key(&cfg.session_key_file)?;
    let state = AppState::new(cfg.database.clone(), cfg.currency_symbol.clone());
    let secure = cfg.cookie_secure;
    let addr = (cfg.bind_address.clone(), cfg.port);

    tracing::info!(
        database = %cfg.database,
        address = %addr.0,
        port = addr.1,
        "starting server"
    );

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || build_app(state.clone(), key.clone(), secure))
            .bind(addr)?
            .run()
            .await
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn short_key_file_is_rejected() {
        let path = env::temp_dir().join("rexpenses_short_key");
        fs::write(&path, b"too short").unwrap();
        let err = load_session_key(path.to_str().unwrap()).err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn long_key_file_derives_a_stable_key() {
        let path = env::temp_dir().join("rexpenses_long_key");
        fs::write(&path, [7u8; 64]).unwrap();
        let a = load_session_key(path.to_str().unwrap()).unwrap();
        let b = load_session_key(path.to_str().unwrap()).unwrap();
        assert_eq!(a.master(), b.master());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_key_file_falls_back() {
        assert!(load_session_key("/nonexistent/rexpenses/key").is_ok());
        assert!(load_session_key("").is_ok());
    }
}
