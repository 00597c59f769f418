use crate::core::AuthLogic;
use crate::errors::{AppError, AppResult};
use crate::web::forms::AuthForm;
use crate::web::session::SessionContext;
use crate::web::{AppState, html, see_other, views, with_db};
use actix_web::{HttpResponse, web};

pub async fn index(session: SessionContext) -> AppResult<HttpResponse> {
    if session.user_id()?.is_some() {
        return Ok(see_other("/dashboard"));
    }
    Ok(html(views::index_page()))
}

pub async fn register_form(session: SessionContext) -> HttpResponse {
    html(views::register_page(&session.take_flashes()))
}

pub async fn register(
    state: web::Data<AppState>,
    form: web::Form<AuthForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let username = form.username.clone().unwrap_or_default();

    let result = with_db(&state, move |pool| {
        let (u, p) = form.credentials();
        AuthLogic::register(pool, u, p)
    })
    .await;

    match result {
        Ok(user_id) => {
            tracing::info!(user_id, %username, "user registered");
            Ok(see_other("/login"))
        }
        Err(e) => {
            tracing::info!(%username, error = %e, "registration rejected");
            Err(e)
        }
    }
}

pub async fn login_form(session: SessionContext) -> HttpResponse {
    html(views::login_page(&session.take_flashes()))
}

pub async fn login(
    state: web::Data<AppState>,
    session: SessionContext,
    form: web::Form<AuthForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let username = form.username.clone().unwrap_or_default();

    let result = with_db(&state, move |pool| {
        let (u, p) = form.credentials();
        AuthLogic::login(pool, u, p)
    })
    .await;

    match result {
        Ok(user) => {
            session.persist_user(user.id)?;
            tracing::debug!(user_id = user.id, "login");
            Ok(see_other("/dashboard"))
        }
        Err(AppError::InvalidCredentials) => {
            tracing::warn!(%username, "login failed");
            Err(AppError::InvalidCredentials)
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(session: SessionContext) -> AppResult<HttpResponse> {
    session.require_user_id()?;
    session.clear();
    Ok(see_other("/"))
}
