use crate::core::ExpenseLogic;
use crate::core::expenses::parse_ids;
use crate::errors::AppResult;
use crate::web::forms::ExpenseForm;
use crate::web::session::SessionContext;
use crate::web::{AppState, html, see_other, views, with_db};
use actix_web::{HttpResponse, web};

pub async fn add_form(session: SessionContext) -> AppResult<HttpResponse> {
    session.require_user_id()?;
    Ok(html(views::expense_form_page(None)))
}

pub async fn add(
    state: web::Data<AppState>,
    session: SessionContext,
    form: web::Form<ExpenseForm>,
) -> AppResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let input = form.to_input();
    with_db(&state, move |pool| ExpenseLogic::add(pool, user_id, &input)).await?;
    Ok(see_other("/dashboard"))
}

pub async fn edit_form(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = path.into_inner();
    let expense = with_db(&state, move |pool| ExpenseLogic::get(pool, user_id, id)).await?;
    Ok(html(views::expense_form_page(Some(&expense))))
}

pub async fn edit(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<i64>,
    form: web::Form<ExpenseForm>,
) -> AppResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = path.into_inner();
    let input = form.to_input();
    with_db(&state, move |pool| {
        ExpenseLogic::update(pool, user_id, id, &input)
    })
    .await?;
    Ok(see_other("/dashboard"))
}

/// Unknown or foreign ids are ignored.
pub async fn delete(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = path.into_inner();
    with_db(&state, move |pool| ExpenseLogic::delete(pool, user_id, id)).await?;
    Ok(see_other("/dashboard"))
}

/// Repeated `expense_ids` fields, so the body is parsed by hand.
pub async fn delete_multiple(
    state: web::Data<AppState>,
    session: SessionContext,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let user_id = session.require_user_id()?;

    let values: Vec<String> = url::form_urlencoded::parse(&body)
        .filter(|(k, _)| k == "expense_ids")
        .map(|(_, v)| v.into_owned())
        .collect();
    let ids = parse_ids(values.iter().map(String::as_str));

    if ids.is_empty() {
        session.warning("No expenses selected!")?;
        return Ok(see_other("/dashboard"));
    }

    let deleted =
        with_db(&state, move |pool| ExpenseLogic::delete_many(pool, user_id, &ids)).await?;
    session.success(format!("Deleted {deleted} expenses successfully!"))?;
    Ok(see_other("/dashboard"))
}
