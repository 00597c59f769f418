use crate::core::DashboardLogic;
use crate::errors::AppResult;
use crate::models::MonthFilter;
use crate::web::forms::MonthForm;
use crate::web::session::SessionContext;
use crate::web::{AppState, html, views, with_db};
use actix_web::{HttpResponse, web};

pub async fn show(
    state: web::Data<AppState>,
    session: SessionContext,
    query: web::Query<MonthForm>,
) -> AppResult<HttpResponse> {
    render(state, session, query.into_inner().month).await
}

pub async fn show_posted(
    state: web::Data<AppState>,
    session: SessionContext,
    form: Option<web::Form<MonthForm>>,
) -> AppResult<HttpResponse> {
    let month = form.and_then(|f| f.into_inner().month);
    render(state, session, month).await
}

async fn render(
    state: web::Data<AppState>,
    session: SessionContext,
    month: Option<String>,
) -> AppResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let filter = MonthFilter::from_input(month.as_deref());
    let currency = state.currency.clone();

    let summary = {
        let currency = currency.clone();
        with_db(&state, move |pool| {
            DashboardLogic::build(pool, user_id, filter, &currency)
        })
        .await?
    };

    let flashes = session.take_flashes();
    Ok(html(views::dashboard_page(&summary, &flashes, &currency)))
}
