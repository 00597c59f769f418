use crate::core::GoalLogic;
use crate::errors::{AppError, AppResult};
use crate::models::expense::parse_amount;
use crate::web::forms::GoalForm;
use crate::web::session::SessionContext;
use crate::web::{AppState, see_other, with_db};
use actix_web::{HttpResponse, web};

pub async fn set_goal(
    state: web::Data<AppState>,
    session: SessionContext,
    form: web::Form<GoalForm>,
) -> AppResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let GoalForm { month, goal_amount } = form.into_inner();
    let amount = parse_amount(goal_amount.as_deref().unwrap_or_default());

    let result = with_db(&state, move |pool| {
        GoalLogic::set(pool, user_id, month.as_deref(), amount)
    })
    .await;

    match result {
        Ok(ym) => Ok(see_other(&format!("/dashboard?month={ym}"))),
        Err(e @ AppError::InvalidMonth(_)) => {
            session.warning(e.to_string())?;
            Ok(see_other("/dashboard"))
        }
        Err(e) => Err(e),
    }
}
