//! Session helpers so handlers only deal with "who is logged in" and flash
//! messages, never with the cookie store itself.

use crate::errors::{AppError, AppResult};
use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASHES_KEY: &str = "_flashes";

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    /// `success`, `warning` or `danger`; used as a CSS class.
    pub category: String,
    pub message: String,
}

#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated user, rotating the session id.
    pub fn persist_user(&self, user_id: i64) -> AppResult<()> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id)
            .map_err(|e| AppError::Session(format!("failed to persist session: {e}")))
    }

    pub fn user_id(&self) -> AppResult<Option<i64>> {
        match self.0.get::<i64>(USER_ID_KEY) {
            Ok(id) => Ok(id),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable user id in session cookie");
                Ok(None)
            }
        }
    }

    /// The logged-in user, or `LoginRequired` (answered with a redirect to /login).
    pub fn require_user_id(&self) -> AppResult<i64> {
        self.user_id()?.ok_or(AppError::LoginRequired)
    }

    /// Forget everything, including pending flashes.
    pub fn clear(&self) {
        self.0.purge();
    }

    pub fn flash(&self, category: &str, message: impl Into<String>) -> AppResult<()> {
        let mut flashes = self.peek_flashes();
        flashes.push(Flash {
            category: category.to_string(),
            message: message.into(),
        });
        self.0
            .insert(FLASHES_KEY, flashes)
            .map_err(|e| AppError::Session(format!("failed to store flash: {e}")))
    }

    pub fn success(&self, message: impl Into<String>) -> AppResult<()> {
        self.flash("success", message)
    }

    pub fn warning(&self, message: impl Into<String>) -> AppResult<()> {
        self.flash("warning", message)
    }

    pub fn danger(&self, message: impl Into<String>) -> AppResult<()> {
        self.flash("danger", message)
    }

    fn peek_flashes(&self) -> Vec<Flash> {
        self.0
            .get::<Vec<Flash>>(FLASHES_KEY)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Pending flashes, removed from the session.
    pub fn take_flashes(&self) -> Vec<Flash> {
        match self.0.remove_as::<Vec<Flash>>(FLASHES_KEY) {
            Some(Ok(flashes)) => flashes,
            Some(Err(raw)) => {
                tracing::warn!(raw = %raw, "dropping malformed flash messages");
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::test_session_middleware;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn round_trips_user_id_and_flashes() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(7)?;
                        session.success("saved")?;
                        session.warning("careful")?;
                        Ok::<_, AppError>(HttpResponse::Ok().finish())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.require_user_id()?;
                        let flashes = session.take_flashes();
                        let again = session.take_flashes();
                        Ok::<_, AppError>(HttpResponse::Ok().body(format!(
                            "{id}:{}:{}",
                            flashes.len(),
                            again.len()
                        )))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "7:2:0");
    }

    #[actix_web::test]
    async fn missing_user_redirects_to_login() {
        let app = test::init_service(App::new().wrap(test_session_middleware()).route(
            "/require",
            web::get().to(|session: SessionContext| async move {
                session.require_user_id()?;
                Ok::<_, AppError>(HttpResponse::Ok().finish())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/require").to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get("location").unwrap(), "/login");
    }
}
