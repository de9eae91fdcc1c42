use axum::{
    extract::{RawQuery, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use common::negotiate::Format;
use serde::Deserialize;
use service::{
    account::domain::{Account, LoginForm, RegistrationForm},
    errors::ServiceError,
    validation::FieldError,
};
use tracing::{info, warn};

use crate::{
    csrf,
    dto::{CsrfTokenJson, ErrorBody, UserJson},
    errors::{ApiError, RejectExt, Rejection},
    extract::{FormOrJson, IdPath},
    flash,
    negotiate::ResponseFormat,
    session::{self, authorize, SessionUser},
    state::AccountState,
    views,
};

const CSRF_INVALID: &str = "The CSRF token is missing or invalid.";
const BAD_CREDENTIALS: &str = "Invalid email or password.";

#[derive(Debug, Default, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl RegisterBody {
    fn into_form(self) -> RegistrationForm {
        RegistrationForm {
            username: self.username,
            email: self.email,
            password: self.password,
            confirm_password: self.confirm_password,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Failed form submission: JSON clients get the error itself, browsers are
/// sent back to the form with the errors parked in the flash cookie.
fn form_failure(format: Format, jar: CookieJar, back: &str, err: ApiError) -> Response {
    if format.is_json() || matches!(err, ApiError::Internal(_)) {
        return err.in_format(format).into_response();
    }
    let fields = match err {
        ApiError::Validation(fields) => fields,
        other => vec![FieldError::form(other.public_message())],
    };
    (flash::store(jar, &fields), Redirect::to(back)).into_response()
}

fn render_form(
    state: &AccountState,
    format: Format,
    jar: CookieJar,
    page: fn(&str, &[FieldError]) -> String,
) -> Response {
    let (jar, token) = csrf::issue(jar, state.cookie_secure);
    if format.is_json() {
        return (jar, Json(CsrfTokenJson { csrf_token: token })).into_response();
    }
    let (jar, errors) = flash::take(jar);
    (jar, Html(page(&token, &errors))).into_response()
}

fn render_account(format: Format, account: &Account, own: bool) -> Response {
    match format {
        Format::Json => Json(UserJson::from(account)).into_response(),
        Format::Html => Html(views::account_page(account, own)).into_response(),
    }
}

#[utoipa::path(get, path = "/register", tag = "account", responses((status = 200, description = "Registration form or CSRF token", body = CsrfTokenJson), (status = 303, description = "Already logged in")))]
pub async fn register_form(State(state): State<AccountState>, ResponseFormat(format): ResponseFormat, jar: CookieJar) -> Response {
    if authorize(&state, &jar).is_authenticated() {
        return Redirect::to("/").into_response();
    }
    render_form(&state, format, jar, views::register_page)
}

#[utoipa::path(post, path = "/register", tag = "account", responses((status = 303, description = "Registered, continue at /login"), (status = 403, body = ErrorBody), (status = 422, body = ErrorBody)))]
pub async fn register(
    State(state): State<AccountState>,
    ResponseFormat(format): ResponseFormat,
    jar: CookieJar,
    FormOrJson(body): FormOrJson<RegisterBody>,
) -> Response {
    if authorize(&state, &jar).is_authenticated() {
        return Redirect::to("/").into_response();
    }
    if !csrf::verify(&jar, body.csrf_token.as_deref()) {
        warn!(event = "csrf_rejected", path = "/register", "registration without a valid csrf token");
        return form_failure(format, jar, "/register", ApiError::Forbidden(CSRF_INVALID.into()));
    }

    match state.accounts.register(body.into_form()).await {
        Ok(account) => {
            info!(event = "registered", user_id = account.id, "account created");
            Redirect::to("/login").into_response()
        }
        Err(ServiceError::Validation(fields)) => {
            warn!(event = "register_invalid", errors = %service::validation::summarize(&fields), "registration rejected");
            form_failure(format, jar, "/register", ApiError::Validation(fields))
        }
        Err(e) => form_failure(format, jar, "/register", e.into()),
    }
}

#[utoipa::path(get, path = "/login", tag = "account", responses((status = 200, description = "Login form or CSRF token", body = CsrfTokenJson), (status = 303, description = "Already logged in")))]
pub async fn login_form(State(state): State<AccountState>, ResponseFormat(format): ResponseFormat, jar: CookieJar) -> Response {
    if authorize(&state, &jar).is_authenticated() {
        return Redirect::to("/").into_response();
    }
    render_form(&state, format, jar, views::login_page)
}

#[utoipa::path(post, path = "/login", tag = "account", responses((status = 303, description = "Logged in, session cookie set"), (status = 401, body = ErrorBody), (status = 403, body = ErrorBody), (status = 422, body = ErrorBody)))]
pub async fn login(
    State(state): State<AccountState>,
    ResponseFormat(format): ResponseFormat,
    jar: CookieJar,
    FormOrJson(body): FormOrJson<LoginBody>,
) -> Response {
    if authorize(&state, &jar).is_authenticated() {
        return Redirect::to("/").into_response();
    }
    if !csrf::verify(&jar, body.csrf_token.as_deref()) {
        warn!(event = "csrf_rejected", path = "/login", "login without a valid csrf token");
        return form_failure(format, jar, "/login", ApiError::Forbidden(CSRF_INVALID.into()));
    }

    let form = LoginForm { email: body.email, password: body.password };
    match state.accounts.login(form).await {
        Ok(session) => {
            let ttl = state.accounts.sessions().ttl();
            let jar = jar.add(session::session_cookie(session.token, ttl, state.cookie_secure));
            (jar, Redirect::to("/")).into_response()
        }
        Err(ServiceError::Unauthorized) if !format.is_json() => {
            form_failure(format, jar, "/login", ApiError::Validation(vec![FieldError::form(BAD_CREDENTIALS)]))
        }
        Err(e) => form_failure(format, jar, "/login", e.into()),
    }
}

#[utoipa::path(get, path = "/logout", tag = "account", responses((status = 303, description = "Session cleared")))]
pub async fn logout(jar: CookieJar) -> Response {
    (session::clear_session(jar), Redirect::to("/login")).into_response()
}

#[utoipa::path(get, path = "/{id}", tag = "account", params(("id" = i32, Path, description = "User id")), responses((status = 200, body = UserJson), (status = 303, description = "Own id, see /"), (status = 404, body = ErrorBody), (status = 500, body = ErrorBody)))]
pub async fn get_user(
    State(state): State<AccountState>,
    ResponseFormat(format): ResponseFormat,
    jar: CookieJar,
    IdPath(id): IdPath,
    RawQuery(query): RawQuery,
) -> Result<Response, Rejection> {
    if authorize(&state, &jar).user() == Some(SessionUser { user_id: id }) {
        let target = match query {
            Some(q) if !q.is_empty() => format!("/?{q}"),
            _ => "/".to_string(),
        };
        return Ok(Redirect::to(&target).into_response());
    }
    let account = state.accounts.get(id).await.or_reject(format)?;
    Ok(render_account(format, &account, false))
}

#[utoipa::path(get, path = "/", tag = "account", responses((status = 200, body = UserJson), (status = 401, body = ErrorBody), (status = 303, description = "Not logged in, see /login")))]
pub async fn current_user(
    State(state): State<AccountState>,
    ResponseFormat(format): ResponseFormat,
    jar: CookieJar,
    Extension(user): Extension<SessionUser>,
) -> Response {
    match state.accounts.get(user.user_id).await {
        Ok(account) => render_account(format, &account, true),
        // token outlived its user row
        Err(ServiceError::NotFound(_)) => {
            let jar = session::clear_session(jar);
            if format.is_json() {
                (jar, ApiError::Unauthorized).into_response()
            } else {
                (jar, Redirect::to("/login")).into_response()
            }
        }
        Err(e) => ApiError::from(e).in_format(format).into_response(),
    }
}
