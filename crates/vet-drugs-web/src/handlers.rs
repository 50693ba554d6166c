//! HTTP handlers for the drug pages.
//!
//! Each handler parses its inputs, delegates to [`DrugController`] and turns
//! the resulting [`Outcome`] into a response.
//!
//! [`DrugController`]: vet_drugs_core::DrugController

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Path, Query, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use vet_drugs_core::{DrugForm, Outcome};

use crate::error::WebError;
use crate::flash;
use crate::state::AppState;
use crate::views;

/// Query string of `GET /drugs`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub name: Option<String>,
}

/// `GET /drugs/new`
pub async fn init_creation_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let outcome = state.with_controller(|c| c.init_creation_form())?;
    respond(&state, &headers, outcome)
}

/// `POST /drugs/new`
pub async fn process_creation_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<DrugForm>, FormRejection>,
) -> Result<Response, WebError> {
    let Form(form) = form.map_err(|e| WebError::BadRequest(e.body_text()))?;
    let outcome = state.with_controller(|c| c.process_creation_form(&form))?;
    respond(&state, &headers, outcome)
}

/// `GET /drugs`
pub async fn show_drug_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(params) = params.map_err(|e| WebError::BadRequest(e.body_text()))?;
    let page = parse_page(params.page.as_deref())?;
    let outcome = state.with_controller(|c| c.show_drug_list(page, params.name.as_deref()))?;
    respond(&state, &headers, outcome)
}

/// `GET /drugs/:drug_id/edit`
pub async fn init_update_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(drug_id): Path<String>,
) -> Result<Response, WebError> {
    let drug_id = parse_drug_id(&drug_id)?;
    let outcome = state.with_controller(|c| c.init_update_form(drug_id))?;
    respond(&state, &headers, outcome)
}

/// `POST /drugs/:drug_id/edit`
pub async fn process_update_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(drug_id): Path<String>,
    form: Result<Form<DrugForm>, FormRejection>,
) -> Result<Response, WebError> {
    let drug_id = parse_drug_id(&drug_id)?;
    let Form(form) = form.map_err(|e| WebError::BadRequest(e.body_text()))?;
    let outcome = state.with_controller(|c| c.process_update_form(drug_id, &form))?;
    respond(&state, &headers, outcome)
}

/// `GET /drugs/:drug_id/delete`
pub async fn delete_drug(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(drug_id): Path<String>,
) -> Result<Response, WebError> {
    let drug_id = parse_drug_id(&drug_id)?;
    let outcome = state.with_controller(|c| c.delete_drug(drug_id))?;
    respond(&state, &headers, outcome)
}

/// Turn a controller outcome into an HTML page or a 302 redirect.
fn respond(state: &AppState, headers: &HeaderMap, outcome: Outcome) -> Result<Response, WebError> {
    match outcome {
        Outcome::Render(view) => {
            let flash = state.flash().take(headers)?;
            let mut response = Html(views::render(&view, flash.as_ref())).into_response();
            if flash::token_from_headers(headers).is_some() {
                let cookie = HeaderValue::from_str(&flash::clear_cookie())
                    .map_err(|e| WebError::Internal(e.to_string()))?;
                response.headers_mut().insert(SET_COOKIE, cookie);
            }
            Ok(response)
        }
        Outcome::Redirect { location, flash } => {
            let token = state.flash().replace(headers, flash)?;
            Ok((
                StatusCode::FOUND,
                [
                    (LOCATION, location.to_string()),
                    (SET_COOKIE, flash::set_cookie(token)),
                ],
            )
                .into_response())
        }
    }
}

/// Path ids must be integers.
fn parse_drug_id(raw: &str) -> Result<i64, WebError> {
    raw.trim()
        .parse()
        .map_err(|_| WebError::BadRequest(format!("Invalid drug id: {}", raw)))
}

/// `page` defaults to 1 when absent or empty.
fn parse_page(raw: Option<&str>) -> Result<i64, WebError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(value) => value
            .parse()
            .map_err(|_| WebError::BadRequest(format!("Invalid page number: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_drug_ids() {
        assert_eq!(parse_drug_id("42").unwrap(), 42);
        assert!(matches!(parse_drug_id("abc"), Err(WebError::BadRequest(_))));
        assert!(matches!(parse_drug_id("1.5"), Err(WebError::BadRequest(_))));
    }

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("")).unwrap(), 1);
        assert_eq!(parse_page(Some("3")).unwrap(), 3);
        assert!(matches!(parse_page(Some("x")), Err(WebError::BadRequest(_))));
    }
}
