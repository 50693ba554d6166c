//! HTTP-level tests of the drug pages through the full router.

use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use tower::ServiceExt;

use vet_drugs_core::{Database, Drug, DrugRepository};
use vet_drugs_web::flash::{FlashStore, FLASH_TTL};
use vet_drugs_web::{drug_router, AppState};

fn test_app() -> (Router, AppState) {
    let state = AppState::new(Database::open_in_memory().unwrap());
    (drug_router(state.clone()), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` part of the response's `Set-Cookie` header.
fn cookie_pair(response: &Response<Body>) -> String {
    let header = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    header.split(';').next().unwrap().to_string()
}

fn stored(state: &AppState, id: i64) -> Option<Drug> {
    state
        .with_controller(|c| Ok(c.repository().find_by_id(id)?))
        .unwrap()
}

fn seed(state: &AppState, count: usize) {
    state
        .with_controller(|c| {
            for i in 0..count {
                c.repository()
                    .save(&Drug::new(format!("Drug {:02}", i), Decimal::ONE))?;
            }
            Ok(())
        })
        .unwrap();
}

#[tokio::test]
async fn new_form_renders_empty() {
    let (app, _) = test_app();

    let response = app.oneshot(get("/drugs/new")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("New Drug"));
    assert!(html.contains("name=\"name\" value=\"\""));
    assert!(html.contains("name=\"price\" value=\"\""));
}

#[tokio::test]
async fn create_redirects_with_flash_shown_once() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(post_form("/drugs/new", "name=Amoxicillin&price=12.50"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/drugs");
    let cookie = cookie_pair(&response);

    // First page after the redirect shows the message and expires the cookie
    let response = app
        .clone()
        .oneshot(get_with_cookie("/drugs?page=1", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
    let html = body_text(response).await;
    assert!(html.contains("New Drug Created"));
    assert!(html.contains("Amoxicillin"));
    assert!(html.contains("12.50"));

    // A second visit with the same cookie no longer sees it
    let response = app
        .oneshot(get_with_cookie("/drugs?page=1", &cookie))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(!html.contains("New Drug Created"));
    assert!(html.contains("Amoxicillin"));
}

#[tokio::test]
async fn create_validation_failure_rerenders_form() {
    let (app, state) = test_app();

    let response = app
        .oneshot(post_form("/drugs/new", "name=&price=-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("There was an error in creating the drug."));
    assert!(html.contains("name must not be empty"));
    assert!(html.contains("price must be ≥ 0"));

    assert_eq!(state.flash().pending().unwrap(), 0);
    assert!(stored(&state, 1).is_none());
}

#[tokio::test]
async fn price_precision_rules() {
    let (app, state) = test_app();

    for body in ["name=A&price=10000", "name=A&price=12.345"] {
        let response = app.clone().oneshot(post_form("/drugs/new", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{} should be rejected", body);
    }

    let response = app
        .oneshot(post_form("/drugs/new", "name=A&price=9999.00"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(stored(&state, 1).unwrap().price, Some(Decimal::from(9999)));
}

#[tokio::test]
async fn create_ignores_id_in_body() {
    let (app, state) = test_app();
    seed(&state, 2);

    let response = app
        .oneshot(post_form("/drugs/new", "id=1&name=Forged&price=2.00"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    // Existing row 1 untouched, new row got the next id
    assert_eq!(stored(&state, 1).unwrap().name, "Drug 00");
    assert_eq!(stored(&state, 3).unwrap().name, "Forged");
}

#[tokio::test]
async fn missing_form_field_is_bad_request() {
    let (app, state) = test_app();

    let response = app
        .oneshot(post_form("/drugs/new", "name=Amoxicillin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(stored(&state, 1).is_none());
}

#[tokio::test]
async fn update_uses_path_id() {
    let (app, state) = test_app();
    seed(&state, 7);

    let response = app
        .clone()
        .oneshot(post_form("/drugs/7/edit", "id=99&name=X&price=1.00"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/drugs");
    let cookie = cookie_pair(&response);

    let drug = stored(&state, 7).unwrap();
    assert_eq!(drug.id, Some(7));
    assert_eq!(drug.name, "X");
    assert_eq!(drug.price, Some(Decimal::new(100, 2)));
    assert!(stored(&state, 99).is_none());

    let response = app
        .oneshot(get_with_cookie("/drugs", &cookie))
        .await
        .unwrap();
    assert!(body_text(response).await.contains("Drug Values Updated"));
}

#[tokio::test]
async fn update_validation_failure_rerenders_form() {
    let (app, state) = test_app();
    seed(&state, 1);

    let response = app
        .oneshot(post_form("/drugs/1/edit", "name=Renamed&price=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("There was an error in updating the drug."));
    assert!(html.contains("price must be a decimal number"));
    assert!(html.contains("value=\"abc\""));

    assert_eq!(stored(&state, 1).unwrap().name, "Drug 00");
}

#[tokio::test]
async fn edit_form_preloads_drug() {
    let (app, state) = test_app();
    seed(&state, 1);

    let response = app.oneshot(get("/drugs/1/edit")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("value=\"Drug 00\""));
    assert!(html.contains("value=\"1.00\""));
    assert!(html.contains("action=\"/drugs/1/edit\""));
}

#[tokio::test]
async fn edit_unknown_id_is_404() {
    let (app, _) = test_app();

    let response = app.clone().oneshot(get("/drugs/42/edit")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Drug not found with id: 42"));

    let response = app
        .oneshot(post_form("/drugs/42/edit", "name=X&price=1.00"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_path_id_is_400() {
    let (app, _) = test_app();

    let response = app.clone().oneshot(get("/drugs/abc/edit")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/drugs/abc/delete")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pagination_third_page() {
    let (app, state) = test_app();
    seed(&state, 12);

    let response = app.oneshot(get("/drugs?page=3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert_eq!(html.matches("<tr><td>").count(), 2);
    assert!(html.contains("<span id=\"totalItems\">12</span>"));
    assert!(html.contains("Pages: [3]"));
    assert!(html.contains("<span class=\"current\">3</span>"));
}

#[tokio::test]
async fn page_out_of_range_is_empty() {
    let (app, state) = test_app();
    seed(&state, 3);

    let response = app.oneshot(get("/drugs?page=9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert_eq!(html.matches("<tr><td>").count(), 0);
    assert!(html.contains("<span id=\"totalItems\">3</span>"));
}

#[tokio::test]
async fn bad_page_parameter_is_400() {
    let (app, _) = test_app();

    let response = app.clone().oneshot(get("/drugs?page=zero")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/drugs?page=0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_by_name_prefix() {
    let (app, state) = test_app();
    seed(&state, 3);
    state
        .with_controller(|c| {
            c.repository()
                .save(&Drug::new("Amoxicillin".into(), Decimal::ONE))?;
            Ok(())
        })
        .unwrap();

    let response = app.oneshot(get("/drugs?name=Amox")).await.unwrap();
    let html = body_text(response).await;
    assert_eq!(html.matches("<tr><td>").count(), 1);
    assert!(html.contains("Amoxicillin"));
}

#[tokio::test]
async fn delete_twice_redirects_both_times() {
    let (app, state) = test_app();
    seed(&state, 1);

    for _ in 0..2 {
        let response = app.clone().oneshot(get("/drugs/1/delete")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/drugs");
        let cookie = cookie_pair(&response);

        let response = app
            .clone()
            .oneshot(get_with_cookie("/drugs", &cookie))
            .await
            .unwrap();
        assert!(body_text(response).await.contains("Drug Deleted"));
    }
    assert!(stored(&state, 1).is_none());
}

#[tokio::test]
async fn unfollowed_redirects_keep_flash_store_bounded() {
    let state = AppState::with_flash_store(
        Database::open_in_memory().unwrap(),
        FlashStore::with_limits(FLASH_TTL, 10),
    );
    let app = drug_router(state.clone());
    seed(&state, 1);

    for _ in 0..100 {
        let response = app.clone().oneshot(get("/drugs/1/delete")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
    }
    let response = app
        .oneshot(post_form("/drugs/new", "name=Amoxicillin&price=1.00"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    assert_eq!(state.flash().pending().unwrap(), 10);
}

#[tokio::test]
async fn chained_redirect_replaces_pending_flash() {
    let (app, state) = test_app();
    seed(&state, 3);

    let response = app.clone().oneshot(get("/drugs/1/delete")).await.unwrap();
    let mut cookie = cookie_pair(&response);

    // The browser carries the unread flash into the next redirecting request
    for id in 2..=3 {
        let response = app
            .clone()
            .oneshot(get_with_cookie(&format!("/drugs/{}/delete", id), &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        cookie = cookie_pair(&response);
    }
    assert_eq!(state.flash().pending().unwrap(), 1);

    let response = app
        .oneshot(get_with_cookie("/drugs", &cookie))
        .await
        .unwrap();
    assert!(body_text(response).await.contains("Drug Deleted"));
    assert_eq!(state.flash().pending().unwrap(), 0);
}
