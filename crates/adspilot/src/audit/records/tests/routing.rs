use super::common::*;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::audit::records::domain::{Viewer, ViewerRole};
use crate::audit::records::{viewer_from_headers, USER_ID_HEADER, USER_ROLE_HEADER};
use crate::config::AccessConfig;

fn request(
    method: Method,
    uri: &str,
    user: Option<(&str, &str)>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user_id, role)) = user {
        builder = builder
            .header(USER_ID_HEADER, user_id)
            .header(USER_ROLE_HEADER, role);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

fn submission_body(name: &str) -> Value {
    json!({
        "name": name,
        "module": "andromeda",
        "inputs": {
            "pmv": 75,
            "ltv": "120",
            "margin": "60",
            "targetRoas": 3,
            "target_volume": "80",
            "current_cpa": "35",
            "current_budget": "5000",
            "emq_score": "6",
            "niche": "ecom_fashion"
        }
    })
}

#[test]
fn viewer_headers_respect_admin_allow_list() {
    let access = admin_access(&["coach-1"]);
    let mut headers = HeaderMap::new();
    assert!(viewer_from_headers(&headers, &access).is_none());

    headers.insert(USER_ID_HEADER, HeaderValue::from_static("user-7"));
    assert_eq!(
        viewer_from_headers(&headers, &access),
        Some(Viewer::user("user-7"))
    );

    headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("ADMIN"));
    let viewer = viewer_from_headers(&headers, &access).expect("viewer");
    assert_eq!(viewer.role, ViewerRole::Admin);

    let mut promoted = HeaderMap::new();
    promoted.insert(USER_ID_HEADER, HeaderValue::from_static("coach-1"));
    assert!(viewer_from_headers(&promoted, &access)
        .expect("viewer")
        .is_admin());
}

#[tokio::test]
async fn benchmarks_route_lists_ten_niches() {
    let (service, _, _) = build_service();
    let router = audit_router_with_service(service, AccessConfig::default());

    let response = router
        .oneshot(request(Method::GET, "/api/v1/benchmarks", None, None))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn niche_fields_route_returns_category_fields() {
    let (service, _, _) = build_service();
    let router = audit_router_with_service(service, AccessConfig::default());

    let response = router
        .clone()
        .oneshot(request(Method::GET, "/api/v1/niches/local_services/fields", None, None))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let keys: Vec<&str> = body["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .filter_map(|field| field["key"].as_str())
        .collect();
    assert_eq!(keys, vec!["booking_cost", "closing_rate", "stop_rate", "churn_rate"]);

    let missing = router
        .oneshot(request(Method::GET, "/api/v1/niches/crypto/fields", None, None))
        .await
        .expect("router responds");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn anonymous_scoring_returns_outcome_and_report() {
    let (service, _, _) = build_service();
    let router = audit_router_with_service(service, AccessConfig::default());

    let response = router
        .oneshot(request(
            Method::POST,
            "/api/v1/audits/score",
            None,
            Some(submission_body("")),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["outcome"]["result"]["module"], "andromeda");
    assert_eq!(body["report"]["verdict_label"], "Rentable, à optimiser");
}

#[tokio::test]
async fn creative_route_scores_scan() {
    let (service, _, _) = build_service();
    let router = audit_router_with_service(service, AccessConfig::default());

    let response = router
        .oneshot(request(
            Method::POST,
            "/api/v1/creative/score",
            None,
            Some(json!({ "hook": 8, "offer": 6, "desirability": 7, "checklist": 8 })),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let average = body["weighted_average"].as_f64().expect("average");
    let ctr = body["estimated_ctr"].as_f64().expect("ctr");
    assert!((average - 7.1).abs() < 1e-9);
    assert!((ctr - 2.362).abs() < 1e-9);
}

#[tokio::test]
async fn submit_requires_identity() {
    let (service, _, _) = build_service();
    let router = audit_router_with_service(service, AccessConfig::default());

    let response = router
        .oneshot(request(
            Method::POST,
            "/api/v1/audits",
            None,
            Some(submission_body("Audit")),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn saved_audit_lifecycle_over_http() {
    let (service, _, _) = build_service();
    let router = audit_router_with_service(service, admin_access(&["coach"]));
    let owner = Some(("owner", "user"));

    let created = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/audits",
            owner,
            Some(submission_body("Boutique")),
        ))
        .await
        .expect("router responds");
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = read_json_body(created).await;
    let id = body["record"]["id"].as_str().expect("id").to_string();
    assert_eq!(body["record"]["type"], "andromeda");
    assert_eq!(body["advice"].as_array().map(Vec::len), Some(3));

    let forbidden = router
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/audits/{id}"),
            Some(("intruder", "user")),
            None,
        ))
        .await
        .expect("router responds");
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let noted = router
        .clone()
        .oneshot(request(
            Method::PUT,
            &format!("/api/v1/audits/{id}/note"),
            Some(("coach", "user")),
            Some(json!({ "note": "Appel prévu" })),
        ))
        .await
        .expect("router responds");
    assert_eq!(noted.status(), StatusCode::OK);
    assert_eq!(read_json_body(noted).await["has_note"], true);

    let listed = router
        .clone()
        .oneshot(request(Method::GET, "/api/v1/audits", owner, None))
        .await
        .expect("router responds");
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(read_json_body(listed).await.as_array().map(Vec::len), Some(1));

    let deleted = router
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/audits/{id}"),
            owner,
            None,
        ))
        .await
        .expect("router responds");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = router
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/audits/{id}"),
            owner,
            None,
        ))
        .await
        .expect("router responds");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_webhook_is_accepted_and_idempotent() {
    let (service, _, ledger) = build_service();
    let router = audit_router_with_service(service, AccessConfig::default());
    let event = json!({
        "event_id": "evt-42",
        "event_type": "checkout.completed",
        "user_id": "buyer",
        "product_name": "Scale & Sniper"
    });

    let first = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/webhooks/checkout",
            None,
            Some(event.clone()),
        ))
        .await
        .expect("router responds");
    assert_eq!(first.status(), StatusCode::ACCEPTED);
    let body = read_json_body(first).await;
    assert_eq!(body["status"], "recorded");
    assert_eq!(body["product"], "Scale & Sniper");

    let replay = router
        .oneshot(request(
            Method::POST,
            "/api/v1/webhooks/checkout",
            None,
            Some(event),
        ))
        .await
        .expect("router responds");
    assert_eq!(replay.status(), StatusCode::ACCEPTED);
    assert_eq!(read_json_body(replay).await["status"], "duplicate");
    assert_eq!(ledger.purchases().len(), 1);
}

#[tokio::test]
async fn checkout_webhook_checks_shared_secret_when_configured() {
    let (service, _, ledger) = build_service();
    let access = AccessConfig {
        checkout_secret: Some("whsec_test".to_string()),
        ..AccessConfig::default()
    };
    let router = audit_router_with_service(service, access);
    let event = json!({
        "event_id": "evt-7",
        "event_type": "order.completed",
        "user_id": "buyer",
        "product_name": "SOS Signal"
    });

    let rejected = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/webhooks/checkout",
            None,
            Some(event.clone()),
        ))
        .await
        .expect("router responds");
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
    assert!(ledger.purchases().is_empty());

    let mut signed = request(
        Method::POST,
        "/api/v1/webhooks/checkout",
        None,
        Some(event),
    );
    signed.headers_mut().insert(
        crate::audit::records::WEBHOOK_SECRET_HEADER,
        HeaderValue::from_static("whsec_test"),
    );
    let accepted = router.oneshot(signed).await.expect("router responds");
    assert_eq!(accepted.status(), StatusCode::ACCEPTED);
    assert_eq!(ledger.purchases().len(), 1);
}
