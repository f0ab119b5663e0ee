//! Bet ledger flows through the HTTP API.
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::test_utils::TestApp;

async fn create(app: &TestApp, cookie: &str, einsatz: f64, quote: f64, team: &str) -> Value {
    let response = app
        .request(
            Method::POST,
            "/api/bets",
            Some(cookie),
            Some(json!({ "einsatz": einsatz, "quote": quote, "mannschaft": team })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["message"], "Wette erfolgreich erstellt");
    response.body["bet"].clone()
}

async fn settle(app: &TestApp, cookie: &str, id: i64, result: &str) -> crate::test_utils::TestResponse {
    app.request(
        Method::PUT,
        &format!("/api/bets/{id}/result"),
        Some(cookie),
        Some(json!({ "result": result })),
    )
    .await
}

#[tokio::test]
async fn test_bet_routes_require_session_before_validation() {
    let app = TestApp::new().await;
    let invalid = Some(json!({ "einsatz": -5 }));

    let responses = [
        app.request(Method::GET, "/api/bets", None, None).await,
        app.request(Method::POST, "/api/bets", None, invalid.clone()).await,
        app.request(Method::PUT, "/api/bets/1/result", None, Some(json!({}))).await,
        app.request(Method::GET, "/api/bets/1/winnings", None, None).await,
        app.request(Method::DELETE, "/api/bets/1", None, None).await,
    ];
    for response in responses {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.error_code(), Some("AUTH_003"));
    }
}

#[tokio::test]
async fn test_create_and_list_with_statistics() {
    let app = TestApp::new().await;
    let cookie = app.register("alice@example.com").await;

    let empty = app.request(Method::GET, "/api/bets", Some(&cookie), None).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["bets"], json!([]));
    assert_eq!(empty.body["statistics"]["totalBets"], 0);
    assert_eq!(empty.body["statistics"]["profitPercentage"], "0.00");

    let won = create(&app, &cookie, 10.0, 2.0, "Bayern").await;
    let lost = create(&app, &cookie, 20.0, 1.5, "Dortmund").await;
    let open = create(&app, &cookie, 30.0, 3.0, "Leipzig").await;
    assert!(open["result"].is_null());
    assert!(open["is_won"].is_null());

    settle(&app, &cookie, won["id"].as_i64().unwrap(), "gewonnen").await;
    settle(&app, &cookie, lost["id"].as_i64().unwrap(), "verloren").await;

    let listing = app.request(Method::GET, "/api/bets", Some(&cookie), None).await;
    assert_eq!(listing.status, StatusCode::OK);

    let ids: Vec<i64> = listing.body["bets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![open["id"].as_i64().unwrap(), lost["id"].as_i64().unwrap(), won["id"].as_i64().unwrap()]);

    let stats = &listing.body["statistics"];
    assert_eq!(stats["totalBets"], 3);
    assert_eq!(stats["totalStake"].as_f64(), Some(60.0));
    assert_eq!(stats["totalWinnings"].as_f64(), Some(20.0));
    assert_eq!(stats["profit"].as_f64(), Some(-40.0));
    assert_eq!(stats["profitPercentage"], "-66.67");

    // listing has no side effects
    let again = app.request(Method::GET, "/api/bets", Some(&cookie), None).await;
    assert_eq!(again.body, listing.body);
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let app = TestApp::new().await;
    let cookie = app.register("alice@example.com").await;

    let bodies = [
        json!({ "quote": 2.0, "mannschaft": "BVB" }),
        json!({ "einsatz": 10, "mannschaft": "BVB" }),
        json!({ "einsatz": 10, "quote": 2.0 }),
        json!({ "einsatz": -10, "quote": 2.0, "mannschaft": "BVB" }),
        json!({ "einsatz": 10, "quote": -2.0, "mannschaft": "BVB" }),
        json!({ "einsatz": "ten", "quote": 2.0, "mannschaft": "BVB" }),
    ];
    for body in bodies {
        let response = app.request(Method::POST, "/api/bets", Some(&cookie), Some(body.clone())).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.error_code(), Some("VAL_001"));
    }

    let listing = app.request(Method::GET, "/api/bets", Some(&cookie), None).await;
    assert_eq!(listing.body["bets"], json!([]));
}

#[tokio::test]
async fn test_oversized_amounts_are_rejected() {
    let app = TestApp::new().await;
    let cookie = app.register("alice@example.com").await;

    let bodies = [
        json!({ "einsatz": 1e27, "quote": 2.0, "mannschaft": "BVB" }),
        json!({ "einsatz": "1000000000000000000000000000", "quote": 2, "mannschaft": "BVB" }),
        json!({ "einsatz": 10, "quote": 1e27, "mannschaft": "BVB" }),
        json!({ "einsatz": 1000000001, "quote": 2.0, "mannschaft": "BVB" }),
    ];
    for body in bodies {
        let response = app.request(Method::POST, "/api/bets", Some(&cookie), Some(body.clone())).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.error_code(), Some("VAL_001"));
        assert_eq!(response.body["error"], "Einsatz oder Quote ist zu groß");
    }

    // the largest accepted bet settles and lists without overflow
    let id = create(&app, &cookie, 1e9, 1e5, "BVB").await["id"].as_i64().unwrap();
    let settled = settle(&app, &cookie, id, "gewonnen").await;
    assert_eq!(settled.status, StatusCode::OK);
    assert_eq!(settled.body["bet"]["winnings"].as_f64(), Some(1e14));

    let listing = app.request(Method::GET, "/api/bets", Some(&cookie), None).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["statistics"]["totalWinnings"].as_f64(), Some(1e14));
}

#[tokio::test]
async fn test_team_name_is_stored_verbatim() {
    let app = TestApp::new().await;
    let cookie = app.register("alice@example.com").await;

    let bet = create(&app, &cookie, 10.0, 2.0, "  Bayern München ").await;
    assert_eq!(bet["mannschaft"], "  Bayern München ");

    let blank = create(&app, &cookie, 10.0, 2.0, "   ").await;
    assert_eq!(blank["mannschaft"], "   ");

    let empty = app
        .request(
            Method::POST,
            "/api/bets",
            Some(&cookie),
            Some(json!({ "einsatz": 10, "quote": 2.0, "mannschaft": "" })),
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_settle_and_winnings() {
    let app = TestApp::new().await;
    let cookie = app.register("alice@example.com").await;
    let bet = create(&app, &cookie, 10.0, 2.5, "BVB").await;
    let id = bet["id"].as_i64().unwrap();

    let before = app
        .request(Method::GET, &format!("/api/bets/{id}/winnings"), Some(&cookie), None)
        .await;
    assert_eq!(before.status, StatusCode::OK);
    assert_eq!(before.body["potentialWinnings"].as_f64(), Some(25.0));
    assert_eq!(before.body["actualWinnings"].as_f64(), Some(0.0));
    assert!(before.body["isWon"].is_null());

    let response = settle(&app, &cookie, id, "GEWONNEN").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Wettenergebnis erfolgreich aktualisiert");
    assert_eq!(response.body["bet"]["is_won"], true);
    assert_eq!(response.body["bet"]["winnings"].as_f64(), Some(25.0));
    assert_eq!(response.body["bet"]["result"], "GEWONNEN");

    let after = app
        .request(Method::GET, &format!("/api/bets/{id}/winnings"), Some(&cookie), None)
        .await;
    assert_eq!(after.body["actualWinnings"].as_f64(), Some(25.0));
    assert_eq!(after.body["isWon"], true);
}

#[tokio::test]
async fn test_resettle_overwrites_outcome() {
    let app = TestApp::new().await;
    let cookie = app.register("alice@example.com").await;
    let id = create(&app, &cookie, 10.0, 2.0, "BVB").await["id"].as_i64().unwrap();

    assert_eq!(settle(&app, &cookie, id, "gewonnen").await.status, StatusCode::OK);
    let response = settle(&app, &cookie, id, "verloren").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["bet"]["is_won"], false);
    assert_eq!(response.body["bet"]["winnings"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_settle_requires_result() {
    let app = TestApp::new().await;
    let cookie = app.register("alice@example.com").await;
    let id = create(&app, &cookie, 10.0, 2.0, "BVB").await["id"].as_i64().unwrap();

    let response = app
        .request(Method::PUT, &format!("/api/bets/{id}/result"), Some(&cookie), Some(json!({})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VAL_001"));
}

#[tokio::test]
async fn test_foreign_bets_look_missing() {
    let app = TestApp::new().await;
    let alice = app.register("alice@example.com").await;
    let bob = app.register("bob@example.com").await;
    let id = create(&app, &alice, 10.0, 2.0, "BVB").await["id"].as_i64().unwrap();

    let responses = [
        settle(&app, &bob, id, "gewonnen").await,
        app.request(Method::GET, &format!("/api/bets/{id}/winnings"), Some(&bob), None).await,
        app.request(Method::DELETE, &format!("/api/bets/{id}"), Some(&bob), None).await,
        app.request(Method::DELETE, "/api/bets/99999", Some(&alice), None).await,
    ];
    for response in responses {
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error_code(), Some("NF_001"));
        assert_eq!(response.body["error"], "Wette nicht gefunden");
    }

    let bobs = app.request(Method::GET, "/api/bets", Some(&bob), None).await;
    assert_eq!(bobs.body["bets"], json!([]));

    let alices = app.request(Method::GET, "/api/bets", Some(&alice), None).await;
    assert_eq!(alices.body["bets"].as_array().unwrap().len(), 1);
    assert!(alices.body["bets"][0]["result"].is_null());
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = TestApp::new().await;
    let cookie = app.register("alice@example.com").await;
    let response = app
        .request(Method::GET, "/api/bets/abc/winnings", Some(&cookie), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_bet() {
    let app = TestApp::new().await;
    let cookie = app.register("alice@example.com").await;
    let id = create(&app, &cookie, 10.0, 2.0, "BVB").await["id"].as_i64().unwrap();
    settle(&app, &cookie, id, "verloren").await;

    let response = app
        .request(Method::DELETE, &format!("/api/bets/{id}"), Some(&cookie), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Wette erfolgreich gelöscht");

    let again = app
        .request(Method::DELETE, &format!("/api/bets/{id}"), Some(&cookie), None)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}
