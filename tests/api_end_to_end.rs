//! Score API scenarios through the transport-independent router

use dash_runner::server::{MemStore, Method, UserStore, handle};
use serde_json::json;

fn register(store: &mut MemStore, name: &str, google_id: &str) -> serde_json::Value {
    let body = json!({
        "username": name,
        "email": format!("{name}@example.com"),
        "googleId": google_id,
        "avatarUrl": "https://example.com/a.png",
    });
    let resp = handle(store, Method::Post, "/api/users", &body.to_string());
    assert_eq!(resp.status, 201, "{}", resp.body);
    resp.body
}

#[test]
fn lower_score_keeps_stored_value() {
    let mut store = MemStore::new();
    let user = register(&mut store, "ana", "g-ana");
    let path = format!("/api/users/{}/highscore", user["id"]);

    let resp = handle(&mut store, Method::Put, &path, r#"{"score":900}"#);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["highScore"], 900);

    let resp = handle(&mut store, Method::Put, &path, r#"{"score":350}"#);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["highScore"], 900);

    let fetched = handle(&mut store, Method::Get, "/api/users/google/g-ana", "");
    assert_eq!(fetched.body["highScore"], 900);
    assert_eq!(fetched.body["avatarUrl"], "https://example.com/a.png");
}

#[test]
fn duplicate_google_id_is_rejected() {
    let mut store = MemStore::new();
    register(&mut store, "ana", "g-shared");

    let body = json!({
        "username": "bo",
        "email": "bo@example.com",
        "googleId": "g-shared",
    });
    let resp = handle(&mut store, Method::Post, "/api/users", &body.to_string());
    assert_eq!(resp.status, 409);
    assert_eq!(resp.body, json!({ "message": "User already exists" }));
    assert_eq!(store.len(), 1);
    assert!(store.get_user(2).is_none());
}

#[test]
fn leaderboard_reflects_updates() {
    let mut store = MemStore::new();
    let scores = [("ana", 120), ("bo", 480), ("cy", 300)];
    for (name, score) in scores {
        let user = register(&mut store, name, &format!("g-{name}"));
        let path = format!("/api/users/{}/highscore", user["id"]);
        let body = json!({ "score": score }).to_string();
        assert_eq!(handle(&mut store, Method::Put, &path, &body).status, 200);
    }

    let resp = handle(&mut store, Method::Get, "/api/leaderboard?limit=2", "");
    assert_eq!(resp.status, 200);
    let names: Vec<&str> = resp
        .body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|u| u["username"].as_str())
        .collect();
    assert_eq!(names, vec!["bo", "cy"]);
}
