//! JSON API router
//!
//! Transport independent: takes a method, the request target and the raw
//! body, and returns a status with a JSON value. `http.rs` wires it to a
//! socket; tests call [`handle`] directly.
//!
//! | Route | Success |
//! |---|---|
//! | `GET /api/users/google/:googleId` | 200 user |
//! | `POST /api/users` | 201 user |
//! | `PUT /api/users/:id/highscore` | 200 user (possibly unchanged) |
//! | `GET /api/leaderboard?limit=N` | 200 users, best first |

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use super::model::NewUser;
use super::store::{StoreError, UserStore};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub const MAX_LEADERBOARD_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    fn json<T: Serialize>(status: u16, payload: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_value(payload).map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(Self { status, body })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn invalid(message: &str) -> Self {
        ApiError::Validation {
            message: message.to_string(),
            details: None,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation { .. } => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Validation {
                details: Some(details),
                ..
            } => json!({ "message": self.to_string(), "details": details }),
            _ => json!({ "message": self.to_string() }),
        };
        Response {
            status: self.status(),
            body,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound(err.to_string()),
            StoreError::Duplicate(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

/// Route one request
pub fn handle<S: UserStore + ?Sized>(store: &mut S, method: Method, target: &str, body: &str) -> Response {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let result = path
        .trim_matches('/')
        .split('/')
        .map(decode_component)
        .collect::<Result<Vec<String>, ApiError>>()
        .and_then(|decoded| {
            let segments: Vec<&str> = decoded.iter().map(String::as_str).collect();
            match (method, segments.as_slice()) {
                (Method::Get, ["api", "users", "google", google_id]) => {
                    get_by_google_id(store, google_id)
                }
                (Method::Post, ["api", "users"]) => create_user(store, body),
                (Method::Put, ["api", "users", id, "highscore"]) => {
                    update_high_score(store, id, body)
                }
                (Method::Get, ["api", "leaderboard"]) => leaderboard(store, query),
                _ => Err(ApiError::NotFound("Not found".to_string())),
            }
        });

    result.unwrap_or_else(|err| {
        match &err {
            ApiError::Internal(reason) => log::error!("{:?} {} failed: {}", method, path, reason),
            _ => log::warn!("{:?} {} rejected: {}", method, path, err),
        }
        err.into_response()
    })
}

fn get_by_google_id<S: UserStore + ?Sized>(store: &S, google_id: &str) -> Result<Response, ApiError> {
    let user = store
        .get_user_by_google_id(google_id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Response::json(200, &user)
}

fn create_user<S: UserStore + ?Sized>(store: &mut S, body: &str) -> Result<Response, ApiError> {
    let new: NewUser = serde_json::from_str(body).map_err(|e| ApiError::Validation {
        message: "Validation error".to_string(),
        details: Some(e.to_string()),
    })?;
    new.validate().map_err(|details| ApiError::Validation {
        message: "Validation error".to_string(),
        details: Some(details),
    })?;

    if store.get_user_by_google_id(&new.google_id).is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let user = store.create_user(new)?;
    log::info!("Registered user {} ({})", user.id, user.username);
    Response::json(201, &user)
}

fn update_high_score<S: UserStore + ?Sized>(store: &mut S, id: &str, body: &str) -> Result<Response, ApiError> {
    let score = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("score").and_then(Value::as_u64))
        .ok_or_else(|| ApiError::invalid("Invalid score value"))?;
    let id: u64 = id.parse().map_err(|_| ApiError::invalid("Invalid user ID"))?;

    let user = store.update_high_score(id, score)?;
    Response::json(200, &user)
}

fn leaderboard<S: UserStore + ?Sized>(store: &S, query: &str) -> Result<Response, ApiError> {
    // An absent or empty limit falls back to the default
    let limit = match query_param(query, "limit")? {
        None => DEFAULT_LEADERBOARD_LIMIT,
        Some(raw) if raw.is_empty() => DEFAULT_LEADERBOARD_LIMIT,
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=MAX_LEADERBOARD_LIMIT).contains(n))
            .ok_or_else(|| ApiError::invalid("Invalid limit parameter"))?,
    };
    Response::json(200, &store.top_scores(limit))
}

/// Decoded value of the first `name=value` pair in the query string
fn query_param(query: &str, name: &str) -> Result<Option<String>, ApiError> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| decode_component(&value.replace('+', " ")))
        .transpose()
}

/// Percent-decode one path segment or query value
fn decode_component(raw: &str) -> Result<String, ApiError> {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ApiError::Validation {
            message: "Malformed URL".to_string(),
            details: Some(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::store::MemStore;

    fn register(store: &mut MemStore, name: &str) -> u64 {
        let body = format!(r#"{{"username":"{name}","email":"{name}@example.com","googleId":"g-{name}"}}"#);
        let resp = handle(store, Method::Post, "/api/users", &body);
        assert_eq!(resp.status, 201);
        resp.body["id"].as_u64().unwrap()
    }

    #[test]
    fn test_create_and_fetch() {
        let mut store = MemStore::new();
        let id = register(&mut store, "ana");

        let resp = handle(&mut store, Method::Get, "/api/users/google/g-ana", "");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["id"], id);
        assert_eq!(resp.body["highScore"], 0);

        let resp = handle(&mut store, Method::Get, "/api/users/google/g-nobody", "");
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body["message"], "User not found");
    }

    #[test]
    fn test_create_validation() {
        let mut store = MemStore::new();
        let resp = handle(&mut store, Method::Post, "/api/users", r#"{"username":"ana"}"#);
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body["message"], "Validation error");
        assert!(resp.body["details"].is_string());

        let bad_email = r#"{"username":"ana","email":"nope","googleId":"g"}"#;
        assert_eq!(handle(&mut store, Method::Post, "/api/users", bad_email).status, 400);
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_username_conflicts() {
        let mut store = MemStore::new();
        register(&mut store, "ana");
        let body = r#"{"username":"ana","email":"x@example.com","googleId":"g-x"}"#;
        let resp = handle(&mut store, Method::Post, "/api/users", body);
        assert_eq!(resp.status, 409);
        assert_eq!(resp.body["message"], "User with this username already exists");
    }

    #[test]
    fn test_high_score_validation() {
        let mut store = MemStore::new();
        let id = register(&mut store, "ana");
        let path = format!("/api/users/{id}/highscore");

        for body in [r#"{"score":-5}"#, r#"{"score":"12"}"#, r#"{"score":1.5}"#, "{}", "junk"] {
            let resp = handle(&mut store, Method::Put, &path, body);
            assert_eq!(resp.status, 400, "body {body}");
            assert_eq!(resp.body["message"], "Invalid score value");
        }

        let resp = handle(&mut store, Method::Put, "/api/users/abc/highscore", r#"{"score":5}"#);
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body["message"], "Invalid user ID");

        let resp = handle(&mut store, Method::Put, "/api/users/42/highscore", r#"{"score":5}"#);
        assert_eq!(resp.status, 404);

        let resp = handle(&mut store, Method::Put, &path, r#"{"score":250}"#);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["highScore"], 250);
    }

    #[test]
    fn test_leaderboard_limits() {
        let mut store = MemStore::new();
        for (i, name) in ["ana", "bo", "cy"].iter().enumerate() {
            let id = register(&mut store, name);
            let body = format!(r#"{{"score":{}}}"#, (i + 1) * 100);
            handle(&mut store, Method::Put, &format!("/api/users/{id}/highscore"), &body);
        }

        let resp = handle(&mut store, Method::Get, "/api/leaderboard", "");
        assert_eq!(resp.status, 200);
        let scores: Vec<u64> = resp
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["highScore"].as_u64().unwrap())
            .collect();
        assert_eq!(scores, vec![300, 200, 100]);

        let resp = handle(&mut store, Method::Get, "/api/leaderboard?limit=2", "");
        assert_eq!(resp.body.as_array().map(Vec::len), Some(2));

        for bad in ["0", "101", "ten", "-3"] {
            let resp = handle(&mut store, Method::Get, &format!("/api/leaderboard?limit={bad}"), "");
            assert_eq!(resp.status, 400, "limit {bad}");
            assert_eq!(resp.body["message"], "Invalid limit parameter");
        }
    }

    #[test]
    fn test_leaderboard_empty_or_encoded_limit() {
        let mut store = MemStore::new();
        for name in ["ana", "bo", "cy"] {
            register(&mut store, name);
        }
        let resp = handle(&mut store, Method::Get, "/api/leaderboard?limit=", "");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body.as_array().map(Vec::len), Some(3));

        let resp = handle(&mut store, Method::Get, "/api/leaderboard?limit=%32", "");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_encoded_path_segments() {
        let mut store = MemStore::new();
        let body = r#"{"username":"ana","email":"ana@example.com","googleId":"google-oauth2|42 x"}"#;
        let created = handle(&mut store, Method::Post, "/api/users", body);
        assert_eq!(created.status, 201);

        let resp = handle(&mut store, Method::Get, "/api/users/google/google-oauth2%7C42%20x", "");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["googleId"], "google-oauth2|42 x");

        let resp = handle(&mut store, Method::Put, "/api/users/%31/highscore", r#"{"score":70}"#);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["highScore"], 70);

        // Invalid UTF-8 after decoding
        let resp = handle(&mut store, Method::Get, "/api/users/google/%FF", "");
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body["message"], "Malformed URL");
    }

    #[test]
    fn test_unknown_route() {
        let mut store = MemStore::new();
        assert_eq!(handle(&mut store, Method::Get, "/api/nothing", "").status, 404);
        assert_eq!(handle(&mut store, Method::Other, "/api/users", "").status, 404);
    }
}
