//! In-process test harness: in-memory database, full router, oneshot requests

#![allow(dead_code)]

use aqua_server::db::DbService;
use aqua_server::{AppState, accounts, api};
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    /// Fresh database with a bootstrapped admin
    pub async fn spawn() -> Self {
        let db = DbService::in_memory().await.unwrap();
        let state = AppState::for_pool(db.pool, "integration-test-secret");
        accounts::bootstrap_admin(&state.pool, ADMIN_USER, ADMIN_PASSWORD)
            .await
            .unwrap()
            .unwrap();
        let router = api::build_app(state.clone());
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(token), Some(body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                "/api/users/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body
    }

    pub async fn token(&self, username: &str, password: &str) -> String {
        self.login(username, password).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.token(ADMIN_USER, ADMIN_PASSWORD).await
    }

    /// Register a customer with one address; returns (user id, address id)
    pub async fn customer(&self, admin: &str, username: &str, special_price: Option<f64>) -> (i64, i64) {
        let (status, body) = self
            .post(
                "/api/users",
                admin,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "first_name": "Test",
                    "last_name": username,
                    "phone_number": "555-0100",
                    "role": "customer",
                    "special_bottle_price": special_price,
                    "password": format!("{username}-pw"),
                    "addresses": [{ "title": "Home" }],
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create customer failed: {body}");
        (
            body["id"].as_i64().unwrap(),
            body["addresses"][0]["id"].as_i64().unwrap(),
        )
    }

    /// Register a driver; returns the user id
    pub async fn driver(&self, admin: &str, username: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/users",
                admin,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "role": "driver",
                    "password": format!("{username}-pw"),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create driver failed: {body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn bottles(&self, admin: &str, count: u32) -> Vec<i64> {
        let (status, body) = self.post("/api/bottles", admin, json!({ "count": count })).await;
        assert_eq!(status, StatusCode::CREATED, "create bottles failed: {body}");
        body.as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_i64().unwrap())
            .collect()
    }

    pub async fn order(&self, token: &str, address_id: i64, quantity: i64) -> Value {
        let (status, body) = self
            .post(
                "/api/orders",
                token,
                json!({ "address_id": address_id, "quantity": quantity }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create order failed: {body}");
        body
    }
}
