//! Shared harness: the full router over the in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use market_academy::adapters::http::{build_router, AppState, Repositories};
use market_academy::adapters::{InMemoryStore, MockPaymentGateway, MockSessionValidator};
use market_academy::config::ServerConfig;
use market_academy::domain::commerce::{PaymentSignatureVerifier, WebhookSignatureVerifier};
use market_academy::domain::foundation::Role;

pub const KEY_SECRET: &str = "rzp_key_secret";
pub const WEBHOOK_SECRET: &str = "whsec_integration";

pub const ADMIN: &str = "admin-token";
pub const INSTRUCTOR: &str = "instructor-token";
pub const OTHER_INSTRUCTOR: &str = "other-instructor-token";
pub const STUDENT: &str = "student-token";
pub const OTHER_STUDENT: &str = "other-student-token";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub gateway: Arc<MockPaymentGateway>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let gateway = Arc::new(MockPaymentGateway::new());
        let state = AppState::new(
            Repositories::in_memory(store.clone()),
            gateway.clone(),
            PaymentSignatureVerifier::new(KEY_SECRET),
            WebhookSignatureVerifier::new(WEBHOOK_SECRET),
        );
        let validator = MockSessionValidator::new()
            .with_test_user(ADMIN, "admin-1", Role::Admin)
            .with_test_user(INSTRUCTOR, "instructor-1", Role::Instructor)
            .with_test_user(OTHER_INSTRUCTOR, "instructor-2", Role::Instructor)
            .with_test_user(STUDENT, "student-1", Role::Student)
            .with_test_user(OTHER_STUDENT, "student-2", Role::Student);
        let router = build_router(state, Arc::new(validator), &ServerConfig::default());
        Self {
            router,
            store,
            gateway,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, None).await
    }

    /// Creates and publishes a course with one module of `lessons` lessons.
    /// Returns the course id and lesson ids in order.
    pub async fn published_course(
        &self,
        slug: &str,
        price: Option<u64>,
        lessons: usize,
    ) -> (String, Vec<String>) {
        let mut request = serde_json::json!({
            "slug": slug,
            "title": format!("Course {slug}"),
            "summary": "Reading the tape",
            "level": "beginner",
        });
        if let Some(amount) = price {
            request["price"] = serde_json::json!({ "amount": amount, "currency": "INR" });
        }
        let (status, course) = self
            .post("/api/instructor/courses", Some(INSTRUCTOR), request)
            .await;
        assert_eq!(status, StatusCode::CREATED, "{course}");
        let course_id = course["id"].as_str().unwrap().to_string();

        let (status, module) = self
            .post(
                &format!("/api/instructor/courses/{course_id}/modules"),
                Some(INSTRUCTOR),
                serde_json::json!({ "title": "Foundations" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{module}");
        let module_id = module["created_id"].as_str().unwrap().to_string();

        let mut lesson_ids = Vec::new();
        for n in 1..=lessons {
            let (status, lesson) = self
                .post(
                    &format!("/api/instructor/courses/{course_id}/modules/{module_id}/lessons"),
                    Some(INSTRUCTOR),
                    serde_json::json!({
                        "title": format!("Lesson {n}"),
                        "duration_minutes": 10,
                        "video_url": format!("https://cdn.example.com/{slug}/{n}.mp4"),
                        "body": format!("Notes for lesson {n}"),
                    }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{lesson}");
            lesson_ids.push(lesson["created_id"].as_str().unwrap().to_string());
        }

        let (status, published) = self
            .post_empty(
                &format!("/api/instructor/courses/{course_id}/publish"),
                Some(INSTRUCTOR),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{published}");

        (course_id, lesson_ids)
    }
}
