use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::HashingCost;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth_service::domain::user::service::UserService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub repository: InMemoryUserRepository,
    pub authenticator: Arc<Authenticator>,
    pub api_client: reqwest::Client,
}

/// Authenticator with a cheap hashing cost so tests stay fast
pub fn test_authenticator() -> Arc<Authenticator> {
    let hasher = PasswordHasher::with_cost(HashingCost {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
    .expect("Failed to build password hasher");
    let issuer = TokenIssuer::new(
        JWT_SECRET,
        chrono::Duration::minutes(15),
        chrono::Duration::days(7),
    );
    Arc::new(Authenticator::new(hasher, issuer))
}

/// Signup body used by most tests
pub fn signup_body() -> Value {
    json!({
        "email": "a@x.com",
        "phone": "555",
        "password": "pw",
        "first_name": "A",
        "last_name": "B",
        "user_type": "USER"
    })
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = InMemoryUserRepository::new();
        let authenticator = test_authenticator();

        let user_service = Arc::new(UserService::new(
            Arc::new(repository.clone()),
            Arc::clone(&authenticator),
            Duration::from_secs(100),
        ));

        let router = create_router(user_service, Arc::clone(&authenticator));

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            authenticator,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Sign up with `body` and return the response JSON
    pub async fn signup(&self, body: &Value) -> (reqwest::StatusCode, Value) {
        let response = self
            .post("/signup")
            .json(body)
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status();
        let body = response.json().await.expect("Failed to parse response");
        (status, body)
    }

    /// Log in and return the response JSON
    pub async fn login(&self, email: &str, password: &str) -> (reqwest::StatusCode, Value) {
        let response = self
            .post("/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status();
        let body = response.json().await.expect("Failed to parse response");
        (status, body)
    }
}
