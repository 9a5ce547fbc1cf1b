use chrono::Utc;
use collector_portal::{
    AppConfig, AppState, MockDiagnosticSink, MockRepository, create_router,
    auth::Claims,
    diag::DiagState,
    repository::RepositoryState,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    address: String,
    config: AppConfig,
}

async fn spawn_app() -> TestApp {
    let repo: RepositoryState = Arc::new(MockRepository::new());
    let diag: DiagState = Arc::new(MockDiagnosticSink::new());
    let config = AppConfig::default();

    let state = AppState {
        repo,
        diag,
        config: config.clone(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, config }
}

fn token(config: &AppConfig, user_type: Option<&str>, exp_offset_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4(),
        user_type: user_type.map(str::to_string),
        exp: (now + exp_offset_secs) as usize,
        iat: now as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn bearer_token_with_admin_claim_reaches_admin_endpoints() {
    let app = spawn_app().await;
    let token = token(&app.config, Some("admin"), 3600);

    let response = reqwest::Client::new()
        .get(format!("{}/api/admin/pending-deposits", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn expired_token_is_rejected_with_401() {
    let app = spawn_app().await;
    let token = token(&app.config, Some("admin"), -3600);

    let response = reqwest::Client::new()
        .get(format!("{}/api/admin/pending-deposits", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn token_signed_with_the_wrong_secret_is_rejected() {
    let app = spawn_app().await;
    let mut other = app.config.clone();
    other.jwt_secret = "not-the-signing-secret".to_string();
    let token = token(&other, Some("admin"), 3600);

    let response = reqwest::Client::new()
        .get(format!("{}/api/admin/pending-deposits", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn roleless_token_at_root_is_sent_to_login() {
    let app = spawn_app().await;
    // Valid, authenticated token without a userType claim.
    let token = token(&app.config, None, 3600);

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let response = client
        .get(format!("{}/", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/login");
}

#[tokio::test]
async fn roleless_token_on_an_admin_path_fails_closed() {
    let app = spawn_app().await;
    let token = token(&app.config, Some("auditor"), 3600);

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let response = client
        .get(format!("{}/admin/dashboard", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/collectors/dashboard");
}
