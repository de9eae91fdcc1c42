//! Full round trip over a real TCP socket with a cookie-keeping HTTP client.

use reqwest::{header, redirect::Policy, StatusCode};
use server::{routes, startup::prepare_db, state::AccountState};
use service::account::session::SessionKeys;

async fn spawn_account_service() -> anyhow::Result<(tempfile::TempDir, String)> {
    let dir = tempfile::tempdir()?;
    let mut cfg = configs::DatabaseConfig::default();
    cfg.url = format!("sqlite://{}?mode=rwc", dir.path().join("account.db").display());
    let db = prepare_db(&cfg).await?;
    let state = AccountState::new(db, SessionKeys::new("e2e-secret", 1), false);
    let app = routes::build_account_router(state, tower_http::cors::CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((dir, format!("http://{addr}")))
}

async fn csrf(client: &reqwest::Client, url: &str) -> anyhow::Result<String> {
    let json: serde_json::Value = client.get(url).header(header::ACCEPT, "application/json").send().await?.json().await?;
    Ok(json["csrf_token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn register_login_profile_logout() -> anyhow::Result<()> {
    let (_dir, base) = spawn_account_service().await?;
    let client = reqwest::Client::builder().cookie_store(true).redirect(Policy::none()).build()?;

    let token = csrf(&client, &format!("{base}/register")).await?;
    let resp = client
        .post(format!("{base}/register"))
        .form(&[
            ("username", "grace"),
            ("email", "grace@example.com"),
            ("password", "Hopper-1906"),
            ("confirm_password", "Hopper-1906"),
            ("csrf_token", token.as_str()),
        ])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/login");

    let token = csrf(&client, &format!("{base}/login")).await?;
    let resp = client
        .post(format!("{base}/login"))
        .form(&[("email", "grace@example.com"), ("password", "Hopper-1906"), ("csrf_token", token.as_str())])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    let me: serde_json::Value = client.get(format!("{base}/?format=json")).send().await?.json().await?;
    assert_eq!(me["username"], "grace");

    let resp = client.get(format!("{base}/logout")).send().await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let resp = client.get(format!("{base}/")).header(header::ACCEPT, "application/json").send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
