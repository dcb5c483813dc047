use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

pub struct TestServer {
    pub base_url: String,
    child: Child,
}

impl TestServer {
    /// Spawn the server binary against the database in DATABASE_URL.
    /// Returns None when no database is configured so callers can skip.
    pub async fn start() -> Result<Option<Self>> {
        dotenvy::dotenv().ok();
        if std::env::var("DATABASE_URL").map(|v| v.trim().is_empty()).unwrap_or(true) {
            eprintln!("DATABASE_URL not set, skipping");
            return Ok(None);
        }

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_catalog-api"))
            .env("PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("PROTECT_ENABLED", "false")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self { base_url, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(Some(server))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                // 503 still means the listener is up
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
