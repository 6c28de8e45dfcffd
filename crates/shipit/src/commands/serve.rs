//! Preview server for the staged output.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use axum::Router;
use shipit_stage::OFFLINE_FILE;
use tower_http::services::{ServeDir, ServeFile};

use crate::report::Reporter;

/// Run the serve command.
///
/// Unknown paths are answered with the offline page when the output has one,
/// the way the published app falls back when it cannot reach the network.
pub async fn run(port: u16, dir: &Path, open_browser: bool, reporter: &mut Reporter) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!(
            "Directory not found: {}. Run 'shipit deploy' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    let app = app(dir);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let url = format!("http://{}", addr);
    reporter.info(format!("Serving {} at {}", dir.display(), url));

    if open_browser {
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Static file router for `dir`, falling back to its offline page.
fn app(dir: &Path) -> Router {
    let offline = dir.join(OFFLINE_FILE);
    if offline.is_file() {
        Router::new().fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(offline)))
    } else {
        tracing::warn!("No {} in {}", OFFLINE_FILE, dir.display());
        Router::new().fallback_service(ServeDir::new(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Capture;
    use std::fs;
    use tempfile::tempdir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    async fn spawn_app(dir: &Path) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = app(dir);
        tokio::spawn(async move { axum::serve(listener, app).await });
        addr
    }

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn refuses_missing_directory() {
        let temp = tempdir().unwrap();
        let (mut reporter, _, _) = Capture::reporter();

        let err = run(0, &temp.path().join("dist"), false, &mut reporter)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Directory not found"));
    }

    #[tokio::test]
    async fn unknown_paths_get_the_offline_page() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index.html"), "HOME-PAGE").unwrap();
        fs::write(temp.path().join(OFFLINE_FILE), "OFFLINE-PAGE").unwrap();
        let addr = spawn_app(temp.path()).await;

        let home = get(addr, "/index.html").await;
        assert!(home.starts_with("HTTP/1.1 200"));
        assert!(home.ends_with("HOME-PAGE"));

        let missing = get(addr, "/nope").await;
        assert!(missing.ends_with("OFFLINE-PAGE"));
    }

    #[tokio::test]
    async fn unknown_paths_without_offline_page_are_plain_404() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index.html"), "HOME-PAGE").unwrap();
        let addr = spawn_app(temp.path()).await;

        let missing = get(addr, "/nope").await;

        assert!(missing.starts_with("HTTP/1.1 404"));
        assert!(!missing.contains("HOME-PAGE"));
    }
}
