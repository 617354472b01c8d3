//! HTTP source for pose files and manifests served by a web server.

use crate::PoseSource;
use async_trait::async_trait;
use pose_core::{PoseError, Result};

pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PoseError::source_unavailable("http client", e))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PoseSource for HttpSource {
    async fn fetch_text(&self, locator: &str) -> Result<String> {
        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| PoseError::source_unavailable(locator, e))?;
        if !response.status().is_success() {
            return Err(PoseError::source_unavailable(
                locator,
                format!("HTTP {}", response.status()),
            ));
        }
        let text = response
            .text()
            .await
            .map_err(|e| PoseError::source_unavailable(locator, e))?;
        tracing::debug!(url = %locator, bytes = text.len(), "fetched pose source");
        Ok(text)
    }
}

#[cfg(all(test, feature = "http"))]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve fixed `(path, status, body)` routes; anything else is a 404.
    async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).into_owned();
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = routes
                    .iter()
                    .find(|(p, _, _)| *p == path)
                    .map(|(_, s, b)| (*s, *b))
                    .unwrap_or((404, ""));
                let reason = if status == 200 { "OK" } else { "Not Found" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    fn source() -> HttpSource {
        HttpSource::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn test_non_success_status_is_unavailable() {
        let base = serve(vec![("/gone.json", 404, "not here")]).await;
        let src = source();

        let err = src.fetch_text(&format!("{base}/gone.json")).await.unwrap_err();
        assert!(
            matches!(err, PoseError::SourceUnavailable { ref reason, .. } if reason.contains("404"))
        );
        let err = src.fetch_manifest(&format!("{base}/poses")).await.unwrap_err();
        assert!(matches!(err, PoseError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let base = serve(vec![
            ("/poses", 200, r#"["hi.json", "notes.txt"]"#),
            ("/poses/hi.json", 200, r#"{"head":{"rotation":[0,0,0,1]}}"#),
        ])
        .await;
        let src = source();

        let text = src.fetch_text(&format!("{base}/poses/hi.json")).await.unwrap();
        assert_eq!(text, r#"{"head":{"rotation":[0,0,0,1]}}"#);
        let entries = src.fetch_manifest(&format!("{base}/poses")).await.unwrap();
        assert_eq!(entries, vec!["hi.json", "notes.txt"]);
    }
}
