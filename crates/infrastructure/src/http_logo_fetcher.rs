use async_trait::async_trait;
use docforge_application::LogoFetcher;
use docforge_core::{AppError, AppResult};

/// Logo fetcher issuing plain HTTP GET requests.
#[derive(Debug, Clone)]
pub struct HttpLogoFetcher {
    http_client: reqwest::Client,
    max_bytes: usize,
}

impl HttpLogoFetcher {
    /// Creates a logo fetcher that rejects images larger than `max_bytes`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, max_bytes: usize) -> Self {
        Self {
            http_client,
            max_bytes: max_bytes.max(1),
        }
    }

    fn too_large(&self, logo_url: &str, size: u64) -> AppError {
        AppError::Validation(format!(
            "logo at '{logo_url}' exceeds {} bytes (at least {size})",
            self.max_bytes
        ))
    }
}

#[async_trait]
impl LogoFetcher for HttpLogoFetcher {
    async fn fetch_logo(&self, logo_url: &str) -> AppResult<Vec<u8>> {
        let mut response = self
            .http_client
            .get(logo_url)
            .send()
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("logo request to '{logo_url}' failed: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Unavailable(format!(
                "logo request to '{logo_url}' returned status {status}"
            )));
        }

        if let Some(length) = response.content_length()
            && length > self.max_bytes as u64
        {
            return Err(self.too_large(logo_url, length));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|error| {
            AppError::Unavailable(format!("logo body from '{logo_url}' is unreadable: {error}"))
        })? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(logo_url, (bytes.len() + chunk.len()) as u64));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use docforge_application::LogoFetcher;
    use docforge_core::AppError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::HttpLogoFetcher;

    /// Serves one raw HTTP response and returns the URL pointing at it.
    async fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|_| unreachable!());
        let address = listener.local_addr().unwrap_or_else(|_| unreachable!());

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap_or_else(|_| unreachable!());
            let mut request = Vec::new();
            let mut buffer = [0_u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = stream.read(&mut buffer).await.unwrap_or_default();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }
            let _ = stream.write_all(&response).await;
            let _ = stream.shutdown().await;
        });

        format!("http://{address}/logo.png")
    }

    fn fetcher(max_bytes: usize) -> HttpLogoFetcher {
        HttpLogoFetcher::new(reqwest::Client::new(), max_bytes)
    }

    #[tokio::test]
    async fn small_logo_is_returned_whole() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\ncontent-length: 4\r\nconnection: close\r\n\r\nPNG!".to_vec(),
        )
        .await;

        let bytes = fetcher(16)
            .fetch_logo(&url)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(bytes, b"PNG!");
    }

    #[tokio::test]
    async fn declared_length_over_the_cap_is_rejected_before_reading() {
        // Only the headers are sent; reading the body would stall.
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\ncontent-length: 1048576\r\n\r\n".to_vec(),
        )
        .await;

        let result = fetcher(16).fetch_logo(&url).await;
        assert!(matches!(result, Err(AppError::Validation(message)) if message.contains("1048576")));
    }

    #[tokio::test]
    async fn undeclared_body_is_cut_off_at_the_cap() {
        let mut response =
            b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\nconnection: close\r\n\r\n"
                .to_vec();
        for _ in 0..4 {
            response.extend_from_slice(b"8\r\nABCDEFGH\r\n");
        }
        response.extend_from_slice(b"0\r\n\r\n");
        let url = serve_once(response).await;

        let result = fetcher(20).fetch_logo(&url).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn error_status_is_unavailable() {
        let url = serve_once(
            b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                .to_vec(),
        )
        .await;

        let result = fetcher(16).fetch_logo(&url).await;
        assert!(matches!(result, Err(AppError::Unavailable(_))));
    }
}
