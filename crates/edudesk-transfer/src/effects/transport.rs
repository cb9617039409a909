use std::future::Future;

use bytes::Bytes;

/// Status and headers of a tus response; bodies are never needed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TusResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl TusResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// Minimal HTTP surface needed by the tus protocol.
///
/// Implementations only move bytes: they send the headers they are given and
/// report the status they get back. An `Err` means the request did not
/// complete (DNS, connect, reset, timeout) and is treated as transient.
///
/// # Implementations
///
/// - [`ReqwestTransport`]: Production implementation using `reqwest`
/// - Scripted implementations for testing
pub trait TusTransport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn head(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<TusResponse, Self::Error>> + Send;

    fn patch(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Bytes,
    ) -> impl Future<Output = Result<TusResponse, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;

    /// Production transport on a shared `reqwest::Client`.
    #[derive(Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }

        fn collect(response: reqwest::Response) -> TusResponse {
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
                .collect();
            TusResponse {
                status: response.status().as_u16(),
                headers,
            }
        }
    }

    impl TusTransport for ReqwestTransport {
        type Error = reqwest::Error;

        async fn head(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<TusResponse, Self::Error> {
            let mut request = self.client.head(url);
            for (key, value) in headers {
                request = request.header(key, value);
            }
            Ok(Self::collect(request.send().await?))
        }

        async fn patch(
            &self,
            url: &str,
            headers: &[(String, String)],
            body: Bytes,
        ) -> Result<TusResponse, Self::Error> {
            let mut request = self.client.patch(url);
            for (key, value) in headers {
                request = request.header(key, value);
            }
            Ok(Self::collect(request.body(body).send().await?))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestTransport;
