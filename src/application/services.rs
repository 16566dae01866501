use crate::domain::entities::{Request, Response};
use crate::domain::errors::HurlError;
use crate::domain::value_objects::Url;
use anyhow::Result;
use async_trait::async_trait;

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response>;
}

/// Application service for orchestrating HTTP request workflows
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Sends a single request; there is no retry.
    pub async fn send_request(&self, request: Request) -> Result<Response> {
        self.validate_request(&request)?;
        self.http_client.send(request).await
    }

    fn validate_request(&self, request: &Request) -> Result<()> {
        RequestValidator::validate(request)?;
        Ok(())
    }
}

/// Domain service for request validation
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(request: &Request) -> Result<(), HurlError> {
        Self::validate_url(&request.url)
    }

    fn validate_url(url: &Url) -> Result<(), HurlError> {
        match url.0.scheme_str() {
            Some("http") | Some("https") => {}
            _ => {
                return Err(HurlError::usage(format!(
                    "URL must start with http:// or https://: {}",
                    url.as_str()
                )));
            }
        }
        if url.0.host().is_none_or(str::is_empty) {
            return Err(HurlError::usage(format!(
                "URL has no host: {}",
                url.as_str()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Method;
    use hyper::body::Bytes;
    use hyper::header::HeaderMap;
    use hyper::{StatusCode, Version};

    fn request(url: &str) -> Request {
        Request {
            method: Method::Get,
            url: Url::new(url).unwrap(),
            headers: Vec::new(),
            body: Bytes::new(),
            json: false,
        }
    }

    fn ok_response() -> Response {
        Response {
            status: StatusCode::OK,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"{}"),
        }
    }

    #[tokio::test]
    async fn valid_request_reaches_the_client_once() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .withf(|request| request.url.as_str() == "http://example.com/users")
            .times(1)
            .returning(|_| Ok(ok_response()));
        let service = HttpRequestService::new(Box::new(client));

        let response = service
            .send_request(request("http://example.com/users"))
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unsupported_scheme_never_reaches_the_client() {
        let mut client = MockHttpClient::new();
        client.expect_send().times(0);
        let service = HttpRequestService::new(Box::new(client));

        let err = service
            .send_request(request("ftp://example.com/file"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HurlError>(),
            Some(HurlError::Usage(_))
        ));
    }

    #[tokio::test]
    async fn transport_errors_are_propagated() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .returning(|_| Err(HurlError::Transport("connection refused".into()).into()));
        let service = HttpRequestService::new(Box::new(client));

        let err = service
            .send_request(request("http://localhost:1/"))
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<HurlError>().map(HurlError::exit_code), Some(5));
    }
}
