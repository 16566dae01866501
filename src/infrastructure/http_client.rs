use crate::application::services::{HttpClient, HttpRequestService};
use crate::domain::entities::{Method as DomainMethod, Request, Response};
use crate::domain::errors::HurlError;
use crate::domain::value_objects::Url;
use crate::infrastructure::sniff;

use anyhow::Result;
use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{ACCEPT, CONTENT_TYPE, HOST, HeaderMap, HeaderName, HeaderValue};
use hyper::{Method, Request as HyperRequest};
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_native_tls::native_tls;

pub const ACCEPT_ANY: &str = "*/*";
pub const ACCEPT_JSON: &str = "application/json, */*;q=0.5";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Infrastructure implementation of HttpClient using Hyper
///
/// Opens one HTTP/1.1 connection per request, over TLS for `https` URLs.
pub struct HyperHttpClient;

impl HyperHttpClient {
    pub fn new() -> Self {
        Self
    }

    /// Creates a configured HTTP request service using this client
    pub fn create_request_service(self) -> HttpRequestService {
        HttpRequestService::new(Box::new(self))
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: Request) -> Result<Response> {
        let target = Target::of(&request.url)?;
        let hyper_request = RequestAdapter::to_hyper_request(&request)?;
        let hyper_response = self.execute_http_request(&target, hyper_request).await?;
        Ok(ResponseAdapter::to_domain_response(hyper_response).await?)
    }
}

impl HyperHttpClient {
    async fn execute_http_request(
        &self,
        target: &Target,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>, HurlError> {
        tracing::debug!(host = %target.host, port = target.port, tls = target.tls, "connecting");
        let tcp = TcpStream::connect((target.host.as_str(), target.port))
            .await
            .map_err(|e| {
                HurlError::Transport(format!("connect to {}:{}: {}", target.host, target.port, e))
            })?;

        if !target.tls {
            return Self::exchange(tcp, request).await;
        }

        let connector = native_tls::TlsConnector::new()
            .map_err(|e| HurlError::Transport(format!("TLS setup: {}", e)))?;
        let tls = tokio_native_tls::TlsConnector::from(connector)
            .connect(&target.host, tcp)
            .await
            .map_err(|e| HurlError::Transport(format!("TLS handshake with {}: {}", target.host, e)))?;
        Self::exchange(tls, request).await
    }

    async fn exchange<S>(
        stream: S,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>, HurlError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let io = TokioIo::new(stream);
        let (mut sender, connection) = hyper::client::conn::http1::handshake::<_, Full<Bytes>>(io)
            .await
            .map_err(|e| HurlError::Transport(format!("HTTP handshake: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(error = %e, "connection closed with error");
            }
        });

        let response = sender
            .send_request(request)
            .await
            .map_err(|e| HurlError::Transport(e.to_string()))?;
        tracing::debug!(status = %response.status(), "received response");
        Ok(response)
    }
}

/// Where to connect for a given URL.
#[derive(Debug, PartialEq, Eq)]
struct Target {
    host: String,
    port: u16,
    tls: bool,
}

impl Target {
    fn of(url: &Url) -> Result<Self, HurlError> {
        let host = url
            .0
            .host()
            .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
            .filter(|h| !h.is_empty())
            .ok_or_else(|| HurlError::usage(format!("URL has no host: {}", url.as_str())))?;
        let tls = url.is_https();
        let port = url.0.port_u16().unwrap_or(if tls { 443 } else { 80 });

        Ok(Self {
            host: host.to_string(),
            port,
            tls,
        })
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(domain_request: &Request) -> Result<HyperRequest<Full<Bytes>>, HurlError> {
        let method = MethodAdapter::to_hyper_method(domain_request.method);
        let headers = HeaderAdapter::effective_headers(domain_request)?;

        let mut builder = HyperRequest::builder()
            .method(method)
            .uri(domain_request.url.request_target());
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }

        builder
            .body(Full::new(domain_request.body.clone()))
            .map_err(|e| HurlError::usage(format!("Failed to build HTTP request: {}", e)))
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(
        hyper_response: hyper::Response<Incoming>,
    ) -> Result<Response, HurlError> {
        let (parts, body) = hyper_response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| HurlError::ResponseRead(e.to_string()))?
            .to_bytes();

        Ok(Response {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
        })
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Method {
        match domain_method {
            DomainMethod::Get => Method::GET,
            DomainMethod::Post => Method::POST,
            DomainMethod::Put => Method::PUT,
            DomainMethod::Delete => Method::DELETE,
            DomainMethod::Patch => Method::PATCH,
            DomainMethod::Head => Method::HEAD,
            DomainMethod::Options => Method::OPTIONS,
        }
    }
}

/// Adapter for handling HTTP headers
pub struct HeaderAdapter;

impl HeaderAdapter {
    /// Defaults first, then every collected header in order with overwrite
    /// semantics, so a repeated name ends up with its last value.
    pub fn effective_headers(request: &Request) -> Result<HeaderMap, HurlError> {
        let mut headers = HeaderMap::new();

        if let Some(authority) = request.url.0.authority() {
            let host = match authority.port() {
                Some(port) => format!("{}:{}", authority.host(), port.as_str()),
                None => authority.host().to_string(),
            };
            headers.insert(HOST, Self::value("Host", &host)?);
        }

        if request.json {
            headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        } else {
            headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));
            if !request.body.is_empty() {
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static(sniff::content_type(&request.body)),
                );
            }
        }

        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HurlError::usage(format!("Invalid header name: '{}'", name)))?;
            headers.insert(header_name, Self::value(name, value)?);
        }
        Ok(headers)
    }

    fn value(name: &str, value: &str) -> Result<HeaderValue, HurlError> {
        HeaderValue::from_str(value)
            .map_err(|_| HurlError::usage(format!("Invalid value for header '{}'", name)))
    }
}
