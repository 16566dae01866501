use crate::domain::errors::HurlError;
use crate::domain::value_objects::Url;
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderMap};
use hyper::{StatusCode, Version};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// HTTP method enum for simplicity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl FromStr for Method {
    type Err = HurlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            other => Err(HurlError::usage(format!(
                "Unsupported HTTP method: '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the positional arguments asked for, before any defaults apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestDescriptor {
    /// `None` until inferred from the body
    pub method: Option<Method>,
    pub url: String,
    /// Order of appearance, duplicates kept
    pub headers: Vec<(String, String)>,
    pub fields: Map<String, Value>,
    /// Set only when `fields` is empty and a body source was supplied
    pub raw_body: Option<Vec<u8>>,
}

/// Represents a fully resolved HTTP request
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>, // Key-value pairs for headers
    pub body: Bytes,
    pub json: bool,
}

/// Represents an HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.contains("application/json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn method_parsing_is_case_insensitive() {
        assert_eq!("post".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("Patch".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn unknown_method_is_a_usage_error() {
        let err = "FETCH".parse::<Method>().unwrap_err();
        assert!(matches!(err, HurlError::Usage(_)));
        assert!(err.to_string().contains("FETCH"));
    }

    #[test]
    fn response_detects_json_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        let response = Response {
            status: StatusCode::OK,
            version: Version::HTTP_11,
            headers,
            body: Bytes::new(),
        };
        assert!(response.content_type().is_some_and(is_json_content_type));
        assert_eq!(
            response.content_type(),
            Some("application/json; charset=utf-8")
        );
    }
}
