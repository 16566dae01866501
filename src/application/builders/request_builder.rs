use crate::domain::entities::{Method, Request, RequestDescriptor};
use crate::domain::errors::HurlError;
use crate::domain::value_objects::Url;
use hyper::body::Bytes;
use serde_json::Value;

/// Resolves a classified descriptor into a sendable [`Request`].
pub struct RequestBuilder {
    descriptor: RequestDescriptor,
}

impl RequestBuilder {
    pub fn new(descriptor: RequestDescriptor) -> Self {
        Self { descriptor }
    }

    /// Non-empty fields become a JSON body and imply POST; otherwise the raw
    /// body (if any) is sent as-is and the method falls back to GET.
    pub fn build(self) -> Result<Request, HurlError> {
        let RequestDescriptor {
            method,
            url,
            headers,
            fields,
            raw_body,
        } = self.descriptor;

        let (body, json, default_method) = if fields.is_empty() {
            (Bytes::from(raw_body.unwrap_or_default()), false, Method::Get)
        } else {
            let encoded = serde_json::to_vec(&Value::Object(fields))
                .map_err(|e| HurlError::usage(format!("Failed to encode JSON body: {}", e)))?;
            (Bytes::from(encoded), true, Method::Post)
        };

        let method = method.unwrap_or(default_method);
        tracing::debug!(%method, url = url.as_str(), json, body_len = body.len(), "resolved request");

        Ok(Request {
            method,
            url: Url::new(&url)?,
            headers,
            body,
            json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn descriptor(url: &str) -> RequestDescriptor {
        RequestDescriptor {
            url: url.to_string(),
            ..RequestDescriptor::default()
        }
    }

    #[test]
    fn bare_request_defaults_to_get_without_body() {
        let request = RequestBuilder::new(descriptor("http://example.com"))
            .build()
            .unwrap();
        assert_eq!(request.method, Method::Get);
        assert!(request.body.is_empty());
        assert!(!request.json);
    }

    #[test]
    fn fields_become_json_and_imply_post() {
        let mut fields = Map::new();
        fields.insert("a".into(), json!(1));
        fields.insert("b".into(), json!("2"));
        let request = RequestBuilder::new(RequestDescriptor {
            fields,
            ..descriptor("http://example.com")
        })
        .build()
        .unwrap();

        assert_eq!(request.method, Method::Post);
        assert!(request.json);
        let sent: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(sent, json!({"a": 1, "b": "2"}));
    }

    #[test]
    fn explicit_method_is_kept_with_fields() {
        let mut fields = Map::new();
        fields.insert("done".into(), json!(true));
        let request = RequestBuilder::new(RequestDescriptor {
            method: Some(Method::Put),
            fields,
            ..descriptor("http://example.com/todo/1")
        })
        .build()
        .unwrap();
        assert_eq!(request.method, Method::Put);
    }

    #[test]
    fn raw_body_is_sent_verbatim_with_get() {
        let request = RequestBuilder::new(RequestDescriptor {
            raw_body: Some(b"hello".to_vec()),
            ..descriptor("http://example.com")
        })
        .build()
        .unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(&request.body[..], b"hello");
        assert!(!request.json);
    }

    #[test]
    fn headers_pass_through_in_order() {
        let headers = vec![
            ("X-A".to_string(), "1".to_string()),
            ("X-A".to_string(), "2".to_string()),
        ];
        let request = RequestBuilder::new(RequestDescriptor {
            headers: headers.clone(),
            ..descriptor("http://example.com")
        })
        .build()
        .unwrap();
        assert_eq!(request.headers, headers);
    }
}
