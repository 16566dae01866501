use crate::application::sources::{ContentSource, read_indirection_text};
use crate::domain::entities::{Method, RequestDescriptor};
use crate::domain::errors::HurlError;
use crate::domain::value_objects::{FieldToken, Operator, Url, is_field_token};
use serde_json::{Map, Value};
use url::form_urlencoded;

/// The `[METHOD] URL` head of the positional tokens and everything after it.
#[derive(Debug, PartialEq, Eq)]
pub struct Prefix<'t> {
    pub method: Option<&'t str>,
    pub url: &'t str,
    pub fields: &'t [String],
}

/// Walks back from the last token while tokens look like fields.
///
/// Whatever is left must be one token (the URL) or two (method and URL).
pub fn split_prefix(tokens: &[String]) -> Result<Prefix<'_>, HurlError> {
    let mut count = tokens.len();
    while count > 1 && is_field_token(&tokens[count - 1]) {
        count -= 1;
    }

    match count {
        2 => Ok(Prefix {
            method: Some(&tokens[0]),
            url: &tokens[1],
            fields: &tokens[2..],
        }),
        1 => Ok(Prefix {
            method: None,
            url: &tokens[0],
            fields: &tokens[1..],
        }),
        _ => Err(HurlError::usage("Missing URL")),
    }
}

/// Turns positional tokens and optional body bytes into a [`RequestDescriptor`].
pub struct Classifier<'s> {
    source: &'s dyn ContentSource,
}

impl<'s> Classifier<'s> {
    pub fn new(source: &'s dyn ContentSource) -> Self {
        Self { source }
    }

    pub fn classify(
        &self,
        tokens: &[String],
        body: Option<Vec<u8>>,
    ) -> Result<RequestDescriptor, HurlError> {
        let prefix = split_prefix(tokens)?;
        tracing::debug!(
            method = ?prefix.method,
            url = prefix.url,
            fields = prefix.fields.len(),
            "split positional arguments"
        );

        let mut descriptor = RequestDescriptor {
            method: prefix.method.map(str::parse::<Method>).transpose()?,
            url: Url::normalize(prefix.url),
            fields: seed_fields(body.as_deref()),
            ..RequestDescriptor::default()
        };

        self.apply_fields(&mut descriptor, prefix.fields)?;

        if descriptor.fields.is_empty() {
            descriptor.raw_body = body;
        }
        Ok(descriptor)
    }

    /// Layers field tokens onto `descriptor`. Tokens without an operator are skipped.
    pub fn apply_fields(
        &self,
        descriptor: &mut RequestDescriptor,
        tokens: &[String],
    ) -> Result<(), HurlError> {
        for token in tokens {
            let Some(field) = FieldToken::parse(token) else {
                tracing::debug!(token = token.as_str(), "ignoring token without operator");
                continue;
            };
            tracing::trace!(operator = ?field.operator, key = field.key, "classified field token");

            let value = self.resolve_value(&field)?;
            match field.operator {
                Operator::Query => append_query(&mut descriptor.url, field.key, &value),
                Operator::Json => {
                    let json: Value = serde_json::from_str(&value).map_err(|source| {
                        HurlError::MalformedField {
                            field: field.key.to_string(),
                            source,
                        }
                    })?;
                    descriptor.fields.insert(field.key.to_string(), json);
                }
                Operator::Field => {
                    descriptor
                        .fields
                        .insert(field.key.to_string(), Value::String(value));
                }
                Operator::Header => descriptor.headers.push((field.key.to_string(), value)),
            }
        }
        Ok(())
    }

    /// The literal value, or the verbatim file contents for `@path`.
    fn resolve_value(&self, field: &FieldToken<'_>) -> Result<String, HurlError> {
        match field.indirection() {
            Some(path) => read_indirection_text(self.source, path),
            None => Ok(field.value.to_string()),
        }
    }
}

/// A body that parses as a JSON object seeds the field map; anything else seeds nothing.
fn seed_fields(body: Option<&[u8]>) -> Map<String, Value> {
    match body.map(serde_json::from_slice::<Value>) {
        Some(Ok(Value::Object(map))) => map,
        _ => Map::new(),
    }
}

fn append_query(url: &mut String, key: &str, value: &str) {
    url.push(if url.contains('?') { '&' } else { '?' });
    url.extend(form_urlencoded::byte_serialize(key.as_bytes()));
    url.push('=');
    url.extend(form_urlencoded::byte_serialize(value.as_bytes()));
}
