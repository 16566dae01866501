use crate::domain::errors::HurlError;
use http::Uri;

/// Represents a validated URL
#[derive(Debug, Clone)]
pub struct Url(pub Uri);

impl Url {
    /// Creates a new Url with validation
    ///
    /// # Arguments
    /// * `url` - The URL string to parse
    ///
    /// # Returns
    /// * `Ok(Url)` - Validated URL
    /// * `Err(HurlError::Usage)` - If the URL is invalid
    pub fn new(url: &str) -> Result<Self, HurlError> {
        let uri = url
            .parse::<Uri>()
            .map_err(|e| HurlError::usage(format!("Invalid URL '{}': {}", url, e)))?;
        Ok(Url(uri))
    }

    /// Expands the `:PORT/path` localhost shorthand and adds a missing scheme.
    ///
    /// `:8080/x` becomes `http://localhost:8080/x`, `:/x` becomes
    /// `http://localhost:80/x` and `example.com` becomes `http://example.com`.
    pub fn normalize(raw: &str) -> String {
        let mut url = match raw.strip_prefix(':') {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => {
                format!("localhost:{}", rest)
            }
            Some(rest) => format!("localhost:80{}", rest),
            None => raw.to_string(),
        };
        if !url.contains("://") {
            url.insert_str(0, "http://");
        }
        url
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }

    /// Path and query, as sent on the request line.
    pub fn request_target(&self) -> &str {
        self.0
            .path_and_query()
            .map(|pq| pq.as_str())
            .filter(|target| !target.is_empty())
            .unwrap_or("/")
    }

    pub fn is_https(&self) -> bool {
        self.0.scheme_str() == Some("https")
    }
}

/// The operator embedded in a field token, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `name==value`: URL query parameter
    Query,
    /// `name:=json`: raw JSON body field
    Json,
    /// `name=value`: string body field
    Field,
    /// `Name:value`: request header
    Header,
}

impl Operator {
    pub const PRIORITY: [Operator; 4] = [
        Operator::Query,
        Operator::Json,
        Operator::Field,
        Operator::Header,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Query => "==",
            Operator::Json => ":=",
            Operator::Field => "=",
            Operator::Header => ":",
        }
    }

    /// Byte offset of the first occurrence of this operator in `token`.
    ///
    /// A header colon never sits at offset 0 (that is the localhost shorthand)
    /// and never opens a `://` scheme separator.
    fn locate(self, token: &str) -> Option<usize> {
        let at = token.find(self.symbol())?;
        match self {
            Operator::Header if at == 0 || token[at..].starts_with("://") => None,
            _ => Some(at),
        }
    }
}

/// A positional token split on its highest-priority operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldToken<'a> {
    pub operator: Operator,
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> FieldToken<'a> {
    /// Classifies `token`, or returns `None` when it carries no operator.
    pub fn parse(token: &'a str) -> Option<Self> {
        Operator::PRIORITY.iter().find_map(|&operator| {
            operator.locate(token).map(|at| FieldToken {
                operator,
                key: &token[..at],
                value: &token[at + operator.symbol().len()..],
            })
        })
    }

    /// The file named by an `@path` value, if the value is an indirection.
    pub fn indirection(&self) -> Option<&'a str> {
        self.value.strip_prefix('@')
    }
}

pub fn is_field_token(token: &str) -> bool {
    FieldToken::parse(token).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_expands_localhost_port_shorthand() {
        assert_eq!(Url::normalize(":8080/x"), "http://localhost:8080/x");
        assert_eq!(Url::normalize(":3000"), "http://localhost:3000");
    }

    #[test]
    fn normalize_defaults_shorthand_port_to_80() {
        assert_eq!(Url::normalize(":/x"), "http://localhost:80/x");
        assert_eq!(Url::normalize(":"), "http://localhost:80");
    }

    #[test]
    fn normalize_adds_missing_scheme_only() {
        assert_eq!(Url::normalize("example.com"), "http://example.com");
        assert_eq!(
            Url::normalize("https://example.com/a"),
            "https://example.com/a"
        );
    }

    #[test]
    fn request_target_defaults_to_root() {
        let url = Url::new("http://example.com").unwrap();
        assert_eq!(url.request_target(), "/");

        let url = Url::new("http://example.com/users?page=2").unwrap();
        assert_eq!(url.request_target(), "/users?page=2");
    }

    #[test]
    fn invalid_url_is_a_usage_error() {
        let err = Url::new("http://exa mple.com").unwrap_err();
        assert!(matches!(err, HurlError::Usage(_)));
    }

    #[test]
    fn query_operator_wins_over_json_operator() {
        let token = FieldToken::parse("a:=b==c").unwrap();
        assert_eq!(token.operator, Operator::Query);
        assert_eq!(token.key, "a:=b");
        assert_eq!(token.value, "c");
    }

    #[test]
    fn json_operator_wins_over_field_and_header() {
        let token = FieldToken::parse("a=b:=c").unwrap();
        assert_eq!(token.operator, Operator::Json);
        assert_eq!(token.key, "a=b");
        assert_eq!(token.value, "c");
    }

    #[test]
    fn field_operator_wins_over_header() {
        let token = FieldToken::parse("X:a=b").unwrap();
        assert_eq!(token.operator, Operator::Field);
        assert_eq!(token.key, "X:a");
        assert_eq!(token.value, "b");
    }

    #[test]
    fn split_happens_on_first_occurrence() {
        let token = FieldToken::parse("Authorization:Bearer a:b").unwrap();
        assert_eq!(token.operator, Operator::Header);
        assert_eq!(token.key, "Authorization");
        assert_eq!(token.value, "Bearer a:b");

        let token = FieldToken::parse("expr=a=b").unwrap();
        assert_eq!(token.key, "expr");
        assert_eq!(token.value, "a=b");
    }

    #[test]
    fn leading_colon_and_scheme_are_not_headers() {
        assert!(!is_field_token(":8080/users"));
        assert!(!is_field_token("http://example.com"));
        assert!(!is_field_token("GET"));
        assert!(is_field_token("Referer:http://example.com"));
    }

    #[test]
    fn indirection_strips_the_at_sign() {
        let token = FieldToken::parse("bio=@bio.txt").unwrap();
        assert_eq!(token.indirection(), Some("bio.txt"));
        assert_eq!(FieldToken::parse("a=b").unwrap().indirection(), None);
    }
}
