// # Exchange Logger
//
// Diagnostic hook for raw HTTP request/response capture.
//
// Record clients hand every exchange to an `ExchangeLogger`. The default is
// a no-op. Sensitive headers are redacted when the snapshot is built, so no
// logger implementation ever sees a credential.

/// Replacement text for redacted header values
pub const REDACTED: &str = "<REDACTED>";

/// Header names whose values never leave the client in cleartext
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
];

/// Whether a header carries credentials
pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
}

/// Redacted view of an outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    /// HTTP method
    pub method: String,
    /// Full request URL
    pub url: String,
    /// Headers, with sensitive values replaced by [`REDACTED`]
    pub headers: Vec<(String, String)>,
    /// Request body, if any
    pub body: Option<String>,
}

impl RequestSnapshot {
    /// Build a snapshot, redacting sensitive header values
    pub fn new<I, K, V>(
        method: impl Into<String>,
        url: impl Into<String>,
        headers: I,
        body: Option<String>,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| {
                let k = k.into();
                let v = if is_sensitive_header(&k) {
                    REDACTED.to_string()
                } else {
                    v.into()
                };
                (k, v)
            })
            .collect();

        Self {
            method: method.into(),
            url: url.into(),
            headers,
            body,
        }
    }
}

/// View of a received response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSnapshot {
    /// URL the response belongs to
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body (empty when none was read)
    pub body: String,
}

/// Receives HTTP exchanges for diagnostics
pub trait ExchangeLogger: Send + Sync {
    /// Called before a request is sent
    fn on_request(&self, request: &RequestSnapshot);

    /// Called after a response has been received
    fn on_response(&self, response: &ResponseSnapshot);
}

/// Logger that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExchangeLogger;

impl ExchangeLogger for NoopExchangeLogger {
    fn on_request(&self, _request: &RequestSnapshot) {}

    fn on_response(&self, _response: &ResponseSnapshot) {}
}

/// Logger that emits `debug` events on the `acme_dns::http` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExchangeLogger;

impl ExchangeLogger for TracingExchangeLogger {
    fn on_request(&self, request: &RequestSnapshot) {
        tracing::debug!(
            target: "acme_dns::http",
            method = %request.method,
            url = %request.url,
            headers = ?request.headers,
            body = request.body.as_deref().unwrap_or(""),
            "request"
        );
    }

    fn on_response(&self, response: &ResponseSnapshot) {
        tracing::debug!(
            target: "acme_dns::http",
            url = %response.url,
            status = response.status,
            body = %response.body,
            "response"
        );
    }
}
