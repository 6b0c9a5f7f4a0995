//! The request descriptor handed to routing and handlers.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HOST};
use waypoint_router::Method;

use crate::{ExtractionError, ExtractionSource, ParameterStore};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Format for [`Request::raw_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyFormat {
    /// Decode the body as JSON.
    #[default]
    Json,
    /// Parse the body as an XML document.
    Xml,
}

impl FromStr for BodyFormat {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(ExtractionError::deserialization_failed(
                ExtractionSource::Body,
                format!("unknown body format `{other}`"),
            )),
        }
    }
}

/// A decoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RawData {
    /// Parsed JSON; an empty body is `null`.
    Json(serde_json::Value),
    /// The XML document element as a JSON-shaped tree: children keyed by
    /// tag, attributes under `"@attributes"`, text-only elements as strings.
    Xml(serde_json::Value),
}

/// An incoming request, reduced to what routing and handlers read.
///
/// Header names are lower-case; repeated headers are joined with `", "`.
/// [`params`](Self::params) holds the form fields merged with the query
/// fields, the query winning on conflicts.
///
/// # Example
///
/// ```rust
/// use waypoint_extract::Request;
///
/// let request = Request::builder("post", "http://shop.test/cart?item=7")
///     .header("X-Requested-With", "XMLHttpRequest")
///     .form([("qty", "2"), ("item", "3")])
///     .build()
///     .unwrap();
///
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.path(), "/cart");
/// assert_eq!(request.host(), "shop.test");
/// assert!(request.is_method("Post"));
/// assert!(request.is_ajax());
/// assert_eq!(request.form().get("item"), Some("3"));
/// assert_eq!(request.params().get("item"), Some("7"));
/// assert_eq!(request.params().get("qty"), Some("2"));
/// ```
#[derive(Clone)]
pub struct Request {
    method: String,
    route_method: Option<Method>,
    path: String,
    uri: String,
    host: String,
    headers: ParameterStore,
    query: ParameterStore,
    form: ParameterStore,
    params: ParameterStore,
    body: Bytes,
}

impl Request {
    /// Starts building a request.
    pub fn builder(method: impl Into<String>, uri: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, uri)
    }

    /// Builds the descriptor from an `http` request.
    ///
    /// A url-encoded body is parsed into [`form`](Self::form); other bodies
    /// are kept for [`raw_data`](Self::raw_data).
    pub fn from_http(request: http::Request<Bytes>) -> Result<Self, ExtractionError> {
        let (parts, body) = request.into_parts();

        let mut headers = ParameterStore::new();
        for name in parts.headers.keys() {
            let joined = parts
                .headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            headers.set(name.as_str(), joined);
        }

        let host = headers
            .get(HOST.as_str())
            .map(ToString::to_string)
            .or_else(|| parts.uri.authority().map(ToString::to_string))
            .unwrap_or_default();

        let query = ParameterStore::from_query(parts.uri.query().unwrap_or(""))?;

        let is_form = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim_start().starts_with(FORM_CONTENT_TYPE));
        let form = if is_form {
            ParameterStore::from_form(&body)?
        } else {
            ParameterStore::new()
        };

        let mut params = form.clone();
        params.merge(&query);

        let path = match parts.uri.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        let uri = parts
            .uri
            .path_and_query()
            .map_or_else(|| path.clone(), ToString::to_string);

        let route_method = Method::try_from(&parts.method)
            .or_else(|_| parts.method.as_str().parse())
            .ok();

        Ok(Self {
            method: parts.method.as_str().to_ascii_uppercase(),
            route_method,
            path,
            uri,
            host,
            headers,
            query,
            form,
            params,
            body,
        })
    }

    /// Upper-case method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The method as a routable [`Method`], or `None` for methods no route
    /// can be registered under (`OPTIONS`, `TRACE`, extensions).
    #[must_use]
    pub fn route_method(&self) -> Option<Method> {
        self.route_method
    }

    /// URL path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request target: path plus query string.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Host header, or the URI authority when the header is missing.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &ParameterStore {
        &self.headers
    }

    /// Query string fields.
    #[must_use]
    pub fn query(&self) -> &ParameterStore {
        &self.query
    }

    /// Url-encoded body fields.
    #[must_use]
    pub fn form(&self) -> &ParameterStore {
        &self.form
    }

    /// Form fields merged with query fields.
    #[must_use]
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Case-insensitive method check.
    #[must_use]
    pub fn is_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }

    /// True for `X-Requested-With: XMLHttpRequest`.
    #[must_use]
    pub fn is_ajax(&self) -> bool {
        self.headers.get("x-requested-with") == Some("XMLHttpRequest")
    }

    /// Decodes the body in the given format.
    ///
    /// An empty JSON body is `null`. Malformed JSON or XML is an error
    /// rather than an empty value, so a handler can tell the two apart.
    pub fn raw_data(&self, format: BodyFormat) -> Result<RawData, ExtractionError> {
        match format {
            BodyFormat::Json if self.body.is_empty() => Ok(RawData::Json(serde_json::Value::Null)),
            BodyFormat::Json => serde_json::from_slice(&self.body)
                .map(RawData::Json)
                .map_err(|e| ExtractionError::deserialization_failed(ExtractionSource::Body, e.to_string())),
            BodyFormat::Xml => {
                let text = std::str::from_utf8(&self.body)
                    .map_err(|e| ExtractionError::invalid_encoding(ExtractionSource::Body, e.to_string()))?;
                crate::xml::parse(text).map(RawData::Xml)
            }
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("host", &self.host)
            .field("headers", &self.headers.len())
            .field("params", &self.params.len())
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Request`], mainly for tests and embedding.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: String,
    uri: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl RequestBuilder {
    /// Creates a builder for a method and URI.
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a url-encoded form body and its content type.
    #[must_use]
    pub fn form<K: AsRef<str>, V: AsRef<str>>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut encoder = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in fields {
            encoder.append_pair(key.as_ref(), value.as_ref());
        }
        self.body = Bytes::from(encoder.finish());
        self.header(CONTENT_TYPE.as_str(), FORM_CONTENT_TYPE)
    }

    /// Builds the request.
    pub fn build(self) -> Result<Request, ExtractionError> {
        let method = match Method::from_name(&self.method) {
            Some(method) => http::Method::from(method),
            None => http::Method::from_bytes(self.method.to_ascii_uppercase().as_bytes())
                .map_err(|e| ExtractionError::invalid_request(ExtractionSource::Uri, e.to_string()))?,
        };

        let mut builder = http::Request::builder().method(method).uri(self.uri.as_str());
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let request = builder
            .body(self.body)
            .map_err(|e| ExtractionError::invalid_request(ExtractionSource::Header, e.to_string()))?;
        Request::from_http(request)
    }
}
