//! Per-request context.
//!
//! The [`Context`] owns the inbound request and the response being built.
//! It flows through the middleware chain into the matched handler and is
//! turned into an `http::Response` once the chain returns.

use blaster_router::Params;
use bytes::{Bytes, BytesMut};
use http::header::{self, HeaderName, HeaderValue};
use http::{Extensions, HeaderMap, Method, Request, Response, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cookie::{find_cookie, SetCookie};
use crate::error::ContextError;
use crate::value::Value;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps request ids sortable in logs.
///
/// # Example
///
/// ```
/// use blaster_core::RequestId;
///
/// let id = RequestId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new request id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parses a request id received from a client or upstream proxy.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Uuid::parse_str(text).ok().map(Self)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// State of a single request flow.
///
/// A `Context` wraps the buffered inbound request and an outbound response
/// buffer. The status defaults to `200 OK`; writers append to the body.
///
/// # Example
///
/// ```
/// use blaster_core::Context;
/// use bytes::Bytes;
/// use http::{Request, StatusCode};
///
/// let request = Request::get("/search?q=rust").body(Bytes::new()).unwrap();
/// let mut ctx = Context::new(request);
///
/// let query = ctx.form_value("q").into_string().unwrap();
/// ctx.write_string(StatusCode::OK, format!("searching for {query}"));
///
/// let response = ctx.into_response();
/// assert_eq!(response.body().as_ref(), b"searching for rust");
/// ```
#[derive(Debug)]
pub struct Context {
    request: Request<Bytes>,
    params: Params,
    route: String,
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
}

impl Context {
    /// Creates a context for a buffered request.
    #[must_use]
    pub fn new(request: Request<Bytes>) -> Self {
        Self {
            request,
            params: Params::new(),
            route: String::new(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
        }
    }

    // ------------------------------------------------------------------
    // Request accessors
    // ------------------------------------------------------------------

    /// The inbound request.
    #[must_use]
    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// The request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    /// The request path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    /// The raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.request.uri().query()
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// The buffered request body.
    ///
    /// The body is held in memory, so it can be read any number of times by
    /// middleware and handlers alike.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// Request extensions, used by middleware to pass typed values inward.
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        self.request.extensions()
    }

    /// Mutable request extensions.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        self.request.extensions_mut()
    }

    /// The request id assigned by the request id middleware, if it ran.
    #[must_use]
    pub fn request_id(&self) -> Option<RequestId> {
        self.request.extensions().get::<RequestId>().copied()
    }

    /// Reads a cookie sent by the client.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| find_cookie(value, name))
    }

    // ------------------------------------------------------------------
    // Routing results
    // ------------------------------------------------------------------

    /// Path parameters bound by the route lookup.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The registered path of the matched route, empty before dispatch.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Records the result of a route lookup.
    pub fn set_route(&mut self, route: impl Into<String>, params: Params) {
        self.route = route.into();
        self.params = params;
    }

    // ------------------------------------------------------------------
    // Extraction
    // ------------------------------------------------------------------

    /// Deserializes the JSON request body.
    ///
    /// # Errors
    ///
    /// [`ContextError::MissingBody`] for an empty body and
    /// [`ContextError::Json`] when the body does not decode into `T`.
    pub fn bind_json<T: DeserializeOwned>(&self) -> Result<T, ContextError> {
        let body = self.request.body();
        if body.is_empty() {
            return Err(ContextError::MissingBody);
        }
        serde_json::from_slice(body).map_err(ContextError::Json)
    }

    /// Looks up a form value.
    ///
    /// Values from a urlencoded `POST`, `PUT` or `PATCH` body take precedence
    /// over the query string. A key present in neither yields an empty
    /// string; only a malformed query or body is an error.
    pub fn form_value(&self, key: &str) -> Value {
        self.lookup_form(key).into()
    }

    /// Looks up a form value, falling back to `default` when the form cannot
    /// be parsed or the value is empty.
    pub fn form_value_or_default(&self, key: &str, default: &str) -> Value {
        match self.lookup_form(key) {
            Ok(value) if !value.is_empty() => Value::new(value),
            _ => Value::new(default),
        }
    }

    /// Looks up a path parameter bound by the route lookup.
    pub fn path_value(&self, key: &str) -> Value {
        match self.params.get(key) {
            Some(value) => Value::new(value),
            None => Value::from_error(ContextError::MissingParam(key.to_string())),
        }
    }

    fn lookup_form(&self, key: &str) -> Result<String, ContextError> {
        if self.has_form_body() {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(self.request.body())?;
            if let Some((_, value)) = pairs.into_iter().find(|(k, _)| k == key) {
                return Ok(value);
            }
        }

        let query = self.query().unwrap_or_default();
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        Ok(pairs
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
            .unwrap_or_default())
    }

    fn has_form_body(&self) -> bool {
        let method = self.request.method();
        if method != Method::POST && method != Method::PUT && method != Method::PATCH {
            return false;
        }
        self.request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_URLENCODED))
    }

    // ------------------------------------------------------------------
    // Response
    // ------------------------------------------------------------------

    /// The response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the response status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// The response headers.
    #[must_use]
    pub fn response_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable response headers.
    pub fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// The response body written so far.
    #[must_use]
    pub fn response_body(&self) -> &[u8] {
        &self.body
    }

    /// Sets a response header, replacing any previous value.
    ///
    /// # Errors
    ///
    /// [`ContextError::InvalidHeader`] if the name or value is not valid HTTP.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), ContextError> {
        let invalid = || ContextError::InvalidHeader {
            name: name.to_string(),
        };
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Serializes `value` as JSON and appends it to the body.
    ///
    /// # Errors
    ///
    /// [`ContextError::Serialize`] if `value` cannot be serialized; the
    /// response is left untouched in that case.
    pub fn write_json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) -> Result<(), ContextError> {
        let bytes = serde_json::to_vec(value).map_err(ContextError::Serialize)?;
        self.status = status;
        self.headers
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static(APPLICATION_JSON));
        self.body.extend_from_slice(&bytes);
        Ok(())
    }

    /// Appends text to the body and applies `status`.
    pub fn write_string(&mut self, status: StatusCode, text: impl AsRef<str>) {
        self.status = status;
        self.headers
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static(TEXT_PLAIN));
        self.body.extend_from_slice(text.as_ref().as_bytes());
    }

    /// Adds a `Set-Cookie` header.
    ///
    /// # Errors
    ///
    /// [`ContextError::InvalidHeader`] if the cookie renders to an invalid
    /// header value.
    pub fn set_cookie(&mut self, cookie: &SetCookie) -> Result<(), ContextError> {
        let value = HeaderValue::try_from(cookie.to_string()).map_err(|_| ContextError::InvalidHeader {
            name: header::SET_COOKIE.to_string(),
        })?;
        self.headers.append(header::SET_COOKIE, value);
        Ok(())
    }

    /// Consumes the context into the response it describes.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(self.body.freeze());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
