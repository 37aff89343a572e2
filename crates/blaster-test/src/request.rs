//! Test request building.
//!
//! Builder steps never panic; the first failure is remembered and reported
//! by [`TestRequest::build`].

use bytes::Bytes;
use http::{header, HeaderName, HeaderValue, Method, Request};
use serde::Serialize;

use crate::error::TestError;

/// A request under construction.
///
/// ```
/// use blaster_test::TestRequest;
///
/// let request = TestRequest::post("/user")
///     .header("x-trace", "abc")
///     .json(&serde_json::json!({"name": "ann"}))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.headers()["content-type"], "application/json");
/// assert_eq!(request.body().as_ref(), br#"{"name":"ann"}"#);
/// ```
#[derive(Debug)]
#[must_use]
pub struct TestRequest {
    method: Method,
    uri: String,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequest {
    /// Starts a request with any method.
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: Vec::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Starts a `GET` request.
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Starts a `POST` request.
    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::POST, uri)
    }

    /// Starts a `PUT` request.
    pub fn put(uri: impl Into<String>) -> Self {
        Self::new(Method::PUT, uri)
    }

    /// Starts a `PATCH` request.
    pub fn patch(uri: impl Into<String>) -> Self {
        Self::new(Method::PATCH, uri)
    }

    /// Starts a `DELETE` request.
    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new(Method::DELETE, uri)
    }

    /// Adds a header. Repeated names are all sent.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        let parsed = HeaderName::try_from(name).map_err(|err| err.to_string()).and_then(|n| {
            HeaderValue::try_from(value.as_ref())
                .map(|v| (n, v))
                .map_err(|err| err.to_string())
        });

        match parsed {
            Ok(pair) => self.headers.push(pair),
            Err(reason) => self.fail(TestError::RequestBuild(format!("header {name}: {reason}"))),
        }
        self
    }

    /// Adds a `Cookie` header with one pair.
    pub fn cookie(self, name: &str, value: &str) -> Self {
        self.header(header::COOKIE.as_str(), format!("{name}={value}"))
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and its content type.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Bytes::from(bytes),
            Err(err) => self.fail(err.into()),
        }
        self.header(header::CONTENT_TYPE.as_str(), "application/json")
    }

    /// Sets a urlencoded form body and its content type.
    pub fn form<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => self.body = Bytes::from(encoded),
            Err(err) => self.fail(err.into()),
        }
        self.header(header::CONTENT_TYPE.as_str(), "application/x-www-form-urlencoded")
    }

    /// Builds the request, or returns the first error recorded.
    pub fn build(self) -> Result<Request<Bytes>, TestError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut builder = Request::builder().method(self.method).uri(self.uri.as_str());
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        builder
            .body(self.body)
            .map_err(|err| TestError::RequestBuild(format!("{}: {err}", self.uri)))
    }

    fn fail(&mut self, err: TestError) {
        self.error.get_or_insert(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_method_shortcuts() {
        assert_eq!(TestRequest::get("/").build().unwrap().method(), Method::GET);
        assert_eq!(TestRequest::put("/").build().unwrap().method(), Method::PUT);
        assert_eq!(TestRequest::patch("/").build().unwrap().method(), Method::PATCH);
        assert_eq!(TestRequest::delete("/").build().unwrap().method(), Method::DELETE);
    }

    #[test]
    fn test_form_body() {
        let mut form = BTreeMap::new();
        form.insert("name", "ann lee");
        form.insert("age", "30");

        let request = TestRequest::post("/user").form(&form).build().unwrap();
        assert_eq!(request.body().as_ref(), b"age=30&name=ann+lee");
        assert_eq!(
            request.headers()[header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_repeated_headers_are_kept() {
        let request = TestRequest::get("/")
            .header("x-tag", "a")
            .header("x-tag", "b")
            .build()
            .unwrap();

        assert_eq!(request.headers().get_all("x-tag").iter().count(), 2);
    }

    #[test]
    fn test_cookie_header() {
        let request = TestRequest::get("/").cookie("session", "abc").build().unwrap();
        assert_eq!(request.headers()[header::COOKIE], "session=abc");
    }

    #[test]
    fn test_invalid_header_is_reported_at_build() {
        let result = TestRequest::get("/").header("bad header", "x").build();
        assert!(matches!(result, Err(TestError::RequestBuild(msg)) if msg.contains("bad header")));
    }

    #[test]
    fn test_invalid_uri_is_reported_at_build() {
        let result = TestRequest::get("http://[::1").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_first_error_wins() {
        let result = TestRequest::get("/")
            .header("bad one", "x")
            .header("bad two", "y")
            .build();
        assert!(matches!(result, Err(TestError::RequestBuild(msg)) if msg.contains("bad one")));
    }
}
