//! In-memory test client.

use std::fmt;

use blaster_server::Serve;
use http::Method;
use serde::Serialize;

use crate::error::TestError;
use crate::request::TestRequest;
use crate::response::TestResponse;

/// Sends requests straight into a server's [`Serve::handle`].
///
/// No socket is bound; requests still pass through the whole middleware
/// chain and the dispatcher.
///
/// # Example
///
/// ```
/// use blaster_server::{HttpServe, Routes};
/// use blaster_test::TestClient;
/// use http::StatusCode;
///
/// let mut server = HttpServe::new();
/// server.get("/ping", |ctx| Box::pin(async move {
///     ctx.write_string(StatusCode::OK, "pong");
/// }));
///
/// let client = TestClient::new(server);
/// let response = tokio_test::block_on(client.get("/ping").send());
/// response.assert_status(StatusCode::OK).assert_text("pong");
/// ```
pub struct TestClient<S> {
    server: S,
    default_headers: Vec<(String, String)>,
}

impl<S: Serve> TestClient<S> {
    /// Wraps a configured server.
    pub fn new(server: S) -> Self {
        Self {
            server,
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// The wrapped server.
    pub fn server(&self) -> &S {
        &self.server
    }

    /// Starts a `GET` request.
    pub fn get(&self, uri: impl Into<String>) -> TestClientRequest<'_, S> {
        self.request(Method::GET, uri)
    }

    /// Starts a `POST` request.
    pub fn post(&self, uri: impl Into<String>) -> TestClientRequest<'_, S> {
        self.request(Method::POST, uri)
    }

    /// Starts a `PUT` request.
    pub fn put(&self, uri: impl Into<String>) -> TestClientRequest<'_, S> {
        self.request(Method::PUT, uri)
    }

    /// Starts a `PATCH` request.
    pub fn patch(&self, uri: impl Into<String>) -> TestClientRequest<'_, S> {
        self.request(Method::PATCH, uri)
    }

    /// Starts a `DELETE` request.
    pub fn delete(&self, uri: impl Into<String>) -> TestClientRequest<'_, S> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: impl Into<String>) -> TestClientRequest<'_, S> {
        let mut request = TestRequest::new(method, uri);
        for (name, value) in &self.default_headers {
            request = request.header(name, value);
        }
        TestClientRequest {
            client: self,
            request,
        }
    }

    /// Sends a prepared request.
    pub async fn send(&self, request: TestRequest) -> Result<TestResponse, TestError> {
        let request = request.build()?;
        Ok(self.server.handle(request).await.into())
    }
}

impl<S> fmt::Debug for TestClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestClient")
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

/// A request bound to a [`TestClient`].
#[must_use]
pub struct TestClientRequest<'c, S> {
    client: &'c TestClient<S>,
    request: TestRequest,
}

impl<S: Serve> TestClientRequest<'_, S> {
    /// Adds a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.request = self.request.header(name, value);
        self
    }

    /// Adds a cookie.
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.request = self.request.cookie(name, value);
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.request = self.request.body(body);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.request = self.request.json(value);
        self
    }

    /// Sets a urlencoded form body.
    pub fn form<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.request = self.request.form(value);
        self
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// When the request cannot be built; use [`Self::try_send`] to get the
    /// error instead.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(err) => panic!("test request failed: {err}"),
        }
    }

    /// Sends the request, returning build errors.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        self.client.send(self.request).await
    }
}
