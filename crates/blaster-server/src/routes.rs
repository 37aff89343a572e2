//! Route registration.
//!
//! [`Routes`] is the registration surface shared by every server flavor and
//! by [`Group`]. Implementors supply [`Routes::add_route`]; the per-method
//! shorthands and grouping come for free.

use blaster_core::{BoxFuture, Context, HandlerFunc};
use http::Method;

/// Registers handlers against method and path.
///
/// # Example
///
/// ```rust
/// use blaster_server::{HttpServe, Routes};
/// use http::StatusCode;
///
/// let mut server = HttpServe::new();
/// server.get("/health", |ctx| Box::pin(async move {
///     ctx.write_string(StatusCode::OK, "ok");
/// }));
///
/// let mut api = server.group("/api/v1");
/// api.post("/user", |ctx| Box::pin(async move {
///     ctx.write_string(StatusCode::CREATED, "created");
/// }));
/// ```
pub trait Routes {
    /// Registers `handler` for `method` and `path`.
    ///
    /// Registering the same method and path again replaces the handler.
    fn add_route(&mut self, method: Method, path: &str, handler: HandlerFunc);

    /// Registers a `GET` handler.
    fn get<F>(&mut self, path: &str, handler: F)
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.add_route(Method::GET, path, HandlerFunc::new(handler));
    }

    /// Registers a `HEAD` handler.
    fn head<F>(&mut self, path: &str, handler: F)
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.add_route(Method::HEAD, path, HandlerFunc::new(handler));
    }

    /// Registers a `POST` handler.
    fn post<F>(&mut self, path: &str, handler: F)
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.add_route(Method::POST, path, HandlerFunc::new(handler));
    }

    /// Registers a `PUT` handler.
    fn put<F>(&mut self, path: &str, handler: F)
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, path, HandlerFunc::new(handler));
    }

    /// Registers a `PATCH` handler.
    fn patch<F>(&mut self, path: &str, handler: F)
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, path, HandlerFunc::new(handler));
    }

    /// Registers a `DELETE` handler.
    fn delete<F>(&mut self, path: &str, handler: F)
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, path, HandlerFunc::new(handler));
    }

    /// Registers a `CONNECT` handler.
    fn connect<F>(&mut self, path: &str, handler: F)
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.add_route(Method::CONNECT, path, HandlerFunc::new(handler));
    }

    /// Registers an `OPTIONS` handler.
    fn options<F>(&mut self, path: &str, handler: F)
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.add_route(Method::OPTIONS, path, HandlerFunc::new(handler));
    }

    /// Registers a `TRACE` handler.
    fn trace<F>(&mut self, path: &str, handler: F)
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.add_route(Method::TRACE, path, HandlerFunc::new(handler));
    }

    /// Returns a registrar that prefixes every path with `prefix`.
    fn group(&mut self, prefix: &str) -> Group<'_, Self>
    where
        Self: Sized,
    {
        Group::new(self, prefix)
    }
}

/// Routes registered under a shared path prefix.
///
/// Groups nest: a group of a group concatenates both prefixes.
#[derive(Debug)]
pub struct Group<'s, R: Routes + ?Sized> {
    prefix: String,
    routes: &'s mut R,
}

impl<'s, R: Routes + ?Sized> Group<'s, R> {
    /// Creates a group over `routes`.
    pub fn new(routes: &'s mut R, prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            routes,
        }
    }

    /// The normalized prefix, without a trailing slash.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn join(&self, path: &str) -> String {
        format!("{}/{}", self.prefix, path.trim_start_matches('/'))
    }
}

impl<R: Routes + ?Sized> Routes for Group<'_, R> {
    fn add_route(&mut self, method: Method, path: &str, handler: HandlerFunc) {
        let full = self.join(path);
        self.routes.add_route(method, &full, handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorded(Vec<(Method, String)>);

    impl Routes for Recorded {
        fn add_route(&mut self, method: Method, path: &str, _handler: HandlerFunc) {
            self.0.push((method, path.to_string()));
        }
    }

    fn noop(_ctx: &mut Context) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }

    #[test]
    fn test_shorthands_use_their_method() {
        let mut routes = Recorded::default();
        routes.get("/a", noop);
        routes.head("/a", noop);
        routes.post("/a", noop);
        routes.put("/a", noop);
        routes.patch("/a", noop);
        routes.delete("/a", noop);
        routes.connect("/a", noop);
        routes.options("/a", noop);
        routes.trace("/a", noop);

        let methods: Vec<Method> = routes.0.into_iter().map(|(method, _)| method).collect();
        assert_eq!(
            methods,
            vec![
                Method::GET,
                Method::HEAD,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::CONNECT,
                Method::OPTIONS,
                Method::TRACE,
            ]
        );
    }

    #[test]
    fn test_group_prefixes_paths() {
        let mut routes = Recorded::default();
        {
            let mut api = routes.group("/api/v1/");
            assert_eq!(api.prefix(), "/api/v1");
            api.get("/user", noop);
            api.get("order", noop);
        }

        assert_eq!(routes.0[0].1, "/api/v1/user");
        assert_eq!(routes.0[1].1, "/api/v1/order");
    }

    #[test]
    fn test_groups_nest() {
        let mut routes = Recorded::default();
        {
            let mut api = routes.group("/api");
            let mut v2 = api.group("v2");
            v2.delete("/item/:id", noop);
        }

        assert_eq!(routes.0, vec![(Method::DELETE, "/api/v2/item/:id".to_string())]);
    }

    #[test]
    fn test_empty_prefix_is_transparent() {
        let mut routes = Recorded::default();
        routes.group("").get("/health", noop);
        assert_eq!(routes.0[0].1, "/health");
    }
}
