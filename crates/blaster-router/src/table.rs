//! Per-method route table.
//!
//! [`RouteTable`] keeps one trie per HTTP method and owns the two core
//! operations: [`RouteTable::add_route`] during setup and
//! [`RouteTable::find_route`] while serving.

use std::collections::HashMap;
use std::fmt;

use http::Method;

use crate::node::{Node, PARAM_MARKER};
use crate::params::Params;

/// A resolved route: the node the walk ended on plus any bound parameter.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    node: &'a Node<H>,
    params: Params,
}

impl<'a, H> RouteMatch<'a, H> {
    fn new(node: &'a Node<H>, params: Params) -> Self {
        Self { node, params }
    }

    /// The node the lookup resolved to.
    #[must_use]
    pub fn node(&self) -> &'a Node<H> {
        self.node
    }

    /// The handler bound on the resolved node.
    ///
    /// `None` is possible for the root path and for parameter nodes that
    /// were only ever intermediate hops; dispatch treats that as not found.
    #[must_use]
    pub fn handler(&self) -> Option<&'a H> {
        self.node.handler()
    }

    /// The registered path of the resolved node.
    #[must_use]
    pub fn registered_path(&self) -> &'a str {
        self.node.registered_path()
    }

    /// Parameters bound during the walk.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Consumes the match, returning its parameters.
    #[must_use]
    pub fn into_params(self) -> Params {
        self.params
    }
}

/// Why a lookup did not produce a routable match.
pub enum MatchError<'a, H> {
    /// No tree for the method, or no edge for some segment.
    NotFound,
    /// The walk consumed every segment but ended on a node that no
    /// registration targeted.
    Intermediate(&'a Node<H>),
}

impl<'a, H> MatchError<'a, H> {
    /// Returns true for the located-but-unregistered case.
    #[must_use]
    pub fn is_intermediate(&self) -> bool {
        matches!(self, Self::Intermediate(_))
    }

    /// The node that was located, if any.
    #[must_use]
    pub fn node(&self) -> Option<&'a Node<H>> {
        match self {
            Self::NotFound => None,
            Self::Intermediate(node) => Some(*node),
        }
    }
}

impl<H> fmt::Debug for MatchError<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("NotFound"),
            Self::Intermediate(node) => f
                .debug_tuple("Intermediate")
                .field(&node.segment())
                .finish(),
        }
    }
}

impl<H> fmt::Display for MatchError<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("route not found"),
            Self::Intermediate(node) => {
                write!(f, "segment '{}' is not a registered endpoint", node.segment())
            }
        }
    }
}

impl<H> std::error::Error for MatchError<'_, H> {}

/// One routing trie per HTTP method.
///
/// The table is mutated only through `&mut self`, so once a server moves it
/// behind an `Arc` for serving, lookups run concurrently without locking.
///
/// # Example
///
/// ```rust
/// use blaster_router::RouteTable;
/// use http::Method;
///
/// let mut table = RouteTable::new();
/// table.add_route(Method::GET, "/user/:id", "user");
/// table.add_route(Method::GET, "/files/*", "files");
///
/// let m = table.find_route(&Method::GET, "/files/readme").unwrap();
/// assert_eq!(m.handler(), Some(&"files"));
/// assert_eq!(m.registered_path(), "files/*");
/// ```
#[derive(Clone)]
pub struct RouteTable<H> {
    trees: HashMap<Method, Node<H>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteTable<H> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
        }
    }

    /// Registers `handler` for `method` and `path`.
    ///
    /// Leading and trailing slashes are insignificant. Registering the same
    /// path twice replaces the handler on the same node.
    pub fn add_route(&mut self, method: Method, path: &str, handler: H) {
        tracing::debug!(%method, path, "registering route");

        let mut node = self.trees.entry(method).or_insert_with(Node::root);
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            node.bind(handler, "/");
            return;
        }

        for segment in trimmed.split('/') {
            node = node.child_or_insert(segment);
        }
        node.bind(handler, trimmed);
    }

    /// Resolves `method` and `path` to a node.
    ///
    /// Literal edges are preferred, then the parameter edge, then the
    /// wildcard edge. The parameter edge is only taken when the request
    /// segment itself starts with `:`; the walk then stops at the parameter
    /// node regardless of any remaining segments.
    ///
    /// The root path always resolves to the root node, handler or not.
    pub fn find_route(&self, method: &Method, path: &str) -> Result<RouteMatch<'_, H>, MatchError<'_, H>> {
        let root = self.trees.get(method).ok_or(MatchError::NotFound)?;
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(RouteMatch::new(root, Params::new()));
        }

        let mut node = root;
        for segment in trimmed.split('/') {
            if let Some(child) = node.literal_child(segment) {
                node = child;
                continue;
            }

            if let (Some(value), Some(param)) = (segment.strip_prefix(PARAM_MARKER), node.param_child()) {
                let params = Params::single(param.param_name().unwrap_or_default(), value);
                return Ok(RouteMatch::new(param, params));
            }

            match node.wildcard_child() {
                Some(wildcard) => node = wildcard,
                None => return Err(MatchError::NotFound),
            }
        }

        if node.is_terminal() {
            Ok(RouteMatch::new(node, Params::new()))
        } else {
            Err(MatchError::Intermediate(node))
        }
    }

    /// The root node for `method`, if any route was registered under it.
    #[must_use]
    pub fn tree(&self, method: &Method) -> Option<&Node<H>> {
        self.trees.get(method)
    }

    /// Methods that have a tree.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.trees.keys()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl<H> fmt::Debug for RouteTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("methods", &self.trees.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
