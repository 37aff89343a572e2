//! Trie node implementation.
//!
//! Each node owns its children outright: literal children in a map keyed by
//! segment text, plus at most one parameter child and one wildcard child.

use std::collections::HashMap;

/// Marker segment for the single-segment wildcard.
pub const WILDCARD: &str = "*";

/// Prefix marking a named parameter segment.
pub const PARAM_MARKER: char = ':';

/// Classification of a pattern segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Exact-match text (e.g. `user`)
    Literal,
    /// Named parameter (e.g. `:order_id`)
    Param,
    /// Any single segment (`*`)
    Wildcard,
}

impl SegmentKind {
    /// Classifies a pattern segment.
    #[must_use]
    pub fn of(segment: &str) -> Self {
        if segment == WILDCARD {
            Self::Wildcard
        } else if segment.starts_with(PARAM_MARKER) {
            Self::Param
        } else {
            Self::Literal
        }
    }
}

/// A node in a method's routing trie.
///
/// A node carries a handler only when a registration ended exactly here.
/// Nodes created as intermediate hops (e.g. `user` while registering
/// `/user/detail`) exist structurally but are not routable.
#[derive(Debug, Clone)]
pub struct Node<H> {
    /// The path segment this node represents
    segment: String,

    /// Literal children keyed by segment text
    literal_children: HashMap<String, Node<H>>,

    /// Parameter child (at most one per node)
    param_child: Option<Box<Node<H>>>,

    /// Wildcard child (at most one per node)
    wildcard_child: Option<Box<Node<H>>>,

    /// Handler bound by the registration that ended here
    handler: Option<H>,

    /// Trimmed path used at registration
    registered_path: String,
}

impl<H> Node<H> {
    /// Creates a detached node for `segment`.
    #[must_use]
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            literal_children: HashMap::new(),
            param_child: None,
            wildcard_child: None,
            handler: None,
            registered_path: String::new(),
        }
    }

    /// Creates the root node of a method tree.
    #[must_use]
    pub fn root() -> Self {
        Self::new("/")
    }

    /// The segment text (`/` for the root, `*` or `:name` for placeholders).
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Kind of this node's segment.
    #[must_use]
    pub fn kind(&self) -> SegmentKind {
        SegmentKind::of(&self.segment)
    }

    /// The parameter name this node binds, without the `:` marker.
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        self.segment.strip_prefix(PARAM_MARKER)
    }

    /// The handler bound here, if a registration targeted this node.
    #[must_use]
    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// Returns true if a registration ended at this node.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.handler.is_some()
    }

    /// The trimmed path of the registration that ended here.
    ///
    /// Empty for intermediate nodes.
    #[must_use]
    pub fn registered_path(&self) -> &str {
        &self.registered_path
    }

    /// Looks up a literal child by exact segment text.
    #[must_use]
    pub fn literal_child(&self, segment: &str) -> Option<&Node<H>> {
        self.literal_children.get(segment)
    }

    /// Number of literal children.
    #[must_use]
    pub fn literal_len(&self) -> usize {
        self.literal_children.len()
    }

    /// The parameter child, if any.
    #[must_use]
    pub fn param_child(&self) -> Option<&Node<H>> {
        self.param_child.as_deref()
    }

    /// The wildcard child, if any.
    #[must_use]
    pub fn wildcard_child(&self) -> Option<&Node<H>> {
        self.wildcard_child.as_deref()
    }

    /// Counts this node and every node below it.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .literal_children
            .values()
            .map(Node::node_count)
            .sum::<usize>()
            + self.param_child.as_ref().map_or(0, |c| c.node_count())
            + self.wildcard_child.as_ref().map_or(0, |c| c.node_count())
    }

    /// Returns the child for `segment`, creating it if absent.
    ///
    /// The parameter slot is shared by every `:name` segment under this
    /// node: the child is created once, but its declared name follows the
    /// latest registration.
    pub(crate) fn child_or_insert(&mut self, segment: &str) -> &mut Node<H> {
        match SegmentKind::of(segment) {
            SegmentKind::Wildcard => &mut **self
                .wildcard_child
                .get_or_insert_with(|| Box::new(Node::new(WILDCARD))),
            SegmentKind::Param => {
                let child = self
                    .param_child
                    .get_or_insert_with(|| Box::new(Node::new(segment)));
                if child.segment != segment {
                    child.segment = segment.to_string();
                }
                &mut **child
            }
            SegmentKind::Literal => self
                .literal_children
                .entry(segment.to_string())
                .or_insert_with(|| Node::new(segment)),
        }
    }

    /// Binds a handler, replacing any previous one.
    pub(crate) fn bind(&mut self, handler: H, registered_path: &str) {
        self.handler = Some(handler);
        self.registered_path = registered_path.to_string();
    }
}
