//! Route table integration tests.
//!
//! Builds a representative table and checks both its shape and lookups.

use blaster_router::{Node, RouteTable, SegmentKind};
use http::Method;
use proptest::prelude::*;

const REGISTRATIONS: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/user"),
    ("GET", "user"),
    ("GET", "/home/"),
    ("GET", "/home/*/detail"),
    ("GET", "/home/:order_id"),
    ("GET", "/user/detail/profile"),
    ("GET", "/user/*"),
    ("POST", "/user/detail/profile"),
    ("GET", "/business/order/detail/part"),
];

fn build() -> RouteTable<&'static str> {
    let mut table = RouteTable::new();
    for (method, path) in REGISTRATIONS {
        let method: Method = method.parse().unwrap();
        table.add_route(method, path, *path);
    }
    table
}

/// Expected node shape: segment, terminal flag, and children.
struct Shape {
    segment: &'static str,
    terminal: bool,
    literals: Vec<Shape>,
    param: Option<Box<Shape>>,
    wildcard: Option<Box<Shape>>,
}

fn leaf(segment: &'static str, terminal: bool) -> Shape {
    Shape {
        segment,
        terminal,
        literals: Vec::new(),
        param: None,
        wildcard: None,
    }
}

fn assert_shape<H>(node: &Node<H>, want: &Shape, trail: &str) {
    let trail = format!("{trail}/{}", want.segment);
    assert_eq!(node.segment(), want.segment, "segment at {trail}");
    assert_eq!(node.is_terminal(), want.terminal, "terminal flag at {trail}");
    assert_eq!(node.literal_len(), want.literals.len(), "literal count at {trail}");

    for child in &want.literals {
        let actual = node
            .literal_child(child.segment)
            .unwrap_or_else(|| panic!("missing literal child {} at {trail}", child.segment));
        assert_shape(actual, child, &trail);
    }

    match (&want.param, node.param_child()) {
        (Some(want), Some(actual)) => assert_shape(actual, want, &trail),
        (None, None) => {}
        _ => panic!("param child mismatch at {trail}"),
    }
    match (&want.wildcard, node.wildcard_child()) {
        (Some(want), Some(actual)) => assert_shape(actual, want, &trail),
        (None, None) => {}
        _ => panic!("wildcard child mismatch at {trail}"),
    }
}

#[test]
fn test_tree_shape() {
    let table = build();

    let get = Shape {
        segment: "/",
        terminal: true,
        literals: vec![
            Shape {
                segment: "user",
                terminal: true,
                literals: vec![Shape {
                    literals: vec![leaf("profile", true)],
                    ..leaf("detail", false)
                }],
                param: None,
                wildcard: Some(Box::new(leaf("*", true))),
            },
            Shape {
                segment: "home",
                terminal: true,
                literals: Vec::new(),
                param: Some(Box::new(leaf(":order_id", true))),
                wildcard: Some(Box::new(Shape {
                    literals: vec![leaf("detail", true)],
                    ..leaf("*", false)
                })),
            },
            Shape {
                literals: vec![Shape {
                    literals: vec![Shape {
                        literals: vec![leaf("part", true)],
                        ..leaf("detail", false)
                    }],
                    ..leaf("order", false)
                }],
                ..leaf("business", false)
            },
        ],
        param: None,
        wildcard: None,
    };
    assert_shape(table.tree(&Method::GET).unwrap(), &get, "GET");

    let post = Shape {
        literals: vec![Shape {
            literals: vec![Shape {
                literals: vec![leaf("profile", true)],
                ..leaf("detail", false)
            }],
            ..leaf("user", false)
        }],
        ..leaf("/", false)
    };
    assert_shape(table.tree(&Method::POST).unwrap(), &post, "POST");
}

#[test]
fn test_lookups() {
    let table = build();

    let cases: &[(&str, Option<&str>)] = &[
        ("/", Some("/")),
        ("/user", Some("user")),
        ("/user/detail/profile", Some("profile")),
        ("/user/abc", Some("*")),
        ("/home/abc/detail", Some("detail")),
        ("/user/detail", None),
        ("/business/order", None),
        ("/missing", None),
    ];

    for (path, want) in cases {
        let found = table.find_route(&Method::GET, path);
        match want {
            Some(segment) => {
                let m = found.unwrap_or_else(|e| panic!("{path}: {e}"));
                assert_eq!(m.node().segment(), *segment, "{path}");
            }
            None => assert!(found.is_err(), "{path} should not resolve"),
        }
    }
}

#[test]
fn test_duplicate_user_registration_keeps_latest_handler() {
    let table = build();

    // "/user" and "user" target the same node
    let m = table.find_route(&Method::GET, "/user").unwrap();
    assert_eq!(m.handler(), Some(&"user"));
    assert_eq!(m.registered_path(), "user");
}

#[test]
fn test_param_lookup_requires_marker() {
    let table = build();

    let m = table.find_route(&Method::GET, "/home/:abc").unwrap();
    assert_eq!(m.node().kind(), SegmentKind::Param);
    assert_eq!(m.params().get("order_id"), Some("abc"));
    assert_eq!(m.handler(), Some(&"/home/:order_id"));

    // Without the marker the wildcard edge is tried; "*" under home is
    // intermediate, so this is not a routable match.
    let err = table.find_route(&Method::GET, "/home/abc").unwrap_err();
    assert!(err.is_intermediate());
}

#[test]
fn test_post_tree_is_independent() {
    let table = build();

    let m = table.find_route(&Method::POST, "/user/detail/profile").unwrap();
    assert_eq!(m.handler(), Some(&"/user/detail/profile"));
    assert!(table.find_route(&Method::POST, "/user").is_err());
    assert!(table.find_route(&Method::PUT, "/").is_err());
}

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

proptest! {
    #[test]
    fn prop_literal_routes_resolve_to_themselves(
        segments in prop::collection::vec(segment(), 1..6),
    ) {
        let path = format!("/{}", segments.join("/"));
        let mut table = RouteTable::new();
        table.add_route(Method::GET, &path, path.clone());

        let m = table.find_route(&Method::GET, &path).unwrap();
        prop_assert_eq!(m.handler(), Some(&path));
        prop_assert_eq!(m.registered_path(), segments.join("/"));
        prop_assert_eq!(m.node().segment(), segments.last().unwrap().as_str());

        // Every proper prefix is intermediate
        for len in 1..segments.len() {
            let prefix = format!("/{}", segments[..len].join("/"));
            prop_assert!(table.find_route(&Method::GET, &prefix).unwrap_err().is_intermediate());
        }
    }

    #[test]
    fn prop_slashes_do_not_matter(
        segments in prop::collection::vec(segment(), 1..4),
        leading in 0usize..3,
        trailing in 0usize..3,
    ) {
        let joined = segments.join("/");
        let registered = format!("{}{}{}", "/".repeat(leading), joined, "/".repeat(trailing));
        let mut table = RouteTable::new();
        table.add_route(Method::GET, &registered, ());

        let wrapped = format!("/{joined}/");
        prop_assert!(table.find_route(&Method::GET, &joined).is_ok());
        prop_assert!(table.find_route(&Method::GET, &wrapped).is_ok());
    }

    #[test]
    fn prop_wildcard_matches_any_single_segment(value in segment()) {
        let mut table = RouteTable::new();
        table.add_route(Method::GET, "/files/*", ());

        let m = table.find_route(&Method::GET, &format!("/files/{value}")).unwrap();
        prop_assert_eq!(m.node().segment(), "*");
        prop_assert!(m.params().is_empty());
    }
}
