//! Route tree: the flat descriptor list grouped by shared path prefixes.
//!
//! Nodes live in an arena (`Vec<RouteNode>`) and refer to their children by
//! index, so the tree has no back-references. It is built once per run and is
//! read-only afterwards.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::descriptor::{
    BodyDescriptor, HttpMethod, ParamDescriptor, ResponseDescriptor, RouteDescriptor,
};
use crate::error::GenerateError;

/// Index of a node in the arena.
pub type NodeId = usize;

/// Whether a segment is literal path text or a parameter placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Static,
    Param,
}

/// One path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Literal text for static segments, parameter name for params.
    pub name: String,
}

impl Segment {
    /// Classify a raw segment: `{name}` and `:name` are parameters.
    pub fn parse(raw: &str) -> Self {
        let param = raw
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .or_else(|| raw.strip_prefix(':'))
            .filter(|name| !name.is_empty());

        match param {
            Some(name) => Segment {
                kind: SegmentKind::Param,
                name: name.to_string(),
            },
            None => Segment {
                kind: SegmentKind::Static,
                name: raw.to_string(),
            },
        }
    }

    pub fn is_param(&self) -> bool {
        self.kind == SegmentKind::Param
    }

    /// Canonical template form: literal text, or `:name` for parameters.
    pub fn template(&self) -> String {
        match self.kind {
            SegmentKind::Static => self.name.clone(),
            SegmentKind::Param => format!(":{}", self.name),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template())
    }
}

/// Split a path into segments, ignoring empty ones (leading/trailing/double slashes).
pub fn parse_path(path: &str) -> Vec<Segment> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(Segment::parse)
        .collect()
}

/// Route template with `:name` placeholders (`/guilds/:guild_id`). The root is `/`.
pub fn route_template(segments: &[Segment]) -> String {
    let mut template = String::new();
    for segment in segments {
        template.push('/');
        template.push_str(&segment.template());
    }
    if template.is_empty() {
        template.push('/');
    }
    template
}

/// Declared inputs of an operation.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub path: Vec<ParamDescriptor>,
    pub query: Vec<ParamDescriptor>,
    pub header: Vec<ParamDescriptor>,
    pub body: Option<BodyDescriptor>,
}

impl Inputs {
    /// True when no parameter of any location and no body is declared.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
            && self.query.is_empty()
            && self.header.is_empty()
            && self.body.is_none()
    }
}

/// A validated operation attached to its terminal route node.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    pub method: HttpMethod,
    /// Path as written in the descriptor (`/guilds/{guild_id}`).
    pub source_path: String,
    /// Segments from the root to the terminal node.
    pub path: Vec<Segment>,
    pub inputs: Inputs,
    /// Response variants in declaration order.
    pub responses: Vec<ResponseDescriptor>,
    pub summary: Option<String>,
    pub deprecated: bool,
}

impl OperationDescriptor {
    /// Route template of this operation (`/guilds/:guild_id`).
    pub fn template(&self) -> String {
        route_template(&self.path)
    }
}

/// A named tree node.
#[derive(Debug, Clone)]
pub struct RouteNode {
    /// `None` for the root.
    pub segment: Option<Segment>,
    /// Children in first-insertion order.
    pub children: Vec<NodeId>,
    pub operations: BTreeMap<HttpMethod, OperationDescriptor>,
}

impl RouteNode {
    fn new(segment: Option<Segment>) -> Self {
        Self {
            segment,
            children: Vec::new(),
            operations: BTreeMap::new(),
        }
    }
}

/// Arena-backed route tree. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct RouteTree {
    nodes: Vec<RouteNode>,
}

impl RouteTree {
    /// Id of the root node.
    pub const ROOT: NodeId = 0;

    /// Build the tree from descriptors in upstream order.
    pub fn build(descriptors: &[RouteDescriptor]) -> Result<Self, GenerateError> {
        let mut tree = RouteTree {
            nodes: vec![RouteNode::new(None)],
        };

        for descriptor in descriptors {
            let operation = validate(descriptor)?;
            tree.insert(operation)?;
        }

        debug!(
            nodes = tree.nodes.len(),
            operations = descriptors.len(),
            "Built route tree."
        );

        Ok(tree)
    }

    fn insert(&mut self, operation: OperationDescriptor) -> Result<(), GenerateError> {
        let mut current = Self::ROOT;

        for (index, segment) in operation.path.iter().enumerate() {
            let existing = self.nodes[current]
                .children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].segment.as_ref() == Some(segment));

            current = match existing {
                Some(child) => child,
                None => {
                    let clash = self.nodes[current].children.iter().find_map(|&child| {
                        self.nodes[child]
                            .segment
                            .as_ref()
                            .filter(|s| s.kind != segment.kind)
                    });
                    if let Some(clash) = clash {
                        return Err(GenerateError::AmbiguousSegment {
                            method: operation.method,
                            path: operation.source_path.clone(),
                            position: index + 1,
                            existing: clash.template(),
                            incoming: segment.template(),
                        });
                    }

                    let id = self.nodes.len();
                    self.nodes.push(RouteNode::new(Some(segment.clone())));
                    self.nodes[current].children.push(id);
                    id
                }
            };
        }

        let node = &mut self.nodes[current];
        if node.operations.contains_key(&operation.method) {
            return Err(GenerateError::DuplicateOperation {
                method: operation.method,
                path: operation.source_path.clone(),
            });
        }
        node.operations.insert(operation.method, operation);
        Ok(())
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> &RouteNode {
        &self.nodes[id]
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root; it is empty when it has no operations.
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.operations.is_empty())
    }

    /// Child of `id` with the given canonical template (`guilds`, `:guild_id`).
    pub fn child(&self, id: NodeId, template: &str) -> Option<NodeId> {
        self.nodes[id].children.iter().copied().find(|&child| {
            self.nodes[child]
                .segment
                .as_ref()
                .is_some_and(|s| s.template() == template)
        })
    }

    /// Operations in depth-first pre-order: a node's own operations (GET, POST,
    /// PUT, PATCH, DELETE) before those of its children, children in insertion order.
    pub fn operations(&self) -> Vec<&OperationDescriptor> {
        let mut out = Vec::new();
        self.collect(Self::ROOT, &mut out);
        out
    }

    fn collect<'a>(&'a self, id: NodeId, out: &mut Vec<&'a OperationDescriptor>) {
        let node = &self.nodes[id];
        out.extend(node.operations.values());
        for &child in &node.children {
            self.collect(child, out);
        }
    }
}

/// Parse the method and check that declared path params equal the path's param segments.
fn validate(descriptor: &RouteDescriptor) -> Result<OperationDescriptor, GenerateError> {
    let method: HttpMethod = descriptor.method.parse().map_err(|method| {
        GenerateError::InvalidMethod {
            method,
            path: descriptor.path.clone(),
        }
    })?;

    let path = parse_path(&descriptor.path);

    let mut segments: Vec<String> = path
        .iter()
        .filter(|s| s.is_param())
        .map(|s| s.name.clone())
        .collect();
    let mut declared: Vec<String> = descriptor
        .path_params
        .iter()
        .map(|p| p.name.clone())
        .collect();
    segments.sort();
    declared.sort();
    if segments != declared {
        return Err(GenerateError::PathParameterMismatch {
            method,
            path: descriptor.path.clone(),
            declared,
            segments,
        });
    }

    Ok(OperationDescriptor {
        method,
        source_path: descriptor.path.clone(),
        path,
        inputs: Inputs {
            path: descriptor.path_params.clone(),
            query: descriptor.query_params.clone(),
            header: descriptor.header_params.clone(),
            body: descriptor.body.clone(),
        },
        responses: descriptor.responses.clone(),
        summary: descriptor.summary.clone(),
        deprecated: descriptor.deprecated,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn path_param(name: &str) -> ParamDescriptor {
        ParamDescriptor {
            name: name.into(),
            required: true,
            schema: None,
        }
    }

    fn route(method: HttpMethod, path: &str) -> RouteDescriptor {
        let mut descriptor = RouteDescriptor::new(method, path);
        descriptor.path_params = parse_path(path)
            .iter()
            .filter(|s| s.is_param())
            .map(|s| path_param(&s.name))
            .collect();
        descriptor
    }

    #[test]
    fn test_segment_parse() {
        assert_eq!(
            Segment::parse("{guild_id}"),
            Segment {
                kind: SegmentKind::Param,
                name: "guild_id".into()
            }
        );
        assert_eq!(Segment::parse(":user_id").kind, SegmentKind::Param);
        assert_eq!(Segment::parse("current-user").kind, SegmentKind::Static);
        assert_eq!(Segment::parse("{}").kind, SegmentKind::Static);
        assert_eq!(Segment::parse("@me").template(), "@me");
        assert_eq!(Segment::parse("{topicId}").template(), ":topicId");
    }

    #[test]
    fn test_route_template() {
        assert_eq!(
            route_template(&parse_path("/guilds/{guild_id}/bans/{user_id}")),
            "/guilds/:guild_id/bans/:user_id"
        );
        assert_eq!(route_template(&parse_path("/")), "/");
        assert_eq!(route_template(&parse_path("//gateway/")), "/gateway");
    }

    #[test]
    fn test_build_shares_prefixes() {
        let tree = RouteTree::build(&[
            route(HttpMethod::Get, "/guilds/{guild_id}"),
            route(HttpMethod::Get, "/guilds/{guild_id}/bans"),
            route(HttpMethod::Get, "/gateway"),
        ])
        .unwrap();

        // root, guilds, :guild_id, bans, gateway
        assert_eq!(tree.len(), 5);
        let guilds = tree.child(RouteTree::ROOT, "guilds").unwrap();
        let guild = tree.child(guilds, ":guild_id").unwrap();
        assert!(tree.node(guild).operations.contains_key(&HttpMethod::Get));
        assert!(tree.child(guild, "bans").is_some());
        assert!(tree.child(RouteTree::ROOT, "gateway").is_some());
    }

    #[test]
    fn test_operations_depth_first_in_method_order() {
        let tree = RouteTree::build(&[
            route(HttpMethod::Delete, "/topics/{topicId}/follow"),
            route(HttpMethod::Get, "/gateway"),
            route(HttpMethod::Get, "/topics/{topicId}/follow"),
            route(HttpMethod::Post, "/topics"),
        ])
        .unwrap();

        let order: Vec<_> = tree
            .operations()
            .iter()
            .map(|op| format!("{} {}", op.method, op.template()))
            .collect();
        assert_eq!(
            order,
            [
                "POST /topics",
                "GET /topics/:topicId/follow",
                "DELETE /topics/:topicId/follow",
                "GET /gateway",
            ]
        );
    }

    #[test]
    fn test_ambiguous_segment() {
        let err = RouteTree::build(&[
            route(HttpMethod::Get, "/orgs/users/list"),
            route(HttpMethod::Get, "/orgs/{userId}/list"),
        ])
        .unwrap_err();

        match err {
            GenerateError::AmbiguousSegment {
                method,
                path,
                position,
                existing,
                incoming,
            } => {
                assert_eq!(method, HttpMethod::Get);
                assert_eq!(path, "/orgs/{userId}/list");
                assert_eq!(position, 2);
                assert_eq!(existing, "users");
                assert_eq!(incoming, ":userId");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ambiguous_segment_param_first() {
        let err = RouteTree::build(&[
            route(HttpMethod::Get, "/users/{user_id}"),
            route(HttpMethod::Get, "/users/@me"),
        ])
        .unwrap_err();
        assert!(matches!(err, GenerateError::AmbiguousSegment { position: 2, .. }));
    }

    #[test]
    fn test_distinct_param_names_are_distinct_children() {
        let tree = RouteTree::build(&[
            route(HttpMethod::Get, "/users/{id}"),
            route(HttpMethod::Get, "/users/{userId}/posts"),
        ])
        .unwrap();
        let users = tree.child(RouteTree::ROOT, "users").unwrap();
        assert_eq!(tree.node(users).children.len(), 2);
    }

    #[test]
    fn test_duplicate_operation() {
        let err = RouteTree::build(&[
            route(HttpMethod::Get, "/gateway"),
            route(HttpMethod::Post, "/gateway"),
            route(HttpMethod::Get, "/gateway/"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            GenerateError::DuplicateOperation {
                method: HttpMethod::Get,
                path: "/gateway/".into()
            }
        );
    }

    #[test]
    fn test_duplicate_across_placeholder_syntax() {
        let err = RouteTree::build(&[
            route(HttpMethod::Get, "/items/{id}"),
            route(HttpMethod::Get, "/items/:id"),
        ])
        .unwrap_err();
        assert!(matches!(err, GenerateError::DuplicateOperation { .. }));
    }

    #[test]
    fn test_invalid_method() {
        let descriptor = RouteDescriptor {
            method: "TRACE".into(),
            ..RouteDescriptor::new(HttpMethod::Get, "/gateway")
        };
        let err = RouteTree::build(&[descriptor]).unwrap_err();
        assert_eq!(
            err,
            GenerateError::InvalidMethod {
                method: "TRACE".into(),
                path: "/gateway".into()
            }
        );
    }

    #[test]
    fn test_path_parameter_mismatch() {
        let mut descriptor = RouteDescriptor::new(HttpMethod::Get, "/guilds/{guild_id}");
        descriptor.path_params = vec![path_param("id")];
        let err = RouteTree::build(&[descriptor]).unwrap_err();
        assert!(matches!(err, GenerateError::PathParameterMismatch { .. }));

        let undeclared = RouteDescriptor::new(HttpMethod::Get, "/guilds/{guild_id}");
        assert!(RouteTree::build(&[undeclared]).is_err());
    }

    #[test]
    fn test_root_operation() {
        let tree = RouteTree::build(&[route(HttpMethod::Get, "/")]).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.operations()[0].template(), "/");
    }
}
