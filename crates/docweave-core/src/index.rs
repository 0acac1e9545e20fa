//! Project structure index: namespaces keyed by dotted path.

use crate::element::ElementId;

/// Stable index of a node in a [`ProjectIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexNodeId(usize);

/// One path segment, optionally bound to a namespace element.
#[derive(Debug, Clone)]
pub struct IndexNode {
    name: String,
    namespace: Option<ElementId>,
    parent: Option<IndexNodeId>,
    children: Vec<IndexNodeId>,
}

impl IndexNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<ElementId> {
        self.namespace
    }

    pub fn parent(&self) -> Option<IndexNodeId> {
        self.parent
    }

    pub fn children(&self) -> &[IndexNodeId] {
        &self.children
    }
}

/// Tree of namespace path segments rooted at a nameless node.
///
/// The root node holds the global namespace, if any declaration was found
/// outside of every namespace.
#[derive(Debug, Clone)]
pub struct ProjectIndex {
    nodes: Vec<IndexNode>,
}

impl Default for ProjectIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self {
            nodes: vec![IndexNode {
                name: String::new(),
                namespace: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> IndexNodeId {
        IndexNodeId(0)
    }

    pub fn node(&self, id: IndexNodeId) -> &IndexNode {
        &self.nodes[id.0]
    }

    /// Walks `path` (dot separated) below `from`, creating missing nodes.
    pub fn node_for_path(&mut self, from: IndexNodeId, path: &str) -> IndexNodeId {
        segments(path).fold(from, |current, segment| {
            match self.child_named(current, segment) {
                Some(existing) => existing,
                None => {
                    let id = IndexNodeId(self.nodes.len());
                    self.nodes.push(IndexNode {
                        name: segment.to_string(),
                        namespace: None,
                        parent: Some(current),
                        children: Vec::new(),
                    });
                    self.nodes[current.0].children.push(id);
                    id
                }
            }
        })
    }

    /// Walks `path` below `from` without creating nodes.
    pub fn find(&self, from: IndexNodeId, path: &str) -> Option<IndexNodeId> {
        segments(path).try_fold(from, |current, segment| self.child_named(current, segment))
    }

    pub fn set_namespace(&mut self, id: IndexNodeId, namespace: ElementId) {
        self.nodes[id.0].namespace = Some(namespace);
    }

    /// Dotted path from the root to `id`.
    pub fn full_path(&self, id: IndexNodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let node = &self.nodes[node.0];
            if node.parent.is_some() {
                segments.push(node.name.as_str());
            }
            current = node.parent;
        }
        segments.reverse();
        segments.join(".")
    }

    /// Depth-first pre-order walk over every node, root first, children in
    /// insertion order.
    pub fn walk(&self) -> Vec<IndexNodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Namespace elements in walk order.
    pub fn namespaces(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.walk()
            .into_iter()
            .filter_map(|id| self.nodes[id.0].namespace)
    }

    fn child_named(&self, parent: IndexNodeId, name: &str) -> Option<IndexNodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|child| self.nodes[child.0].name == name)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').map(str::trim).filter(|s| !s.is_empty())
}
