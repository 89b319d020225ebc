//! Document - structured payload carried through the pipeline
//!
//! A minimal element tree. Paths are dot-separated child names relative to
//! the root node: for a root `SOAMessage`, the path `"UpstreamToSOA.Body"`
//! addresses `SOAMessage > UpstreamToSOA > Body`. When several siblings share
//! a name, a path segment addresses the first one.

use serde::{Deserialize, Serialize};

/// One element of a [`Document`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Element name
    pub name: String,

    /// Text content (leaf value)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Child elements, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf element with text
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    /// Builder: append a child
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    fn child_or_insert(&mut self, name: &str) -> &mut Node {
        let idx = match self.children.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.children.push(Node::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }
}

/// Structured document with a single root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Root element
    pub root: Node,
}

impl Document {
    /// Create a document with an empty root
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: Node::new(root_name),
        }
    }

    /// Wrap an existing node as document root
    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    /// Resolve a path to a node
    pub fn node(&self, path: &str) -> Option<&Node> {
        segments(path).try_fold(&self.root, |node, seg| node.child(seg))
    }

    fn node_mut(&mut self, path: &str) -> Option<&mut Node> {
        segments(path).try_fold(&mut self.root, |node, seg| node.child_mut(seg))
    }

    /// Whether a node exists at `path`
    pub fn exists(&self, path: &str) -> bool {
        self.node(path).is_some()
    }

    /// Text value at `path`
    pub fn value(&self, path: &str) -> Option<&str> {
        self.node(path).and_then(|n| n.text.as_deref())
    }

    /// Immediate children of the node at `path`
    pub fn children(&self, path: &str) -> Option<&[Node]> {
        self.node(path).map(|n| n.children.as_slice())
    }

    /// Remove the node at `path`, returning it
    ///
    /// The root itself cannot be removed.
    pub fn remove(&mut self, path: &str) -> Option<Node> {
        let (parent, last) = match path.rsplit_once('.') {
            Some((parent, last)) => (Some(parent), last),
            None => (None, path),
        };
        if last.is_empty() {
            return None;
        }
        let parent = match parent {
            Some(parent) => self.node_mut(parent)?,
            None => &mut self.root,
        };
        let idx = parent.children.iter().position(|c| c.name == last)?;
        Some(parent.children.remove(idx))
    }

    /// Set the text at `path`, creating missing intermediate nodes
    pub fn set_value(&mut self, path: &str, value: impl Into<String>) {
        self.ensure(path).text = Some(value.into());
    }

    /// Graft `node`'s content at `path`, creating missing intermediate nodes
    ///
    /// The target keeps the name given by the last path segment and takes
    /// over the text and children of `node`. An empty path grafts onto the
    /// root.
    pub fn set_node(&mut self, path: &str, node: &Node) {
        let target = self.ensure(path);
        target.text = node.text.clone();
        target.children = node.children.clone();
    }

    fn ensure(&mut self, path: &str) -> &mut Node {
        segments(path).fold(&mut self.root, |node, seg| node.child_or_insert(seg))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}
