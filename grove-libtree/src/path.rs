use std::fmt;

use serde::{Deserialize, Serialize};

/// Absolute slash-delimited location of one entry in the remote namespace.
///
/// Paths are normalized on construction: a leading slash is guaranteed,
/// duplicate and trailing slashes are stripped. `/` is the namespace root.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub struct NodePath(String);

impl NodePath {
    /// Return the namespace root path `/`.
    pub fn root() -> Self {
        Self(String::from("/"))
    }

    /// Build a normalized path from a raw string.
    pub fn new(raw: &str) -> Self {
        Self::from_segments(raw.split('/'))
    }

    /// Build a path by joining segments with `/`.
    ///
    /// Empty segments are skipped, so both `["a", "b"]` and `["", "a", "b"]`
    /// produce `/a/b`.
    pub fn from_segments<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut raw = String::new();
        for segment in segments {
            if segment.is_empty() {
                continue;
            }
            raw.push('/');
            raw.push_str(segment);
        }

        if raw.is_empty() {
            return Self::root();
        }

        Self(raw)
    }

    /// Return the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return whether this path is the namespace root.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Return the last segment (the entry name), empty for the root.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Return the parent path, `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }

        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(index) => Some(Self(self.0[..index].to_string())),
            None => None,
        }
    }

    /// Return the path extended by one child name.
    pub fn join(&self, name: &str) -> NodePath {
        Self::from_segments(self.segments().chain([name]))
    }

    /// Iterate over the non-empty path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// Return whether `ancestor` is this path or one of its ancestors.
    pub fn starts_with(&self, ancestor: &NodePath) -> bool {
        if ancestor.is_root() {
            return true;
        }

        self.0 == ancestor.0
            || (self.0.len() > ancestor.0.len()
                && self.0.starts_with(&ancestor.0)
                && self.0.as_bytes()[ancestor.0.len()] == b'/')
    }

    /// Return the ordered paths strictly between `root` and this path.
    ///
    /// The list excludes both endpoints: for `/a/b/c/d` under root `/a` it
    /// is `[/a/b, /a/b/c]`. Returns `None` when this path is not under
    /// `root`, and an empty list when it equals `root` or is a direct child.
    pub fn ancestor_chain(&self, root: &NodePath) -> Option<Vec<NodePath>> {
        if !self.starts_with(root) {
            return None;
        }

        let mut chain = Vec::new();
        let mut current = root.clone();
        let skip = root.segments().count();
        let mut relative = self.segments().skip(skip).peekable();
        while let Some(segment) = relative.next() {
            if relative.peek().is_none() {
                break;
            }
            current = current.join(segment);
            chain.push(current.clone());
        }

        Some(chain)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<String> for NodePath {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.0
    }
}
