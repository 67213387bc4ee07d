//! The universal line-node tree underlying every record.
//!
//! Each record owns one [`LineArena`]: a flat arena of [`LineNode`]s
//! addressed by stable [`LineId`] indices. Parent links are stored indices
//! (a relationship, not ownership) and children are kept in arrival order,
//! so both the per-tag order and the cross-tag insertion order of the
//! source document survive. Node 0 is always the record's level-0 root.
//!
//! The arena also evaluates the dot-separated path queries
//! (`"BIRT.DATE"`) that records expose.

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

/// A stable handle to a node within one [`LineArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct LineId(pub(crate) u32);

impl LineId {
    /// The root of every arena.
    pub(crate) const ROOT: LineId = LineId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One GEDCOM line as a tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct LineNode {
    /// Nesting depth. Strictly greater than the parent's level.
    pub level: u8,
    /// The line's tag, compared case-sensitively.
    pub tag: String,
    /// The line's value, with any `CONC`/`CONT` continuations folded in.
    pub value: String,
    /// Cross-reference identifier; present only on level-0 lines.
    pub xref: Option<String>,
    /// 1-based source line number.
    pub line_number: u32,
    parent: Option<LineId>,
    children: Vec<LineId>,
}

impl LineNode {
    /// Creates a detached node.
    #[must_use]
    pub fn new(level: u8, tag: &str, value: &str, xref: Option<&str>, line_number: u32) -> Self {
        LineNode {
            level,
            tag: tag.to_string(),
            value: value.to_string(),
            xref: xref.map(ToString::to_string),
            line_number,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The parent handle, `None` only for level-0 roots.
    #[must_use]
    pub fn parent(&self) -> Option<LineId> {
        self.parent
    }

    /// Direct children in arrival order.
    #[must_use]
    pub fn children(&self) -> &[LineId] {
        &self.children
    }
}

/// A record's exclusively owned line subtree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct LineArena {
    nodes: Vec<LineNode>,
}

impl LineArena {
    /// Starts an arena from its level-0 root node.
    #[must_use]
    pub fn with_root(root: LineNode) -> Self {
        LineArena { nodes: vec![root] }
    }

    /// The root handle.
    #[must_use]
    pub fn root(&self) -> LineId {
        LineId::ROOT
    }

    /// Borrows a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this arena.
    #[must_use]
    pub fn node(&self, id: LineId) -> &LineNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: LineId) -> &mut LineNode {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// An arena always holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attaches `node` under `parent` and returns its handle.
    ///
    /// The parent back-reference is set on the new node; the child is
    /// appended to the parent's arrival-ordered child list.
    pub(crate) fn attach(&mut self, parent: LineId, mut node: LineNode) -> LineId {
        let id = LineId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Iterates over every node handle in allocation (source) order.
    pub fn ids(&self) -> impl Iterator<Item = LineId> {
        (0..self.nodes.len()).map(|i| LineId(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    /// Direct children of `id` carrying `tag`, in arrival order.
    pub fn children_with_tag<'a>(
        &'a self,
        id: LineId,
        tag: &'a str,
    ) -> impl Iterator<Item = LineId> + 'a {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(move |&child| self.node(child).tag == tag)
    }

    /// First direct child of `id` carrying `tag`.
    #[must_use]
    pub fn first_child_with_tag(&self, id: LineId, tag: &str) -> Option<LineId> {
        self.children_with_tag(id, tag).next()
    }

    /// Evaluates a dot-separated selector and returns the value of the
    /// first line it reaches, or `""` when nothing matches.
    ///
    /// An empty selector returns `from`'s own value. Each component
    /// descends along the first matching direct child.
    #[must_use]
    pub fn query_value(&self, from: LineId, path: &str) -> &str {
        match self.resolve_first(from, path) {
            Some(id) => &self.node(id).value,
            None => "",
        }
    }

    /// Evaluates a selector and returns the values of all lines matched by
    /// its final component, in insertion order.
    #[must_use]
    pub fn query_values(&self, from: LineId, path: &str) -> Vec<&str> {
        self.query_lines(from, path)
            .into_iter()
            .map(|id| self.node(id).value.as_str())
            .collect()
    }

    /// Evaluates a selector and returns the matched line handles.
    ///
    /// The selector descends along the first match at every component
    /// except the last, which fans out over all matching siblings.
    #[must_use]
    pub fn query_lines(&self, from: LineId, path: &str) -> Vec<LineId> {
        if path.is_empty() {
            return vec![from];
        }
        let mut cursor = from;
        let mut components = path.split('.').peekable();
        while let Some(component) = components.next() {
            if components.peek().is_none() {
                return self.children_with_tag(cursor, component).collect();
            }
            match self.first_child_with_tag(cursor, component) {
                Some(next) => cursor = next,
                None => return Vec::new(),
            }
        }
        Vec::new()
    }

    fn resolve_first(&self, from: LineId, path: &str) -> Option<LineId> {
        if path.is_empty() {
            return Some(from);
        }
        let mut cursor = from;
        for component in path.split('.') {
            cursor = self.first_child_with_tag(cursor, component)?;
        }
        Some(cursor)
    }
}
