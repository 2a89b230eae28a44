//! Column tree construction.
//!
//! Turns a (possibly nested) list of [`ColumnDef`]s into the structures a
//! table header renderer needs:
//!
//! - `header`: one row per tree depth, each holding the visible nodes at that depth
//! - `body`: the leaf columns, left to right
//! - `frozen_header` / `frozen_body`: the same for columns pinned with `frozen`
//!
//! Nodes live in an arena owned by [`ColumnTree`]; parents own their children
//! and children refer back to their parent by [`NodeId`] only.
//!
//! The work list expands a group by pushing its children to the *front*, so a
//! whole subtree is placed before the builder moves on to the next sibling.
//! The order of nodes inside each header row depends on this.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::column::{ColumnDef, ColumnId};

/// Iteration cap for [`build_columns`]; guards against cyclic definition graphs.
pub const DEFAULT_MAX_BUILD_STEPS: usize = 10_000;

static NEXT_TREE: AtomicU64 = AtomicU64::new(1);

/// Index of a node inside the [`ColumnTree`] that produced it.
///
/// Ids carry their tree's generation, so an id kept across a rebuild
/// resolves to `None` instead of to whatever node now sits at its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    tree: u64,
    index: usize,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index
    }
}

/// A column definition placed in the header tree, with computed layout.
pub struct ColumnNode<R> {
    pub def: Arc<ColumnDef<R>>,
    pub id: ColumnId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Header row this node is rendered in.
    pub depth: usize,
    /// Number of visible leaves below this node; 0 for a leaf.
    pub col_span: usize,
    /// Header rows this cell covers; leaves stretch down to the deepest row.
    pub row_span: usize,
    /// Rightmost node at its depth within a top-level column (section mode).
    pub is_last: bool,
    pub frozen: bool,
}

impl<R> ColumnNode<R> {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl<R> std::fmt::Debug for ColumnNode<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnNode")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("depth", &self.depth)
            .field("col_span", &self.col_span)
            .field("row_span", &self.row_span)
            .field("is_last", &self.is_last)
            .field("frozen", &self.frozen)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub section_mode: bool,
    pub max_steps: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            section_mode: false,
            max_steps: DEFAULT_MAX_BUILD_STEPS,
        }
    }
}

/// Header matrix and leaf list built from column definitions.
pub struct ColumnTree<R> {
    generation: u64,
    nodes: Vec<ColumnNode<R>>,
    header: Vec<Vec<NodeId>>,
    body: Vec<NodeId>,
    frozen_header: Vec<Vec<NodeId>>,
    frozen_body: Vec<NodeId>,
    truncated: bool,
}

impl<R> ColumnTree<R> {
    pub fn empty() -> Self {
        ColumnTree {
            generation: NEXT_TREE.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            header: Vec::new(),
            body: Vec::new(),
            frozen_header: Vec::new(),
            frozen_body: Vec::new(),
            truncated: false,
        }
    }

    pub fn header(&self) -> &[Vec<NodeId>] {
        &self.header
    }

    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    pub fn frozen_header(&self) -> &[Vec<NodeId>] {
        &self.frozen_header
    }

    pub fn frozen_body(&self) -> &[NodeId] {
        &self.frozen_body
    }

    /// Resolve a node id. Ids from an earlier build of the tree give `None`.
    pub fn node(&self, id: NodeId) -> Option<&ColumnNode<R>> {
        if id.tree != self.generation {
            return None;
        }
        self.nodes.get(id.index)
    }

    pub fn nodes(&self) -> &[ColumnNode<R>] {
        &self.nodes
    }

    pub fn parent(&self, id: NodeId) -> Option<&ColumnNode<R>> {
        self.node(id)?.parent.and_then(|p| self.node(p))
    }

    /// Look up the node built for a column id, if it is visible.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.id.as_str() == id)
            .map(|index| self.node_id(index))
    }

    /// Number of header rows.
    pub fn depth(&self) -> usize {
        self.header.len()
    }

    /// Resolve a header row (or frozen header row) into nodes, skipping
    /// ids from another build.
    pub fn row_nodes(&self, row: &[NodeId]) -> Vec<&ColumnNode<R>> {
        row.iter().filter_map(|&id| self.node(id)).collect()
    }

    /// True when the builder hit its iteration cap and the tree is partial.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn node_id(&self, index: usize) -> NodeId {
        NodeId {
            tree: self.generation,
            index,
        }
    }

    fn push_node(
        &mut self,
        def: Arc<ColumnDef<R>>,
        parent: Option<NodeId>,
        depth: usize,
        frozen: bool,
    ) -> NodeId {
        let id = self.node_id(self.nodes.len());
        self.nodes.push(ColumnNode {
            id: def.id(),
            def,
            parent,
            children: Vec::new(),
            depth,
            col_span: 0,
            row_span: 1,
            is_last: false,
            frozen,
        });
        id
    }

    fn ensure_rows(&mut self, row: usize) {
        while self.header.len() <= row {
            self.header.push(Vec::new());
            self.frozen_header.push(Vec::new());
        }
    }
}

impl<R> Default for ColumnTree<R> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pending work list entry.
struct Pending {
    node: NodeId,
    row: usize,
    collapsed: bool,
    expanded: bool,
}

/// Collect the ids of every definition whose `collapsed` flag is set.
pub fn collapsed_ids<R>(defs: &[Arc<ColumnDef<R>>]) -> HashSet<ColumnId> {
    let mut ids = HashSet::new();
    let mut stack: Vec<&Arc<ColumnDef<R>>> = defs.iter().collect();
    while let Some(def) = stack.pop() {
        if def.collapsed {
            ids.insert(def.id());
        }
        stack.extend(def.columns.iter());
    }
    ids
}

/// Build the header/body structures for `defs`.
///
/// `collapsed` holds the ids of collapsed columns. A leaf with
/// `hide_in_collapse` is left out when it or any ancestor is collapsed.
/// A group whose children are all left out is placed as a leaf.
pub fn build_columns<R>(
    defs: &[Arc<ColumnDef<R>>],
    collapsed: &HashSet<ColumnId>,
    options: &BuildOptions,
) -> ColumnTree<R> {
    let mut tree = ColumnTree::empty();
    let mut work: VecDeque<Pending> = VecDeque::with_capacity(defs.len());
    for def in defs {
        let is_collapsed = collapsed.contains(&def.id());
        let node = tree.push_node(def.clone(), None, 0, def.frozen);
        work.push_back(Pending {
            node,
            row: 0,
            collapsed: is_collapsed,
            expanded: false,
        });
    }

    let mut steps = 0usize;
    while let Some(front) = work.front_mut() {
        steps += 1;
        if steps > options.max_steps {
            tree.truncated = true;
            tracing::warn!(
                target: "agrid_engine::columns",
                "column tree build stopped after {} steps; header is incomplete",
                options.max_steps
            );
            break;
        }

        let row = front.row;
        tree.ensure_rows(row);

        let def = tree.nodes[front.node.index].def.clone();
        if def.is_group() && !front.expanded {
            front.expanded = true;
            let parent = front.node;
            let inherited = front.collapsed;
            let frozen = tree.nodes[parent.index].frozen;

            let mut children = Vec::with_capacity(def.columns.len());
            for child_def in &def.columns {
                let child_collapsed = inherited || collapsed.contains(&child_def.id());
                if child_collapsed && !child_def.is_visible_in_collapse() {
                    continue;
                }
                let child = tree.push_node(child_def.clone(), Some(parent), row + 1, frozen);
                tree.nodes[parent.index].children.push(child);
                children.push(Pending {
                    node: child,
                    row: row + 1,
                    collapsed: child_collapsed,
                    expanded: false,
                });
            }
            for pending in children.into_iter().rev() {
                work.push_front(pending);
            }
            continue;
        }

        let Some(current) = work.pop_front() else {
            break;
        };
        place_node(&mut tree, current.node, current.row);
    }

    assign_row_spans(&mut tree);
    if options.section_mode {
        mark_last_spine(&mut tree);
    }

    tracing::debug!(
        target: "agrid_engine::columns",
        rows = tree.header.len(),
        leaves = tree.body.len(),
        frozen_leaves = tree.frozen_body.len(),
        "built column tree"
    );
    tree
}

/// Append a finished node to its header row; leaves also go to the body and
/// widen every ancestor by one column.
fn place_node<R>(tree: &mut ColumnTree<R>, id: NodeId, row: usize) {
    let frozen = tree.nodes[id.index].frozen;
    if frozen {
        tree.frozen_header[row].push(id);
    } else {
        tree.header[row].push(id);
    }

    if !tree.nodes[id.index].is_leaf() {
        return;
    }
    if frozen {
        tree.frozen_body.push(id);
    } else {
        tree.body.push(id);
    }
    let mut parent = tree.nodes[id.index].parent;
    while let Some(p) = parent {
        tree.nodes[p.index].col_span += 1;
        parent = tree.nodes[p.index].parent;
    }
}

/// Stretch leaves above the deepest row down to it.
fn assign_row_spans<R>(tree: &mut ColumnTree<R>) {
    let rows = tree.header.len();
    for row in (0..rows.saturating_sub(1)).rev() {
        let span = rows - row;
        let ids: Vec<NodeId> = tree.header[row]
            .iter()
            .chain(tree.frozen_header[row].iter())
            .copied()
            .collect();
        for id in ids {
            let node = &mut tree.nodes[id.index];
            if node.is_leaf() {
                node.row_span = span;
            }
        }
    }
}

/// Mark each top-level column and its chain of rightmost descendants.
fn mark_last_spine<R>(tree: &mut ColumnTree<R>) {
    let Some(first_row) = tree.header.first() else {
        return;
    };
    let roots: Vec<NodeId> = first_row
        .iter()
        .chain(tree.frozen_header[0].iter())
        .copied()
        .collect();
    for root in roots {
        let mut current = root;
        loop {
            tree.nodes[current.index].is_last = true;
            match tree.nodes[current.index].children.last() {
                Some(&last) => current = last,
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Value;
    use std::collections::HashMap;

    type Row = HashMap<String, Value>;
    type Def = ColumnDef<Row>;

    fn build(defs: Vec<Def>, options: BuildOptions) -> ColumnTree<Row> {
        let defs: Vec<Arc<Def>> = defs.into_iter().map(Arc::new).collect();
        let collapsed = collapsed_ids(&defs);
        build_columns(&defs, &collapsed, &options)
    }

    fn get<'a>(tree: &'a ColumnTree<Row>, id: &str) -> &'a ColumnNode<Row> {
        tree.find(id).and_then(|n| tree.node(n)).unwrap()
    }

    fn get_id(tree: &ColumnTree<Row>, id: NodeId) -> String {
        tree.node(id).unwrap().id.to_string()
    }

    fn ids(tree: &ColumnTree<Row>, row: &[NodeId]) -> Vec<String> {
        row.iter().map(|&id| get_id(tree, id)).collect()
    }

    #[test]
    fn test_flat_columns_form_single_row() {
        let tree = build(
            vec![Def::new("a"), Def::new("b"), Def::new("c")],
            BuildOptions::default(),
        );
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.header()[0], tree.body());
        for node in tree.nodes() {
            assert_eq!(node.col_span, 0);
            assert_eq!(node.row_span, 1);
            assert!(!node.is_last);
        }
        assert!(!tree.is_truncated());
    }

    #[test]
    fn test_empty_definitions() {
        let tree = build(vec![], BuildOptions::default());
        assert_eq!(tree.depth(), 0);
        assert!(tree.body().is_empty());
    }

    #[test]
    fn test_nested_groups_spans() {
        // | id |        info           |
        // |    | name |    address     |
        // |    |      | city | street  |
        let tree = build(
            vec![
                Def::new("id"),
                Def::group(
                    "info",
                    [
                        Def::new("name"),
                        Def::group("address", [Def::new("city"), Def::new("street")]),
                    ],
                ),
            ],
            BuildOptions::default(),
        );

        assert_eq!(tree.depth(), 3);
        assert_eq!(ids(&tree, &tree.header()[0]), vec!["id", "info"]);
        assert_eq!(ids(&tree, &tree.header()[1]), vec!["name", "address"]);
        assert_eq!(ids(&tree, &tree.header()[2]), vec!["city", "street"]);
        assert_eq!(ids(&tree, tree.body()), vec!["id", "name", "city", "street"]);

        let span = |id: &str| get(&tree, id).col_span;
        let rows = |id: &str| get(&tree, id).row_span;
        assert_eq!(span("info"), 3);
        assert_eq!(span("address"), 2);
        assert_eq!(span("id"), 0);
        assert_eq!(rows("id"), 3);
        assert_eq!(rows("name"), 2);
        assert_eq!(rows("city"), 1);
        assert_eq!(rows("info"), 1);
    }

    #[test]
    fn test_subtree_expands_before_next_sibling() {
        // Sibling groups of unequal depth: the left group's deep subtree is
        // fully placed before the right group is expanded.
        let tree = build(
            vec![
                Def::group("g1", [Def::group("g1a", [Def::new("x")])]),
                Def::group("g2", [Def::new("y"), Def::new("z")]),
            ],
            BuildOptions::default(),
        );
        assert_eq!(ids(&tree, &tree.header()[0]), vec!["g1", "g2"]);
        assert_eq!(ids(&tree, &tree.header()[1]), vec!["g1a", "y", "z"]);
        assert_eq!(ids(&tree, &tree.header()[2]), vec!["x"]);
        assert_eq!(ids(&tree, tree.body()), vec!["x", "y", "z"]);
        assert_eq!(get(&tree, "y").row_span, 2);
    }

    #[test]
    fn test_parent_links() {
        let tree = build(
            vec![Def::group("g", [Def::new("a"), Def::new("b")])],
            BuildOptions::default(),
        );
        let a = tree.find("a").unwrap();
        assert_eq!(tree.parent(a).unwrap().id.as_str(), "g");
        assert!(tree.parent(tree.find("g").unwrap()).is_none());
    }

    #[test]
    fn test_collapsed_group_hides_marked_children() {
        let defs = || {
            vec![Def::group(
                "g",
                [
                    Def::new("summary"),
                    Def::new("detail").hide_in_collapse(true),
                    Def::group("inner", [Def::new("deep").hide_in_collapse(true), Def::new("kept")]),
                ],
            )]
        };

        let open = build(defs(), BuildOptions::default());
        assert_eq!(ids(&open, open.body()), vec!["summary", "detail", "deep", "kept"]);

        let defs: Vec<Arc<Def>> = defs().into_iter().map(Arc::new).collect();
        let collapsed: HashSet<ColumnId> = [ColumnId::from("g")].into_iter().collect();
        let closed = build_columns(&defs, &collapsed, &BuildOptions::default());
        assert_eq!(ids(&closed, closed.body()), vec!["summary", "kept"]);
        assert!(closed.find("detail").is_none());
        assert!(closed.find("deep").is_none());
        assert_eq!(get(&closed, "g").col_span, 2);
    }

    #[test]
    fn test_leaf_own_collapse_flag_hides_it() {
        let tree = build(
            vec![Def::group(
                "g",
                [Def::new("a"), Def::new("b").collapsed(true).hide_in_collapse(true)],
            )],
            BuildOptions::default(),
        );
        assert_eq!(ids(&tree, tree.body()), vec!["a"]);
    }

    #[test]
    fn test_fully_hidden_group_degenerates_to_leaf() {
        let tree = build(
            vec![
                Def::group("g", [Def::new("a").hide_in_collapse(true)]).collapsed(true),
                Def::new("b"),
            ],
            BuildOptions::default(),
        );
        let g = get(&tree, "g");
        assert!(g.is_leaf());
        assert_eq!(g.col_span, 0);
        assert_eq!(ids(&tree, tree.body()), vec!["g", "b"]);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_section_mode_marks_rightmost_spine() {
        let tree = build(
            vec![
                Def::group("g1", [Def::new("a"), Def::group("g1b", [Def::new("b"), Def::new("c")])]),
                Def::new("d"),
            ],
            BuildOptions {
                section_mode: true,
                ..BuildOptions::default()
            },
        );
        let last: Vec<&str> = tree
            .nodes()
            .iter()
            .filter(|n| n.is_last)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(last, vec!["g1", "d", "g1b", "c"]);
    }

    #[test]
    fn test_frozen_columns_split_into_own_region() {
        let tree = build(
            vec![
                Def::group("pinned", [Def::new("a"), Def::new("b")]).frozen(true),
                Def::new("c"),
            ],
            BuildOptions::default(),
        );
        assert_eq!(tree.header().len(), tree.frozen_header().len());
        assert_eq!(ids(&tree, &tree.frozen_header()[0]), vec!["pinned"]);
        assert_eq!(ids(&tree, &tree.frozen_header()[1]), vec!["a", "b"]);
        assert_eq!(ids(&tree, tree.frozen_body()), vec!["a", "b"]);
        assert_eq!(ids(&tree, &tree.header()[0]), vec!["c"]);
        assert!(tree.header()[1].is_empty());
        assert_eq!(ids(&tree, tree.body()), vec!["c"]);
        assert_eq!(get(&tree, "c").row_span, 2);
    }

    #[test]
    fn test_ids_from_previous_build_do_not_resolve() {
        let defs: Vec<Arc<Def>> = vec![Arc::new(Def::group(
            "g",
            [Def::new("a"), Def::new("b").hide_in_collapse(true)],
        ))];
        let open = build_columns(&defs, &HashSet::new(), &BuildOptions::default());
        let b = open.find("b").unwrap();
        assert_eq!(open.node(b).unwrap().id.as_str(), "b");

        let collapsed: HashSet<ColumnId> = [ColumnId::from("g")].into_iter().collect();
        let closed = build_columns(&defs, &collapsed, &BuildOptions::default());
        assert!(closed.node(b).is_none());
        assert!(closed.parent(b).is_none());
        assert!(closed.row_nodes(open.body()).is_empty());

        let reopened = build_columns(&defs, &HashSet::new(), &BuildOptions::default());
        assert_eq!(reopened.nodes().len(), open.nodes().len());
        assert!(reopened.node(b).is_none());
    }

    #[test]
    fn test_iteration_cap_truncates() {
        let wide: Vec<Def> = (0..50).map(|i| Def::new(format!("c{i}"))).collect();
        let tree = build(
            wide,
            BuildOptions {
                max_steps: 10,
                ..BuildOptions::default()
            },
        );
        assert!(tree.is_truncated());
        assert_eq!(tree.body().len(), 10);
    }
}
