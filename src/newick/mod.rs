//! Read and write trees in the [Newick](https://en.wikipedia.org/wiki/Newick_format) format.
//!
//! Only node labels and branch lengths are supported, as in `((A:1,B:2)AB:0.5,C:3);`.
//! Labels are validated like any other entity name, so quoting is not supported.

use crate::{Forest, FromNewick, Node, ToNewick, Tree};
use biophylo_core::{Entity, Error};
use color_eyre::eyre::{Report, Result, WrapErr};
use log::debug;
use std::rc::Rc;


// ----------------------------------------------------------------------------
// Parsing
// ----------------------------------------------------------------------------

fn bad(message: String) -> Error {
    Error::BadArgument(message)
}

/// Applies a `name:length` label to `node`. Both parts are optional.
fn parse_label(node: &Node, label: &str) -> Result<(), Report> {
    let (name, length) = match label.split_once(':') {
        Some((name, length)) => (name.trim(), Some(length.trim())),
        None => (label.trim(), None),
    };
    if !name.is_empty() {
        node.set_name(name)?;
    }
    if let Some(length) = length {
        let length: f64 = length
            .parse()
            .map_err(|_| bad(format!("Branch length {length:?} is not a number in label: {label:?}")))?;
        node.set_branch_length(length);
    }
    Ok(())
}

/// Returns the root of the tree described by `newick` (without the trailing `;`).
///
/// Open parentheses are kept on a stack rather than recursed into, so the
/// nesting depth is not limited by the call stack.
fn parse_node(newick: &str) -> Result<Rc<Node>, Report> {
    // nodes whose '(' is still open
    let mut open: Vec<Rc<Node>> = Vec::new();
    // node completed by the last ')', its label may follow
    let mut closed: Option<Rc<Node>> = None;
    let mut label_start = 0;

    for (i, c) in newick.char_indices() {
        match c {
            '(' => {
                if closed.is_some() || !newick[label_start..i].trim().is_empty() {
                    Err(bad(format!("Unexpected '(' at {i} in newick: {newick}")))?
                }
                open.push(Node::new());
            }
            ',' | ')' => {
                let parent = open
                    .last()
                    .ok_or_else(|| bad(format!("Unexpected {c:?} at {i} in newick: {newick}")))?;
                // ------------------------------------------------------------
                // Case 1: a subtree completed by a previous ')', otherwise a leaf
                let node = closed.take().unwrap_or_else(Node::new);
                parse_label(&node, &newick[label_start..i])?;
                parent.add_child(&node)?;
                // ------------------------------------------------------------
                // Case 2: the parent's children are complete
                if c == ')' {
                    closed = open.pop();
                }
            }
            _ => continue,
        }
        label_start = i + 1;
    }

    if !open.is_empty() {
        Err(bad(format!("Failed to find matching outer parentheses from newick: {newick}")))?
    }
    let root = closed.unwrap_or_else(Node::new);
    parse_label(&root, &newick[label_start..])?;
    Ok(root)
}

impl FromNewick for Tree {
    /// Returns a [`Tree`] holding every node of a single Newick tree, in pre-order.
    ///
    /// ```rust
    /// use biophylo::{Entity, FromNewick, Tree};
    /// let tree = Tree::from_newick("(A:0.1,B:0.2)R;")?;
    /// let names: Vec<_> = tree.get_nodes().iter().map(|n| n.name().unwrap()).collect();
    /// assert_eq!(names, ["R", "A", "B"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn from_newick(newick: &str) -> Result<Rc<Tree>, Report> {
        let trimmed = newick.trim();
        let body = trimmed.strip_suffix(';').unwrap_or(trimmed);
        if body.trim().is_empty() {
            Err(bad("Newick tree is empty".to_string()))?
        }
        if body.contains(';') {
            Err(bad(format!("Expected a single tree but found several in newick: {newick}")))?
        }

        let root = parse_node(body).wrap_err_with(|| format!("Failed to parse newick: {newick}"))?;
        let tree = Tree::new();
        tree.insert(&root)?;
        for node in root.get_descendants() {
            tree.insert(&node)?;
        }
        debug!("Parsed tree {} with {} nodes", tree.id(), tree.list().len());
        Ok(tree)
    }
}

impl FromNewick for Forest {
    /// Returns a [`Forest`] with one [`Tree`] per `;`-terminated Newick tree.
    fn from_newick(newick: &str) -> Result<Rc<Forest>, Report> {
        let forest = Forest::new();
        for tree in newick.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            forest.insert(&Tree::from_newick(tree)?)?;
        }
        debug!("Parsed forest {} with {} trees", forest.id(), forest.list().len());
        Ok(forest)
    }
}

// ----------------------------------------------------------------------------
// Writing
// ----------------------------------------------------------------------------

enum Step {
    Node(Rc<Node>),
    Comma,
    /// Closes a subtree, followed by the label of its root.
    Close(String),
}

fn label(node: &Node) -> String {
    let mut label = node.name().unwrap_or_default();
    if let Some(length) = node.branch_length() {
        label.push_str(&format!(":{length}"));
    }
    label
}

/// Writes `node` or, if it has children, opens its subtree and schedules them.
fn visit(node: &Node, newick: &mut String, steps: &mut Vec<Step>) {
    let children = node.get_children();
    if children.is_empty() {
        newick.push_str(&label(node));
        return;
    }
    newick.push('(');
    steps.push(Step::Close(label(node)));
    for (i, child) in children.into_iter().enumerate().rev() {
        steps.push(Step::Node(child));
        if i > 0 {
            steps.push(Step::Comma);
        }
    }
}

fn write_node(node: &Node) -> String {
    let (mut newick, mut steps) = (String::new(), Vec::new());
    visit(node, &mut newick, &mut steps);
    while let Some(step) = steps.pop() {
        match step {
            Step::Node(child) => visit(&child, &mut newick, &mut steps),
            Step::Comma => newick.push(','),
            Step::Close(label) => {
                newick.push(')');
                newick.push_str(&label);
            }
        }
    }
    newick
}

impl ToNewick for Node {
    /// Returns the subtree rooted at this node, without the trailing `;`.
    fn to_newick(&self) -> Result<String, Report> {
        Ok(write_node(self))
    }
}

impl ToNewick for Tree {
    fn to_newick(&self) -> Result<String, Report> {
        let root = self
            .get_root()
            .ok_or_else(|| Error::NotFound(format!("tree {} has no root node", self.id())))?;
        Ok(format!("{};", write_node(&root)))
    }
}

impl ToNewick for Forest {
    /// Returns one tree per line.
    fn to_newick(&self) -> Result<String, Report> {
        let trees = self.get_trees().iter().map(|t| t.to_newick()).collect::<Result<Vec<_>, Report>>()?;
        Ok(trees.join("\n"))
    }
}
