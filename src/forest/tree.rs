use crate::taxa::TaxaLinker;
use crate::{utils, Forest, Node};
use biophylo_core::{downcast, identity, Core, Entity, Kind, Listable};
use color_eyre::eyre::{Report, Result};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{Graph, NodeIndex};
use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

/// A rooted tree: an ordered container of [`Node`].
///
/// The parent/child topology lives on the nodes themselves. The container
/// records which nodes make up the tree, in insertion order (pre-order when
/// read from Newick).
///
/// ```rust
/// use biophylo::{Entity, FromNewick, Tree};
/// let tree = Tree::from_newick("((A:1,B:2)AB:0.5,C:3);")?;
/// assert_eq!(tree.get_nodes().len(), 5);
/// assert_eq!(tree.get_terminals().len(), 3);
/// assert_eq!(tree.calc_tree_length(), 6.5);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug)]
pub struct Tree {
    core: Core,
    list: Listable,
}

impl Tree {
    /// Returns a new empty [`Tree`].
    pub fn new() -> Rc<Tree> {
        let core = Core::new();
        let list = Listable::new(core.id(), Kind::Tree);
        identity::install(Tree { core, list })
    }

    /// The underlying container.
    pub fn list(&self) -> &Listable {
        &self.list
    }

    pub fn insert(&self, node: &Rc<Node>) -> Result<(), Report> {
        self.list.insert(node.clone())
    }

    pub fn get_nodes(&self) -> Vec<Rc<Node>> {
        utils::members(&self.list)
    }

    /// Returns the first node without a parent.
    pub fn get_root(&self) -> Option<Rc<Node>> {
        self.get_nodes().into_iter().find(|n| n.is_root())
    }

    pub fn get_terminals(&self) -> Vec<Rc<Node>> {
        self.get_nodes().into_iter().filter(|n| n.is_terminal()).collect()
    }

    pub fn get_internals(&self) -> Vec<Rc<Node>> {
        self.get_nodes().into_iter().filter(|n| !n.is_terminal()).collect()
    }

    /// Returns the sum of all branch lengths. Missing lengths count as zero.
    pub fn calc_tree_length(&self) -> f64 {
        self.get_nodes().iter().filter_map(|n| n.branch_length()).sum()
    }

    /// Returns the forest holding this tree.
    pub fn get_forest(&self) -> Option<Rc<Forest>> {
        self.container().as_ref().and_then(downcast::<Forest>)
    }

    /// Returns the tree as a directed graph of node labels, with branch lengths on the edges.
    ///
    /// Only parent-child pairs where both nodes belong to this tree become edges.
    pub fn to_graph(&self) -> Graph<String, f64> {
        let mut graph = Graph::new();
        let nodes = self.get_nodes();
        let indices: HashMap<_, NodeIndex> =
            nodes.iter().map(|n| (n.id(), graph.add_node(n.name().unwrap_or_default()))).collect();

        for node in &nodes {
            let Some(parent) = node.get_parent() else { continue };
            if let (Some(source), Some(target)) = (indices.get(&parent.id()), indices.get(&node.id())) {
                graph.add_edge(*source, *target, node.branch_length().unwrap_or_default());
            }
        }
        graph
    }

    /// Returns the tree in the [DOT](https://graphviz.org/doc/info/lang.html) format, laid out left to right.
    ///
    /// ```rust
    /// use biophylo::{FromNewick, Tree};
    /// let dot = Tree::from_newick("(A:1,B:2)R;")?.to_dot();
    /// assert!(dot.contains("rankdir=\"LR\""));
    /// assert!(dot.contains("\"A\""));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn to_dot(&self) -> String {
        let graph = self.to_graph();
        let output = format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]));
        // set graph id and horizontal (Left to Right) layout
        let output = output.replace("digraph", "digraph G");
        output.replace("digraph G {", "digraph G {\n    rankdir=\"LR\";")
    }
}

impl Entity for Tree {
    #[rustfmt::skip]
    fn core(&self) -> &Core { &self.core }
    #[rustfmt::skip]
    fn kind(&self) -> Kind { Kind::Tree }
    #[rustfmt::skip]
    fn container_kind(&self) -> Kind { Kind::Forest }
    #[rustfmt::skip]
    fn as_any(&self) -> &dyn Any { self }
    #[rustfmt::skip]
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> { self }
    #[rustfmt::skip]
    fn listable(&self) -> Option<&Listable> { Some(&self.list) }
}

impl TaxaLinker for Tree {}
