use crate::taxa::TaxonLinker;
use crate::Tree;
use biophylo_core::{downcast, identity, Core, Entity, Error, Kind, NumericField};
use color_eyre::eyre::{Report, Result};
use num_traits::AsPrimitive;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

/// A node of a rooted [`Tree`](crate::Tree).
///
/// A node owns its children and refers weakly to its parent, so a subtree
/// lives as long as its root is reachable.
///
/// ## Examples
///
/// ```rust
/// use biophylo::{Entity, Node};
///
/// let root = Node::new();
/// let a = Node::with_name("A")?;
/// a.set_branch_length(0.5);
/// root.add_child(&a)?;
///
/// assert!(root.is_root());
/// assert!(a.is_terminal());
/// assert_eq!(a.get_parent().map(|p| p.id()), Some(root.id()));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub struct Node {
    core: Core,
    branch_length: Cell<Option<f64>>,
    parent: RefCell<Weak<Node>>,
    children: RefCell<Vec<Rc<Node>>>,
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let children: Vec<_> = self.children.borrow().iter().map(|c| c.id()).collect();
        f.debug_struct("Node")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("branch_length", &self.branch_length.get())
            .field("parent", &self.get_parent().map(|p| p.id()))
            .field("children", &children)
            .finish()
    }
}

impl Drop for Node {
    // Subtrees are released one level at a time, so deep trees never exhaust the stack.
    fn drop(&mut self) {
        let mut stack = std::mem::take(self.children.get_mut());
        while let Some(child) = stack.pop() {
            if let Ok(mut child) = Rc::try_unwrap(child) {
                stack.append(child.children.get_mut());
            }
        }
    }
}

impl Node {
    /// Returns a new unnamed [`Node`].
    pub fn new() -> Rc<Node> {
        identity::install(Node {
            core: Core::new(),
            branch_length: Cell::new(None),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
        })
    }

    /// Returns a new named [`Node`].
    pub fn with_name(name: &str) -> Result<Rc<Node>, Report> {
        let node = Node::new();
        node.set_name(name)?;
        Ok(node)
    }

    pub fn branch_length(&self) -> Option<f64> {
        self.branch_length.get()
    }

    /// Sets the length of the branch subtending this node.
    pub fn set_branch_length<T>(&self, length: T)
    where
        T: AsPrimitive<f64>,
    {
        self.branch_length.set(Some(length.as_()));
    }

    pub fn clear_branch_length(&self) {
        self.branch_length.set(None);
    }

    // ------------------------------------------------------------------------
    // Topology

    /// Appends `child` to this node's children.
    ///
    /// - A child that already has a parent is moved.
    /// - Fails with [`Error::BadArgument`] if `child` is this node or one of its ancestors.
    pub fn add_child(self: &Rc<Self>, child: &Rc<Node>) -> Result<(), Report> {
        if child.id() == self.id() || self.get_ancestors().iter().any(|a| a.id() == child.id()) {
            Err(Error::BadArgument(format!("node {} cannot be a descendant of itself", child.id())))?
        }
        if let Some(parent) = child.get_parent() {
            parent.children.borrow_mut().retain(|c| c.id() != child.id());
        }
        *child.parent.borrow_mut() = Rc::downgrade(self);
        self.children.borrow_mut().push(child.clone());
        Ok(())
    }

    /// Detaches `child` from this node, failing with [`Error::NotFound`] if it is not a child.
    pub fn remove_child(&self, child: &Node) -> Result<(), Report> {
        let mut children = self.children.borrow_mut();
        match children.iter().position(|c| c.id() == child.id()) {
            Some(i) => {
                children.remove(i);
                *child.parent.borrow_mut() = Weak::new();
                Ok(())
            }
            None => Err(Error::NotFound(format!("node {} is not a child of node {}", child.id(), self.id())))?,
        }
    }

    pub fn get_parent(&self) -> Option<Rc<Node>> {
        self.parent.borrow().upgrade()
    }

    pub fn get_children(&self) -> Vec<Rc<Node>> {
        self.children.borrow().clone()
    }

    /// Returns the ancestors of this node, nearest first.
    pub fn get_ancestors(&self) -> Vec<Rc<Node>> {
        let mut ancestors = Vec::new();
        let mut parent = self.get_parent();
        while let Some(node) = parent {
            parent = node.get_parent();
            ancestors.push(node);
        }
        ancestors
    }

    /// Returns the descendants of this node in pre-order.
    pub fn get_descendants(&self) -> Vec<Rc<Node>> {
        let mut descendants = Vec::new();
        let mut stack: Vec<Rc<Node>> = self.get_children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.get_children().into_iter().rev());
            descendants.push(node);
        }
        descendants
    }

    pub fn is_root(&self) -> bool {
        self.get_parent().is_none()
    }

    pub fn is_terminal(&self) -> bool {
        self.children.borrow().is_empty()
    }

    /// Returns the tree holding this node.
    pub fn get_tree(&self) -> Option<Rc<Tree>> {
        self.container().as_ref().and_then(downcast::<Tree>)
    }
}

impl Entity for Node {
    #[rustfmt::skip]
    fn core(&self) -> &Core { &self.core }
    #[rustfmt::skip]
    fn kind(&self) -> Kind { Kind::Node }
    #[rustfmt::skip]
    fn container_kind(&self) -> Kind { Kind::Tree }
    #[rustfmt::skip]
    fn as_any(&self) -> &dyn Any { self }
    #[rustfmt::skip]
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> { self }
    #[rustfmt::skip]
    fn accepts_taxon(&self) -> bool { true }

    fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Score => self.score(),
            NumericField::BranchLength => self.branch_length(),
            _ => None,
        }
    }
}

impl TaxonLinker for Node {}
