//! Lazy depth-first page traversal.
//!
//! [`Pages`] flattens a finished tree into a pull-based sequence of page
//! nodes. Directory containers are descended into in stored child order but
//! never yielded themselves. The iterator holds a stack of child slices, so
//! no work happens beyond the next yielded page.

use std::iter::FusedIterator;
use std::slice;

use crate::node::{Node, PageNode};

/// Depth-first iterator over every [`PageNode`] in a tree.
///
/// Obtained from [`Tree::pages`](crate::Tree::pages). Finite and restartable:
/// a fresh call produces a new iterator starting from the first page.
pub struct Pages<'a> {
    stack: Vec<slice::Iter<'a, Node>>,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(nodes: &'a [Node]) -> Self {
        Self {
            stack: vec![nodes.iter()],
        }
    }
}

impl<'a> Iterator for Pages<'a> {
    type Item = &'a PageNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Node::Page(page)) => return Some(page),
                Some(Node::Directory(dir)) => self.stack.push(dir.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

impl FusedIterator for Pages<'_> {}
