//! Prefix trie mapping every prefix of an indexed term to its documents.
//!
//! Nodes live in an arena (`Vec<TrieNode>`) and refer to children by index,
//! root at 0. Children are a `BTreeMap` so traversal order, and therefore
//! serialization, is deterministic.
//!
//! Each node carries the posting list of every document owning a term that
//! passes through it. A prefix lookup is then one walk of `len(prefix)` edges
//! with no subtree scan.

use std::collections::BTreeMap;

use super::postings::PostingList;
use crate::types::DocId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNode {
    pub children: BTreeMap<char, u32>,
    /// Documents whose terms pass through this node.
    pub postings: PostingList,
    /// A complete term ends here.
    pub terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTrie {
    nodes: Vec<TrieNode>,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Rebuild from an arena, checking that every child index is in range
    /// and points forward.
    pub fn from_nodes(nodes: Vec<TrieNode>) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }
        let len = nodes.len() as u64;
        let valid = nodes.iter().enumerate().all(|(i, node)| {
            node.children
                .values()
                .all(|&child| u64::from(child) < len && child as usize > i)
        });
        valid.then_some(Self { nodes })
    }

    /// Register `doc` under every prefix of `term` (including the empty one at the root).
    pub fn insert(&mut self, term: &str, doc: DocId) {
        let mut current = 0usize;
        self.nodes[current].postings.insert(doc);
        for c in term.chars() {
            current = match self.nodes[current].children.get(&c) {
                Some(&next) => next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children.insert(c, next as u32);
                    next
                }
            };
            self.nodes[current].postings.insert(doc);
        }
        self.nodes[current].terminal = true;
    }

    fn find(&self, prefix: &str) -> Option<usize> {
        let mut current = 0usize;
        for c in prefix.chars() {
            current = *self.nodes[current].children.get(&c)? as usize;
        }
        Some(current)
    }

    /// Documents owning a term that starts with `prefix`.
    pub fn lookup_prefix(&self, prefix: &str) -> Option<&PostingList> {
        self.find(prefix).map(|node| &self.nodes[node].postings)
    }

    /// Whether `term` was inserted as a complete term.
    pub fn contains(&self, term: &str) -> bool {
        self.find(term)
            .map(|node| self.nodes[node].terminal)
            .unwrap_or(false)
    }

    /// Complete terms under `prefix` in lexicographic char order, at most `limit`.
    pub fn terms_with_prefix(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut out = Vec::new();
        let Some(start) = self.find(prefix) else {
            return out;
        };
        // Explicit stack: (node, term so far). Children pushed in reverse so
        // the smallest char pops first.
        let mut stack = vec![(start, prefix.to_string())];
        while let Some((node, term)) = stack.pop() {
            if out.len() >= limit {
                break;
            }
            if self.nodes[node].terminal {
                out.push(term.clone());
            }
            for (&c, &child) in self.nodes[node].children.iter().rev() {
                let mut next = term.clone();
                next.push(c);
                stack.push((child as usize, next));
            }
        }
        out
    }

    pub fn nodes(&self) -> &[TrieNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
