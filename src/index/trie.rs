use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::util::symbol::Symbol;

/// 节点在 arena 中的下标
pub type NodeId = u32;
/// 模式在 trie 模式表中的下标（按插入顺序分配）
pub type PatternId = usize;

pub const ROOT: NodeId = 0;

/// Trie 节点：入边符号、出边表以及以该节点结尾的模式列表。
/// 子节点按符号值有序存放，遍历顺序即符号升序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieNode<S: Ord> {
    symbol: Option<S>,
    children: BTreeMap<S, NodeId>,
    terminals: Vec<PatternId>,
}

impl<S: Symbol> TrieNode<S> {
    fn new(symbol: Option<S>) -> Self {
        Self { symbol, children: BTreeMap::new(), terminals: Vec::new() }
    }

    /// 父节点到本节点的边上的符号；根节点为 None
    pub fn symbol(&self) -> Option<S> {
        self.symbol
    }

    #[inline]
    pub fn get(&self, symbol: S) -> Option<NodeId> {
        self.children.get(&symbol).copied()
    }

    pub fn children(&self) -> impl Iterator<Item = (S, NodeId)> + '_ {
        self.children.iter().map(|(&s, &id)| (s, id))
    }

    pub fn symbols(&self) -> impl Iterator<Item = S> + '_ {
        self.children.keys().copied()
    }

    #[inline]
    pub fn terminals(&self) -> &[PatternId] {
        &self.terminals
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        !self.terminals.is_empty()
    }

    /// 追加终止模式，不去重
    pub fn add_terminal(&mut self, pattern: PatternId) {
        self.terminals.push(pattern);
    }
}

/// 关键词 trie（多模式匹配器）。
///
/// 节点存放在 arena（`Vec<TrieNode>`）中，根节点下标为 [`ROOT`]，
/// 每个节点只由其父节点引用，没有回指针。模式本身存放在 `patterns` 中，
/// 终止列表记录模式下标，因此同一模式插入两次会得到两个独立的终止条目。
///
/// 构建阶段需要 `&mut self`；构建完成后所有查询只读，可在多线程间共享。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTrie<S: Ord> {
    nodes: Vec<TrieNode<S>>,
    patterns: Vec<Vec<S>>,
}

impl<S: Symbol> Default for KeywordTrie<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> KeywordTrie<S> {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new(None)], patterns: Vec::new() }
    }

    #[inline]
    pub fn root(&self) -> &TrieNode<S> {
        &self.nodes[ROOT as usize]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TrieNode<S> {
        &self.nodes[id as usize]
    }

    /// 返回 `parent` 在 `symbol` 上的子节点，不存在时先创建空子节点。
    pub fn get_or_create(&mut self, parent: NodeId, symbol: S) -> NodeId {
        if let Some(child) = self.nodes[parent as usize].get(symbol) {
            return child;
        }
        let child = next_node_id(self.nodes.len());
        self.nodes.push(TrieNode::new(Some(symbol)));
        self.nodes[parent as usize].children.insert(symbol, child);
        child
    }

    /// 插入一个模式，返回其下标。
    ///
    /// 空模式会被忽略（返回 None）：它会让根节点成为终止节点，
    /// 而各查询都从根节点之后的第一个符号开始检查终止列表。
    pub fn add_pattern(&mut self, pattern: &[S]) -> Option<PatternId> {
        if pattern.is_empty() {
            warn!("ignoring empty pattern");
            return None;
        }
        let mut node = ROOT;
        for &sym in pattern {
            node = self.get_or_create(node, sym);
        }
        let id = self.patterns.len();
        self.patterns.push(pattern.to_vec());
        self.nodes[node as usize].add_terminal(id);
        Some(id)
    }

    #[inline]
    pub fn pattern(&self, id: PatternId) -> &[S] {
        &self.patterns[id]
    }

    pub fn patterns(&self) -> impl Iterator<Item = &[S]> + '_ {
        self.patterns.iter().map(Vec::as_slice)
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 根节点到最深叶子的路径长度（计入节点本身，空 trie 为 1）
    pub fn depth(&self) -> usize {
        self.node_depth(ROOT)
    }

    /// 以 `id` 为根的子树深度，叶子为 1。用显式栈遍历，长模式不会耗尽调用栈。
    pub fn node_depth(&self, id: NodeId) -> usize {
        let mut max = 0;
        let mut stack: Vec<(NodeId, usize)> = vec![(id, 1)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(self.node(node).children.values().map(|&child| (child, depth + 1)));
        }
        max
    }
}

/// 新节点的编号即当前节点数；超出 `NodeId` 范围属于不变量破坏。
fn next_node_id(len: usize) -> NodeId {
    NodeId::try_from(len).unwrap_or_else(|_| panic!("trie node count {} exceeds NodeId range", len))
}

impl<S: Symbol, P: AsRef<[S]>> Extend<P> for KeywordTrie<S> {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for p in iter {
            self.add_pattern(p.as_ref());
        }
    }
}

impl<S: Symbol, P: AsRef<[S]>> FromIterator<P> for KeywordTrie<S> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_trie_has_only_root() {
        let trie: KeywordTrie<u8> = KeywordTrie::new();
        assert_eq!(trie.node_count(), 1);
        assert_eq!(trie.depth(), 1);
        assert!(trie.is_empty());
        assert!(trie.root().symbol().is_none());
        assert!(!trie.root().is_terminal());
    }

    #[test]
    fn shared_prefixes_reuse_nodes() {
        let trie: KeywordTrie<u8> = [b"AT".as_slice(), b"ATC", b"AG"].into_iter().collect();
        // root, A, T, C, G
        assert_eq!(trie.node_count(), 5);
        assert_eq!(trie.depth(), 4);

        let a = trie.root().get(b'A').expect("A");
        assert_eq!(trie.node(a).symbol(), Some(b'A'));
        assert_eq!(trie.node(a).symbols().collect::<Vec<_>>(), vec![b'G', b'T']);
        let t = trie.node(a).get(b'T').expect("T");
        assert_eq!(trie.node(t).terminals(), &[0]);
        let c = trie.node(t).get(b'C').expect("C");
        assert_eq!(trie.node(c).terminals(), &[1]);
        assert!(trie.root().get(b'G').is_none());
    }

    #[test]
    fn duplicate_patterns_are_independent_terminals() {
        let mut trie: KeywordTrie<u8> = KeywordTrie::new();
        assert_eq!(trie.add_pattern(b"GAT"), Some(0));
        assert_eq!(trie.add_pattern(b"GAT"), Some(1));
        assert_eq!(trie.node_count(), 4);

        let mut node = ROOT;
        for &b in b"GAT" {
            node = trie.node(node).get(b).unwrap();
        }
        assert_eq!(trie.node(node).terminals(), &[0, 1]);
        assert_eq!(trie.pattern(1), b"GAT");
    }

    #[test]
    fn empty_pattern_is_ignored() {
        let mut trie: KeywordTrie<u8> = KeywordTrie::new();
        assert_eq!(trie.add_pattern(b""), None);
        assert!(trie.is_empty());
        assert!(!trie.root().is_terminal());
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut trie: KeywordTrie<char> = KeywordTrie::new();
        let x = trie.get_or_create(ROOT, 'x');
        assert_eq!(trie.get_or_create(ROOT, 'x'), x);
        assert_eq!(trie.node_count(), 2);
        assert_eq!(trie.node_depth(x), 1);
    }

    #[test]
    fn depth_of_very_long_pattern() {
        let mut trie: KeywordTrie<u8> = KeywordTrie::new();
        trie.add_pattern(&vec![b'A'; 200_000]);
        trie.add_pattern(b"C");
        assert_eq!(trie.depth(), 200_001);
        let a = trie.root().get(b'A').unwrap();
        assert_eq!(trie.node_depth(a), 200_000);
    }

    #[test]
    fn node_ids_follow_node_count() {
        assert_eq!(next_node_id(1), 1);
        assert_eq!(next_node_id(u32::MAX as usize), u32::MAX);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "exceeds NodeId range")]
    fn node_id_overflow_panics() {
        next_node_id(u32::MAX as usize + 1);
    }
}
