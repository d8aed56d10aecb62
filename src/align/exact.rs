//! 精确多模式匹配：在文本的每个起点重新从根节点出发沿 trie 向下走，
//! 遇到第一个不匹配的符号或文本末尾即停止（不使用失败函数）。

use super::alignment::Alignment;
use crate::index::trie::{KeywordTrie, NodeId, ROOT};
use crate::util::symbol::Symbol;

impl<S: Symbol> KeywordTrie<S> {
    /// 文本中是否出现任意一个模式。找到第一个终止节点即返回。
    pub fn contained(&self, text: &[S]) -> bool {
        (0..text.len()).any(|s| self.walk(text, s).any(|(_, node)| self.node(node).is_terminal()))
    }

    /// 枚举所有精确出现（distance = 0）。
    ///
    /// 同一条路径上较短与较长的模式都会被报告；输出按起点升序，
    /// 同一起点内按模式长度升序，同一节点内按插入顺序。
    pub fn alignments<'a>(&'a self, text: &'a [S]) -> Vec<Alignment<'a, S>> {
        let mut out = Vec::new();
        for s in 0..text.len() {
            for (pos, node) in self.walk(text, s) {
                for &pid in self.node(node).terminals() {
                    let pattern = self.pattern(pid);
                    let start = pos as isize - pattern.len() as isize + 1;
                    out.push(Alignment::new(text, pattern, pid, start, 0));
                }
            }
        }
        out
    }

    /// 从起点 `s` 沿文本精确下行，依次产出 (刚消耗的文本位置, 到达的节点)。
    fn walk<'a>(&'a self, text: &'a [S], s: usize) -> impl Iterator<Item = (usize, NodeId)> + 'a {
        let mut node = ROOT;
        text[s..].iter().enumerate().map_while(move |(offset, &sym)| {
            node = self.node(node).get(sym)?;
            Some((s + offset, node))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::index::trie::KeywordTrie;

    fn trie(patterns: &[&[u8]]) -> KeywordTrie<u8> {
        patterns.iter().collect()
    }

    #[test]
    fn contained_single_pattern() {
        let t = trie(&[b"AT"]);
        assert!(t.contained(b"GATC"));
        assert!(!t.contained(b"GTAC"));
        assert!(!t.contained(b"A"));
    }

    #[test]
    fn contained_at_text_edges() {
        let t = trie(&[b"GA", b"TC"]);
        assert!(t.contained(b"GAAA"));
        assert!(t.contained(b"AATC"));
        assert!(!t.contained(b"AAAA"));
    }

    #[test]
    fn single_alignment() {
        let t = trie(&[b"AT"]);
        let alns = t.alignments(b"GATC");
        assert_eq!(alns.len(), 1);
        assert_eq!(alns[0].pattern, b"AT");
        assert_eq!(alns[0].start, 1);
        assert_eq!(alns[0].distance, 0);
    }

    #[test]
    fn nested_patterns_share_walk() {
        let t = trie(&[b"AT", b"ATC"]);
        let alns = t.alignments(b"GATC");
        let got: Vec<_> = alns.iter().map(|a| (a.pattern, a.start, a.distance)).collect();
        assert_eq!(got, vec![(b"AT".as_slice(), 1, 0), (b"ATC".as_slice(), 1, 0)]);
    }

    #[test]
    fn overlapping_occurrences() {
        let t = trie(&[b"AA"]);
        let starts: Vec<_> = t.alignments(b"AAAA").iter().map(|a| a.start).collect();
        assert_eq!(starts, vec![0, 1, 2]);
    }

    #[test]
    fn duplicate_pattern_reported_twice() {
        let t = trie(&[b"GA", b"GA"]);
        let ids: Vec<_> = t.alignments(b"TGA").iter().map(|a| a.pattern_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn empty_inputs() {
        let t = trie(&[b"AT"]);
        assert!(!t.contained(b""));
        assert!(t.alignments(b"").is_empty());

        let empty = KeywordTrie::<u8>::new();
        assert!(!empty.contained(b"GATC"));
        assert!(empty.alignments(b"GATC").is_empty());
    }

    #[test]
    fn alignments_match_text_slices() {
        let t = trie(&[b"CG", b"GCG", b"T"]);
        let text = b"ACGCGTT";
        let alns = t.alignments(text);
        assert_eq!(alns.len(), 5);
        for a in &alns {
            assert_eq!(&text[a.text_range().unwrap()], a.pattern);
        }
    }
}
