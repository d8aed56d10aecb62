//! 有界替换距离搜索。
//!
//! 在 (trie 节点 × 文本位置) 的乘积图上做最佳优先（Dijkstra 式）搜索：
//! 每个文本起点以 (0, s, root) 入队，出队一条 (d, pos, node) 后，
//! 对 node 的每条出边 sym 计算 `d + cost(text[pos], sym)` 并扩展到 (pos + 1, child)。
//! 替换代价非负，因此出队距离单调不减。
//!
//! 队列按 (距离, 文本位置, 入队序号) 升序出队；距离相同的条目按位置、再按先进先出排列，
//! 结果因此可复现。距离上界为开区间：只扩展 `total < max_distance` 的边。

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::trace;

use super::alignment::Alignment;
use crate::index::trie::{KeywordTrie, NodeId, ROOT};
use crate::util::symbol::Symbol;

/// 带扩展预算的搜索结果。`truncated` 表示预算耗尽时队列中仍有未处理条目。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<'a, S> {
    pub alignments: Vec<Alignment<'a, S>>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pruning {
    /// 只保留全局最小距离的对齐
    KeepBest,
    /// 保留上界以内的全部对齐
    KeepAll,
}

// (distance, position, seq, node)
type Entry = Reverse<(u32, usize, u64, NodeId)>;

impl<S: Symbol> KeywordTrie<S> {
    /// 返回达到全局最小替换距离的全部对齐。`max_distance = None` 表示无上界。
    pub fn shortest_distance<'a>(
        &'a self,
        text: &'a [S],
        max_distance: Option<u32>,
    ) -> Vec<Alignment<'a, S>> {
        self.best_first(text, max_distance, Pruning::KeepBest, None).alignments
    }

    /// 返回替换距离小于 `max_distance` 的全部对齐。`max_distance = None` 表示无上界。
    pub fn distances<'a>(&'a self, text: &'a [S], max_distance: Option<u32>) -> Vec<Alignment<'a, S>> {
        self.best_first(text, max_distance, Pruning::KeepAll, None).alignments
    }

    /// 同 [`Self::shortest_distance`]，但最多处理 `max_expansions` 个队列条目。
    pub fn shortest_distance_limited<'a>(
        &'a self,
        text: &'a [S],
        max_distance: Option<u32>,
        max_expansions: usize,
    ) -> SearchOutcome<'a, S> {
        self.best_first(text, max_distance, Pruning::KeepBest, Some(max_expansions))
    }

    /// 同 [`Self::distances`]，但最多处理 `max_expansions` 个队列条目。
    pub fn distances_limited<'a>(
        &'a self,
        text: &'a [S],
        max_distance: Option<u32>,
        max_expansions: usize,
    ) -> SearchOutcome<'a, S> {
        self.best_first(text, max_distance, Pruning::KeepAll, Some(max_expansions))
    }

    fn best_first<'a>(
        &'a self,
        text: &'a [S],
        max_distance: Option<u32>,
        pruning: Pruning,
        max_expansions: Option<usize>,
    ) -> SearchOutcome<'a, S> {
        let mut heap: BinaryHeap<Entry> = BinaryHeap::with_capacity(text.len());
        let mut seq = 0u64;
        for s in 0..text.len() {
            heap.push(Reverse((0, s, seq, ROOT)));
            seq += 1;
        }

        let keep_best = pruning == Pruning::KeepBest;
        let mut best: Option<u32> = None;
        let mut out: Vec<Alignment<'a, S>> = Vec::new();
        let mut expansions = 0usize;
        let mut truncated = false;

        while let Some(Reverse((d, pos, _, node))) = heap.pop() {
            // 出队距离单调不减，之后不可能再追平当前最优
            if keep_best && best.is_some_and(|b| b < d) {
                break;
            }
            if max_expansions.is_some_and(|limit| expansions >= limit) {
                truncated = true;
                break;
            }
            expansions += 1;

            let observed = text[pos];
            for (sym, child) in self.node(node).children() {
                let total = d.saturating_add(observed.substitution_cost(&sym));
                if max_distance.is_some_and(|m| total >= m) {
                    continue;
                }
                if keep_best && best.is_some_and(|b| total > b) {
                    continue;
                }

                if pos + 1 < text.len() {
                    heap.push(Reverse((total, pos + 1, seq, child)));
                    seq += 1;
                }

                let terminals = self.node(child).terminals();
                if terminals.is_empty() {
                    continue;
                }
                if keep_best && best.map_or(true, |b| total < b) {
                    out.clear();
                    best = Some(total);
                }
                for &pid in terminals {
                    let pattern = self.pattern(pid);
                    let start = pos as isize - pattern.len() as isize + 1;
                    out.push(Alignment::new(text, pattern, pid, start, total));
                }
            }
        }

        trace!(expansions, found = out.len(), truncated, "best-first search finished");
        SearchOutcome { alignments: out, truncated }
    }
}

#[cfg(test)]
mod tests {
    use crate::index::trie::KeywordTrie;

    fn trie(patterns: &[&[u8]]) -> KeywordTrie<u8> {
        patterns.iter().collect()
    }

    fn keys(alns: &[crate::align::Alignment<'_, u8>]) -> Vec<(usize, isize, u32)> {
        let mut k: Vec<_> = alns.iter().map(|a| a.key()).collect();
        k.sort_unstable();
        k
    }

    #[test]
    fn single_substitution_unbounded() {
        let t = trie(&[b"AA"]);
        let alns = t.shortest_distance(b"AT", None);
        assert_eq!(keys(&alns), vec![(0, 0, 1)]);
        assert_eq!(alns[0].pattern, b"AA");
    }

    #[test]
    fn bound_is_exclusive() {
        let t = trie(&[b"AA"]);
        assert_eq!(keys(&t.distances(b"AT", Some(2))), vec![(0, 0, 1)]);
        assert!(t.distances(b"AT", Some(1)).is_empty());
        assert!(t.shortest_distance(b"AT", Some(1)).is_empty());
        assert!(t.distances(b"AT", Some(0)).is_empty());
    }

    #[test]
    fn exact_match_beats_mismatches() {
        let t = trie(&[b"GAT", b"CAT"]);
        let alns = t.shortest_distance(b"TTGATT", None);
        assert_eq!(keys(&alns), vec![(0, 2, 0)]);
    }

    #[test]
    fn ties_are_all_reported() {
        let t = trie(&[b"AC", b"AG"]);
        let alns = t.shortest_distance(b"AT", None);
        assert_eq!(keys(&alns), vec![(0, 0, 1), (1, 0, 1)]);
    }

    #[test]
    fn exact_long_match_wins() {
        let t = trie(&[b"TT", b"ACGT"]);
        let alns = t.shortest_distance(b"ACGTA", None);
        assert_eq!(keys(&alns), vec![(1, 0, 0)]);
    }

    #[test]
    fn later_better_match_clears_results() {
        // 先以距离 1 找到 "AT"@0，随后出队的条目以距离 0 找到 "GG"@1
        let t = trie(&[b"AT", b"GG"]);
        let alns = t.shortest_distance(b"AGG", None);
        assert_eq!(keys(&alns), vec![(1, 1, 0)]);
        assert_eq!(keys(&t.distances(b"AGG", None)), vec![(0, 0, 1), (0, 1, 2), (1, 0, 1), (1, 1, 0)]);
    }

    #[test]
    fn distances_enumerates_every_offset() {
        let t = trie(&[b"AA"]);
        let alns = t.distances(b"ATA", None);
        // 起点 0: AT -> 1；起点 1: TA -> 1
        assert_eq!(keys(&alns), vec![(0, 0, 1), (0, 1, 1)]);
        let exact_and_one = t.distances(b"AAT", Some(2));
        assert_eq!(keys(&exact_and_one), vec![(0, 0, 0), (0, 1, 1)]);
    }

    #[test]
    fn distances_respects_bound() {
        let t = trie(&[b"ACG", b"TTT"]);
        let all = t.distances(b"ACGTT", None);
        assert_eq!(
            keys(&all),
            vec![(0, 0, 0), (0, 1, 3), (0, 2, 3), (1, 0, 3), (1, 1, 2), (1, 2, 1)]
        );
        let below_three = t.distances(b"ACGTT", Some(3));
        assert_eq!(keys(&below_three), vec![(0, 0, 0), (1, 1, 2), (1, 2, 1)]);
    }

    #[test]
    fn pattern_longer_than_text() {
        let t = trie(&[b"AAAA"]);
        assert!(t.shortest_distance(b"AAA", None).is_empty());
        assert!(t.distances(b"AAA", None).is_empty());
    }

    #[test]
    fn empty_inputs() {
        let t = trie(&[b"AT"]);
        assert!(t.shortest_distance(b"", None).is_empty());
        assert!(t.distances(b"", Some(3)).is_empty());

        let empty = KeywordTrie::<u8>::new();
        assert!(empty.shortest_distance(b"GATC", None).is_empty());
        assert!(empty.distances(b"GATC", None).is_empty());
    }

    #[test]
    fn budget_truncates_search() {
        let t = trie(&[b"GGGG"]);
        let text = b"ACGTACGTACGT";
        let full = t.distances(text, None);
        let limited = t.distances_limited(text, None, 3);
        assert!(limited.truncated);
        assert!(limited.alignments.len() < full.len());

        let generous = t.distances_limited(text, None, usize::MAX);
        assert!(!generous.truncated);
        assert_eq!(keys(&generous.alignments), keys(&full));

        let best = t.shortest_distance_limited(text, None, usize::MAX);
        assert!(!best.truncated);
        assert_eq!(keys(&best.alignments), keys(&t.shortest_distance(text, None)));
    }
}
