use std::fmt::Debug;
use std::hash::Hash;

/// 字母表符号：可比较、可排序，并带有非负的两两替换代价。
///
/// 约定：`substitution_cost` 对称，且当且仅当 `a == b` 时为 0。
/// `Ord` 用于让 trie 子节点按符号值有序存放，保证遍历顺序确定。
pub trait Symbol: Copy + Ord + Hash + Debug {
    fn substitution_cost(&self, other: &Self) -> u32;
}

impl Symbol for u8 {
    #[inline]
    fn substitution_cost(&self, other: &Self) -> u32 {
        u32::from(self != other)
    }
}

impl Symbol for char {
    #[inline]
    fn substitution_cost(&self, other: &Self) -> u32 {
        u32::from(self != other)
    }
}
