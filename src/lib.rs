//! # trie-align
//!
//! 基于关键词 trie 的多模式 DNA 序列匹配。
//!
//! 一组较短的模式序列被插入 trie，随后可以对任意文本序列执行四种只读查询：
//!
//! - **包含判断**：文本中是否精确出现任意模式
//! - **精确枚举**：所有精确出现（含嵌套、重叠的模式）
//! - **最小距离搜索**：全局最小替换距离下的全部对齐（最佳优先搜索）
//! - **有界枚举**：替换距离低于上界的全部对齐
//!
//! 只计算替换（错配），不支持插入 / 删除。
//!
//! ## 快速示例
//!
//! ```rust
//! use trie_align::index::trie::KeywordTrie;
//!
//! let mut trie: KeywordTrie<u8> = KeywordTrie::new();
//! trie.add_pattern(b"AT");
//! trie.add_pattern(b"ATC");
//!
//! assert!(trie.contained(b"GATC"));
//! assert_eq!(trie.alignments(b"GATC").len(), 2);
//!
//! let fuzzy = trie.shortest_distance(b"GTTC", None);
//! assert!(fuzzy.iter().all(|a| a.distance == 1));
//! ```
//!
//! ## 模块说明
//!
//! - [`util`] — 符号替换代价约定、DNA 字母表编码 / 反向互补
//! - [`index`] — 关键词 trie 构建与索引持久化
//! - [`align`] — 精确 / 有界距离查询，批量 read 搜索
//! - [`io`] — FASTA / FASTQ 文件解析

pub mod align;
pub mod index;
pub mod io;
pub mod util;
