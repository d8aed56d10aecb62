//! 演示如何在 library 模式下使用 trie-align。
//!
//! 运行方式：
//! ```bash
//! cargo run --example basic_search
//! ```

use trie_align::index::trie::KeywordTrie;
use trie_align::util::dna::{self, Nucleotide};

fn show(label: &str, alns: &[trie_align::align::Alignment<'_, Nucleotide>]) {
    println!("\n{}: {} 条", label, alns.len());
    for a in alns {
        println!(
            "  pattern={} start={} distance={}",
            String::from_utf8_lossy(&dna::decode(a.pattern)),
            a.start,
            a.distance
        );
    }
}

fn main() {
    // 1. 构建模式 trie
    let patterns: [&[u8]; 4] = [b"GCTGA", b"GCTG", b"TAGCTA", b"CCCCC"];
    let mut trie: KeywordTrie<Nucleotide> = KeywordTrie::new();
    for p in patterns {
        trie.add_pattern(&dna::encode(p));
    }
    println!(
        "trie 构建完成：模式数={}, 节点数={}, 深度={}",
        trie.pattern_count(),
        trie.node_count(),
        trie.depth()
    );

    // 2. 精确查询
    let text = dna::encode(b"ACGTACGTAGCTGATCGTAGCTAGCTAGC");
    println!("\n包含任意模式: {}", trie.contained(&text));
    show("精确出现", &trie.alignments(&text));

    // 3. 最小错配搜索
    show("最小距离", &trie.shortest_distance(&text, None));

    // 4. 有界枚举（距离 < 2）
    show("距离 < 2", &trie.distances(&text, Some(2)));
}
