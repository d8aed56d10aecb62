use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

use super::trie::{KeywordTrie, PatternId};
use crate::util::dna::Nucleotide;

/// 索引构建信息，随索引一起保存
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub pattern_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 可持久化的模式索引：DNA 关键词 trie + 模式名称 + 构建信息。
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PatternIndex {
    pub trie: KeywordTrie<Nucleotide>,
    /// names[i] 为模式 i 的名称
    pub names: Vec<String>,
    pub meta: IndexMeta,
}

impl PatternIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入带名称的模式；空模式被 trie 忽略时名称也不记录。
    pub fn add(&mut self, name: impl Into<String>, pattern: &[Nucleotide]) -> Option<PatternId> {
        let id = self.trie.add_pattern(pattern)?;
        self.names.push(name.into());
        Some(id)
    }

    pub fn name(&self, id: PatternId) -> &str {
        &self.names[id]
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        self.meta = meta;
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let f = std::fs::File::create(path)?;
        let mut w = std::io::BufWriter::new(f);
        bincode::serialize_into(&mut w, self)?;
        w.flush()?;
        debug!(
            path,
            patterns = self.trie.pattern_count(),
            nodes = self.trie.node_count(),
            "index saved"
        );
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let f = std::fs::File::open(path)?;
        let idx: Self = bincode::deserialize_from(std::io::BufReader::new(f))?;
        if idx.names.len() != idx.trie.pattern_count() {
            bail!(
                "corrupt index '{}': {} names for {} patterns",
                path,
                idx.names.len(),
                idx.trie.pattern_count()
            );
        }
        debug!(
            path,
            patterns = idx.trie.pattern_count(),
            nodes = idx.trie.node_count(),
            "index loaded"
        );
        Ok(idx)
    }
}
