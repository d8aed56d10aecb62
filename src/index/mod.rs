pub mod store;
pub mod trie;
