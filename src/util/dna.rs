use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::symbol::Symbol;

/// DNA 字母表 {A, C, G, T, N}。`N` 是独立符号：与任何具体碱基的替换代价为 1。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nucleotide {
    A = 1,
    C = 2,
    G = 3,
    T = 4,
    N = 5,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DnaError {
    #[error("invalid nucleotide '{base}' at position {pos}")]
    InvalidBase { base: char, pos: usize },
}

impl Nucleotide {
    /// 宽松转换：大小写不敏感，U 视作 T，其余字符映射为 N。
    #[inline]
    pub fn from_ascii(b: u8) -> Self {
        Self::try_from_ascii(b).unwrap_or(Nucleotide::N)
    }

    #[inline]
    pub fn try_from_ascii(b: u8) -> Option<Self> {
        match b.to_ascii_uppercase() {
            b'A' => Some(Nucleotide::A),
            b'C' => Some(Nucleotide::C),
            b'G' => Some(Nucleotide::G),
            b'T' | b'U' => Some(Nucleotide::T),
            b'N' => Some(Nucleotide::N),
            _ => None,
        }
    }

    #[inline]
    pub fn to_ascii(self) -> u8 {
        match self {
            Nucleotide::A => b'A',
            Nucleotide::C => b'C',
            Nucleotide::G => b'G',
            Nucleotide::T => b'T',
            Nucleotide::N => b'N',
        }
    }

    #[inline]
    pub fn complement(self) -> Self {
        match self {
            Nucleotide::A => Nucleotide::T,
            Nucleotide::C => Nucleotide::G,
            Nucleotide::G => Nucleotide::C,
            Nucleotide::T => Nucleotide::A,
            Nucleotide::N => Nucleotide::N,
        }
    }
}

impl Symbol for Nucleotide {
    #[inline]
    fn substitution_cost(&self, other: &Self) -> u32 {
        u32::from(self != other)
    }
}

pub fn encode(seq: &[u8]) -> Vec<Nucleotide> {
    seq.iter().copied().map(Nucleotide::from_ascii).collect()
}

/// 严格转换：遇到 ACGTUN 以外的字符即报错。
pub fn encode_strict(seq: &[u8]) -> Result<Vec<Nucleotide>, DnaError> {
    seq.iter()
        .enumerate()
        .map(|(pos, &b)| {
            Nucleotide::try_from_ascii(b).ok_or(DnaError::InvalidBase { base: b as char, pos })
        })
        .collect()
}

pub fn decode(seq: &[Nucleotide]) -> Vec<u8> {
    seq.iter().copied().map(Nucleotide::to_ascii).collect()
}

pub fn revcomp(seq: &[Nucleotide]) -> Vec<Nucleotide> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq.iter().rev() {
        out.push(b.complement());
    }
    out
}
