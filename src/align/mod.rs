use anyhow::{bail, Result};
use rayon::prelude::*;
use std::io::Write;
use tracing::{debug, info, warn};

pub mod alignment;
pub mod bounded;
pub mod exact;

pub use alignment::Alignment;
pub use bounded::SearchOutcome;

use crate::index::store::PatternIndex;
use crate::index::trie::{KeywordTrie, PatternId};
use crate::io::{self, SeqRecord};
use crate::util::dna::{self, Nucleotide};

/// 每批并行处理的 read 数
const BATCH_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchMode {
    /// Report whether any pattern occurs exactly
    Contained,
    /// Report every exact occurrence
    Exact,
    /// Report the alignments with the minimum mismatch count
    Shortest,
    /// Report every alignment below the mismatch bound
    Within,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchOpt {
    pub mode: SearchMode,
    /// 开区间上界，None 表示无上界
    pub max_distance: Option<u32>,
    /// 每条 read（每条链）最多出队的条目数
    pub max_expansions: Option<usize>,
    pub both_strands: bool,
    pub threads: usize,
}

impl Default for SearchOpt {
    fn default() -> Self {
        Self {
            mode: SearchMode::Exact,
            max_distance: None,
            max_expansions: None,
            both_strands: false,
            threads: 1,
        }
    }
}

/// 将命令行的距离上界转换为 `Option<u32>`：-1 表示无上界。
pub fn max_distance_from_sentinel(v: i64) -> Result<Option<u32>> {
    match v {
        -1 => Ok(None),
        v if v < 0 => bail!("max distance must be non-negative or -1 (unbounded), got {}", v),
        v => match u32::try_from(v) {
            Ok(m) => Ok(Some(m)),
            Err(_) => bail!("max distance {} is too large", v),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn as_char(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

/// 一条 read 上的命中（坐标相对于对应链上的 read 序列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadHit {
    pub strand: Strand,
    pub start: isize,
    pub pattern_id: PatternId,
    pub end: isize,
    pub distance: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    Contained(bool),
    Hits { hits: Vec<ReadHit>, truncated: bool },
}

/// 对单条 read 执行查询。`both_strands` 时同时查询反向互补链；
/// `Shortest` 模式下两条链合并后只保留全局最小距离。
pub fn search_read(trie: &KeywordTrie<Nucleotide>, read: &[Nucleotide], opt: &SearchOpt) -> ReadResult {
    let rev = if opt.both_strands { Some(dna::revcomp(read)) } else { None };
    let strands = std::iter::once((Strand::Forward, read)).chain(rev.as_deref().map(|r| (Strand::Reverse, r)));

    if opt.mode == SearchMode::Contained {
        let found = strands.clone().any(|(_, text)| trie.contained(text));
        return ReadResult::Contained(found);
    }

    let mut hits = Vec::new();
    let mut truncated = false;
    for (strand, text) in strands {
        let outcome = match (opt.mode, opt.max_expansions) {
            (SearchMode::Exact, _) | (SearchMode::Contained, _) => {
                SearchOutcome { alignments: trie.alignments(text), truncated: false }
            }
            (SearchMode::Shortest, Some(limit)) => trie.shortest_distance_limited(text, opt.max_distance, limit),
            (SearchMode::Shortest, None) => SearchOutcome {
                alignments: trie.shortest_distance(text, opt.max_distance),
                truncated: false,
            },
            (SearchMode::Within, Some(limit)) => trie.distances_limited(text, opt.max_distance, limit),
            (SearchMode::Within, None) => SearchOutcome {
                alignments: trie.distances(text, opt.max_distance),
                truncated: false,
            },
        };
        truncated |= outcome.truncated;
        hits.extend(outcome.alignments.iter().map(|a| ReadHit {
            strand,
            start: a.start,
            pattern_id: a.pattern_id,
            end: a.end(),
            distance: a.distance,
        }));
    }

    if opt.mode == SearchMode::Shortest {
        if let Some(min) = hits.iter().map(|h| h.distance).min() {
            hits.retain(|h| h.distance == min);
        }
    }
    hits.sort_unstable();
    ReadResult::Hits { hits, truncated }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub reads: usize,
    pub reads_with_hits: usize,
    pub alignments: usize,
    pub truncated_reads: usize,
}

/// 将一批 read 的结果写为 TSV
pub fn write_results<W: Write>(
    out: &mut W,
    index: &PatternIndex,
    records: &[SeqRecord],
    results: &[ReadResult],
    stats: &mut SearchStats,
) -> Result<()> {
    for (rec, res) in records.iter().zip(results) {
        stats.reads += 1;
        match res {
            ReadResult::Contained(found) => {
                if *found {
                    stats.reads_with_hits += 1;
                }
                writeln!(out, "{}\t{}", rec.id, u8::from(*found))?;
            }
            ReadResult::Hits { hits, truncated } => {
                if !hits.is_empty() {
                    stats.reads_with_hits += 1;
                }
                if *truncated {
                    stats.truncated_reads += 1;
                    warn!(read = %rec.id, "search budget exhausted, results may be incomplete");
                }
                stats.alignments += hits.len();
                for h in hits {
                    writeln!(
                        out,
                        "{}\t{}\t{}\t{}\t{}\t{}",
                        rec.id,
                        h.strand.as_char(),
                        index.name(h.pattern_id),
                        h.start,
                        h.end,
                        h.distance,
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// 读入 FASTA/FASTQ 中的 read，按批并行查询，结果按输入顺序写出。
pub fn search_reads_with_opt(
    index_path: &str,
    reads_path: &str,
    out_path: Option<&str>,
    opt: SearchOpt,
) -> Result<SearchStats> {
    let index = PatternIndex::load_from_file(index_path)
        .map_err(|e| anyhow::anyhow!("cannot load index '{}': {}", index_path, e))?;
    if index.trie.is_empty() {
        warn!(index = index_path, "index contains no patterns");
    }
    let reader = io::open_seq_file(reads_path)?;

    let mut out: Box<dyn Write> = if let Some(p) = out_path {
        Box::new(std::io::BufWriter::new(std::fs::File::create(p)?))
    } else {
        Box::new(std::io::BufWriter::new(std::io::stdout()))
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads.max(1))
        .build()?;
    debug!(threads = pool.current_num_threads(), mode = ?opt.mode, "searching reads");

    match opt.mode {
        SearchMode::Contained => writeln!(out, "#read\tcontained")?,
        _ => writeln!(out, "#read\tstrand\tpattern\tstart\tend\tdistance")?,
    }

    let mut stats = SearchStats::default();
    let mut batch: Vec<SeqRecord> = Vec::with_capacity(BATCH_SIZE);
    let mut reader = reader.peekable();
    while reader.peek().is_some() {
        batch.clear();
        for rec in reader.by_ref().take(BATCH_SIZE) {
            batch.push(rec?);
        }
        let results: Vec<ReadResult> = pool.install(|| {
            batch
                .par_iter()
                .map(|rec| search_read(&index.trie, &dna::encode(&rec.seq), &opt))
                .collect()
        });
        write_results(&mut out, &index, &batch, &results, &mut stats)?;
    }
    out.flush()?;

    info!(
        reads = stats.reads,
        reads_with_hits = stats.reads_with_hits,
        alignments = stats.alignments,
        truncated = stats.truncated_reads,
        "search finished"
    );
    Ok(stats)
}
