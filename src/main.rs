use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use trie_align::align::{self, SearchMode, SearchOpt};
use trie_align::index::store::{IndexMeta, PatternIndex};
use trie_align::io;
use trie_align::util::dna;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "trie-align", author, version, about = "Keyword-trie multi-pattern matcher for DNA sequences", arg_required_else_help = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a pattern index from a FASTA file (one pattern per record)
    Index {
        /// Patterns FASTA file
        patterns: String,
        /// Output prefix for the index file (<prefix>.kt)
        #[arg(short, long, default_value = "patterns")]
        output: String,
        /// Reject bases other than A/C/G/T/U/N instead of mapping them to N
        #[arg(long)]
        strict: bool,
    },
    /// Search reads (FASTA or FASTQ) against a pattern index
    Search {
        /// Path to the pattern index (.kt)
        #[arg(short = 'i', long = "index")]
        index: String,
        /// Reads FASTA/FASTQ file
        reads: String,
        /// Output TSV path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
        #[arg(short, long, value_enum, default_value_t = SearchMode::Exact)]
        mode: SearchMode,
        /// Exclusive upper bound on mismatches; -1 means unbounded
        #[arg(short = 'k', long = "max-distance", default_value_t = -1, allow_negative_numbers = true)]
        max_distance: i64,
        /// Stop each search after this many queue expansions
        #[arg(long = "max-expansions")]
        max_expansions: Option<usize>,
        /// Also search the reverse complement of every read
        #[arg(long = "both-strands")]
        both_strands: bool,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("trie_align=debug,info")
    } else {
        EnvFilter::new("trie_align=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Index { patterns, output, strict } => run_index(&patterns, &output, strict),
        Commands::Search {
            index,
            reads,
            out,
            mode,
            max_distance,
            max_expansions,
            both_strands,
            threads,
        } => {
            let opt = SearchOpt {
                mode,
                max_distance: align::max_distance_from_sentinel(max_distance)?,
                max_expansions,
                both_strands,
                threads,
            };
            align::search_reads_with_opt(&index, &reads, out.as_deref(), opt)?;
            Ok(())
        }
    }
}

fn run_index(patterns: &str, output: &str, strict: bool) -> Result<()> {
    let reader = io::open_seq_file(patterns)?;

    let mut idx = PatternIndex::new();
    let mut n_records = 0usize;
    for rec in reader {
        let rec = rec?;
        n_records += 1;
        let seq = if strict {
            dna::encode_strict(&rec.seq)
                .map_err(|e| anyhow::anyhow!("pattern '{}': {}", rec.id, e))?
        } else {
            dna::encode(&rec.seq)
        };
        if idx.add(rec.id.clone(), &seq).is_none() {
            warn!(pattern = %rec.id, "skipping empty pattern");
        }
    }

    if n_records == 0 {
        anyhow::bail!("pattern file '{}' contains no sequences", patterns);
    }
    if idx.trie.is_empty() {
        anyhow::bail!("pattern file '{}' contains only empty sequences", patterns);
    }

    info!(
        patterns = idx.trie.pattern_count(),
        nodes = idx.trie.node_count(),
        depth = idx.trie.depth(),
        "pattern trie built"
    );

    idx.set_meta(IndexMeta {
        pattern_file: Some(patterns.to_string()),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
    });

    let out_path = format!("{}.kt", output);
    idx.save_to_file(&out_path)
        .map_err(|e| anyhow::anyhow!("cannot write index to '{}': {}", out_path, e))?;
    debug!(path = %out_path, "index written");
    println!("pattern index saved: {}", out_path);
    Ok(())
}
