use anyhow::{bail, Result};
use std::io::BufRead;

pub mod fasta;
pub mod fastq;

use fasta::FastaReader;
use fastq::FastqReader;

/// FASTA / FASTQ 共用的序列记录；FASTA 记录没有质量值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
    pub qual: Option<Vec<u8>>,
}

/// 按首个非空白字节（'>' 或 '@'）自动识别格式的序列读取器
pub enum SeqReader<R: BufRead> {
    Fasta(FastaReader<R>),
    Fastq(FastqReader<R>),
}

impl<R: BufRead> SeqReader<R> {
    pub fn detect(mut reader: R) -> Result<Self> {
        loop {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                // empty input: treat as FASTA with no records
                return Ok(SeqReader::Fasta(FastaReader::new(reader)));
            }
            match buf.iter().position(|b| !b.is_ascii_whitespace()) {
                Some(i) => {
                    let first = buf[i];
                    reader.consume(i);
                    return match first {
                        b'>' => Ok(SeqReader::Fasta(FastaReader::new(reader))),
                        b'@' => Ok(SeqReader::Fastq(FastqReader::new(reader))),
                        other => bail!("unrecognized sequence format (first byte '{}')", other as char),
                    };
                }
                None => {
                    let n = buf.len();
                    reader.consume(n);
                }
            }
        }
    }

    pub fn next_record(&mut self) -> Result<Option<SeqRecord>> {
        match self {
            SeqReader::Fasta(r) => r.next_record(),
            SeqReader::Fastq(r) => r.next_record(),
        }
    }
}

impl<R: BufRead> Iterator for SeqReader<R> {
    type Item = Result<SeqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

pub fn open_seq_file(path: &str) -> Result<SeqReader<std::io::BufReader<std::fs::File>>> {
    let fh = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("cannot open sequence file '{}': {}", path, e))?;
    SeqReader::detect(std::io::BufReader::new(fh))
}

pub(crate) fn split_header(header: &str) -> (String, Option<String>) {
    let mut parts = header.splitn(2, char::is_whitespace);
    let id = parts.next().unwrap_or("").to_string();
    let desc = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    (id, desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn detects_fasta() {
        let data = b"\n  >r1\nACGT\n";
        let mut r = SeqReader::detect(Cursor::new(&data[..])).unwrap();
        assert!(matches!(r, SeqReader::Fasta(_)));
        let rec = r.next_record().unwrap().unwrap();
        assert_eq!(rec.id, "r1");
        assert_eq!(rec.seq, b"ACGT");
        assert!(rec.qual.is_none());
    }

    #[test]
    fn detects_fastq() {
        let data = b"@r1 desc\nACGT\n+\nIIII\n";
        let r = SeqReader::detect(Cursor::new(&data[..])).unwrap();
        let recs: Vec<_> = r.collect::<Result<_>>().unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].desc.as_deref(), Some("desc"));
        assert_eq!(recs[0].qual.as_deref(), Some(&b"IIII"[..]));
    }

    #[test]
    fn empty_input_has_no_records() {
        let mut r = SeqReader::detect(Cursor::new(&b""[..])).unwrap();
        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(SeqReader::detect(Cursor::new(&b"ACGT\n"[..])).is_err());
    }
}
