use anyhow::Result;
use std::io::BufRead;

use super::{split_header, SeqRecord};

/// 多行 FASTA 读取器。序列行中的空白被忽略，碱基统一转为大写。
pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            peek_header: None,
        }
    }

    pub fn next_record(&mut self) -> Result<Option<SeqRecord>> {
        if self.done {
            return Ok(None);
        }

        // Find header line
        let header = if let Some(h) = self.peek_header.take() {
            h
        } else {
            loop {
                self.buf.clear();
                let n = self.reader.read_line(&mut self.buf)?;
                if n == 0 {
                    self.done = true;
                    return Ok(None);
                }
                if let Some(h) = self.buf.strip_prefix('>') {
                    break h.trim().to_string();
                }
            }
        };
        let (id, desc) = split_header(&header);

        let mut seq: Vec<u8> = Vec::new();
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            if let Some(h) = self.buf.strip_prefix('>') {
                self.peek_header = Some(h.trim().to_string());
                break;
            }
            seq.extend(
                self.buf
                    .bytes()
                    .filter(|b| !b.is_ascii_whitespace())
                    .map(|b| b.to_ascii_uppercase()),
            );
        }

        Ok(Some(SeqRecord { id, desc, seq, qual: None }))
    }
}
