use anyhow::{anyhow, Result};
use std::io::BufRead;

use super::{split_header, SeqRecord};

/// 四行格式 FASTQ 读取器（不支持序列折行），记录之间的空行被跳过。
pub struct FastqReader<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), line_no: 0, done: false }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        self.line_no += 1;
        Ok(n > 0)
    }

    pub fn next_record(&mut self) -> Result<Option<SeqRecord>> {
        if self.done { return Ok(None); }

        // header line starting with '@'
        loop {
            if !self.read_line()? { self.done = true; return Ok(None); }
            if !self.buf.trim().is_empty() { break; }
        }
        let header = self.buf.strip_prefix('@')
            .ok_or_else(|| anyhow!("line {}: FASTQ header not starting with '@'", self.line_no))?
            .trim_end()
            .to_string();
        let (id, desc) = split_header(&header);

        // sequence line
        if !self.read_line()? { return Err(anyhow!("record '{}': unexpected EOF after header", id)); }
        let seq: Vec<u8> = self.buf.trim_end().bytes().map(|b| b.to_ascii_uppercase()).collect();

        // plus line
        if !self.read_line()? || !self.buf.starts_with('+') {
            return Err(anyhow!("line {}: missing '+' line in record '{}'", self.line_no, id));
        }

        // quality line
        if !self.read_line()? { return Err(anyhow!("record '{}': missing quality line", id)); }
        let qual = self.buf.trim_end().as_bytes().to_vec();

        if qual.len() != seq.len() {
            return Err(anyhow!("record '{}': seq/qual length mismatch ({} vs {})", id, seq.len(), qual.len()));
        }

        Ok(Some(SeqRecord { id, desc, seq, qual: Some(qual) }))
    }
}
