use anyhow::Result;
use std::io::BufRead;

use crate::util::dna;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

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

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
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
                if self.buf.starts_with('>') {
                    let h = self.buf[1..].trim().to_string();
                    break h;
                }
            }
        };

        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // Sequence lines are kept verbatim apart from whitespace; cleaning
        // to A/C/G/T happens later so callers can see what was dropped.
        let mut seq: Vec<u8> = Vec::new();
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            if self.buf.starts_with('>') {
                let h = self.buf[1..].trim().to_string();
                self.peek_header = Some(h);
                break;
            }
            for &b in self.buf.as_bytes() {
                match b {
                    b'\n' | b'\r' | b' ' | b'\t' => {}
                    _ => seq.push(b.to_ascii_uppercase()),
                }
            }
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }

    /// Scan forward for the record whose id equals `id`.
    pub fn find_record(&mut self, id: &str) -> Result<Option<FastaRecord>> {
        while let Some(rec) = self.next_record()? {
            if rec.id == id {
                return Ok(Some(rec));
            }
        }
        Ok(None)
    }
}

/// Drop header (`>`) lines and blank lines, trim the rest and concatenate.
/// Multiple records are merged into one sequence.
pub fn parse_fasta(text: &str) -> String {
    text.lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('>'))
        .map(str::trim)
        .collect()
}

/// Raw user text to clean sequence: FASTA parsing only when a header
/// marker is present, then [`dna::clean_sequence`].
pub fn prepare_sequence(text: &str) -> Vec<u8> {
    if text.contains('>') {
        dna::clean_sequence(parse_fasta(text).as_bytes())
    } else {
        dna::clean_sequence(text.as_bytes())
    }
}
