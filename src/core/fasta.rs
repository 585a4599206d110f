use crate::core::error::{ParseError, SyntaxIssue};
use crate::core::io;
use std::collections::HashSet;
use std::path::Path;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contig {
    pub name: String,
    pub seq: Vec<u8>,
}

impl Contig {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyntaxError {
    pub line: usize,
    pub issue: SyntaxIssue,
}

/// Reads every contig of a FASTA file, in file order.
pub fn load(path: &Path, threads: usize) -> Result<Vec<Contig>, ParseError> {
    let data = io::read_sequence_bytes(path, threads).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(data.bytes()).map_err(|e| ParseError::Syntax {
        path: path.to_path_buf(),
        line: e.line,
        reason: e.issue,
    })
}

pub fn parse(data: &[u8]) -> Result<Vec<Contig>, SyntaxError> {
    let mut contigs: Vec<Contig> = Vec::new();
    let mut names: HashSet<String> = HashSet::new();
    let mut line_no = 0usize;
    let mut start = 0usize;

    while start < data.len() {
        let end = memchr::memchr(b'\n', &data[start..]).map_or(data.len(), |i| start + i);
        let mut line = &data[start..end];
        start = end + 1;
        line_no += 1;
        if let [rest @ .., b'\r'] = line {
            line = rest;
        }

        if let Some(header) = line.strip_prefix(b">") {
            let name = header
                .split(|b| b.is_ascii_whitespace())
                .find(|tok| !tok.is_empty())
                .map(|tok| String::from_utf8_lossy(tok).into_owned())
                .ok_or(SyntaxError {
                    line: line_no,
                    issue: SyntaxIssue::EmptyName,
                })?;
            if !names.insert(name.clone()) {
                return Err(SyntaxError {
                    line: line_no,
                    issue: SyntaxIssue::DuplicateContig(name),
                });
            }
            contigs.push(Contig {
                name,
                seq: Vec::new(),
            });
            continue;
        }

        let Some(current) = contigs.last_mut() else {
            if line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }
            return Err(SyntaxError {
                line: line_no,
                issue: SyntaxIssue::MissingHeader,
            });
        };
        for &b in line {
            match b {
                b if b.is_ascii_alphabetic() => current.seq.push(b),
                b'-' | b'*' | b'.' => current.seq.push(b),
                b' ' | b'\t' | b'\r' => {}
                other => {
                    return Err(SyntaxError {
                        line: line_no,
                        issue: SyntaxIssue::InvalidByte(other),
                    });
                }
            }
        }
    }

    Ok(contigs)
}
