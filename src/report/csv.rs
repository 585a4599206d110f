use crate::core::error::ReportError;
use crate::core::model::{FeatureSchema, SampleMetrics, SampleTable};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `table` to `path` through a temporary sibling file and a rename, so
/// readers never observe a half-written report.
pub fn write(path: &Path, table: &SampleTable, schema: FeatureSchema) -> Result<(), ReportError> {
    let write_err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let tmp_path = tmp_path(path);
    let result = File::create(&tmp_path).and_then(|file| {
        let mut w = BufWriter::new(file);
        write_table(&mut w, table, schema)?;
        w.into_inner().map_err(|e| e.into_error())?.sync_all()
    });
    match result.and_then(|_| fs::rename(&tmp_path, path)) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(write_err(e))
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn write_table(w: &mut dyn Write, table: &SampleTable, schema: FeatureSchema) -> io::Result<()> {
    writeln!(w, "{}", schema.header())?;
    for sample in table {
        write_row(w, sample, schema)?;
    }
    Ok(())
}

fn write_row(w: &mut dyn Write, s: &SampleMetrics, schema: FeatureSchema) -> io::Result<()> {
    write!(
        w,
        "{},{},{},{},{},{},{},{}",
        escape(&s.name),
        s.total_length,
        s.num_contigs,
        s.longest_contig,
        s.n50,
        s.n75,
        s.l50,
        s.l75
    )?;
    if schema == FeatureSchema::Extended {
        write!(w, ",{},{}", s.n90, s.l90)?;
    }
    writeln!(w, ",{:.2}", s.gc_percent)
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Loads a report written by [`write`], in either layout.
pub fn read(path: &Path) -> Result<SampleTable, ReportError> {
    let text = fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text).map_err(|e| match e {
        ParseFailure::Header(header) => ReportError::Header {
            path: path.to_path_buf(),
            header,
        },
        ParseFailure::Row { line, reason } => ReportError::Row {
            path: path.to_path_buf(),
            line,
            reason,
        },
    })
}

#[derive(Debug)]
enum ParseFailure {
    Header(String),
    Row { line: usize, reason: String },
}

fn parse(text: &str) -> Result<SampleTable, ParseFailure> {
    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default();
    let schema = FeatureSchema::from_header(header)
        .ok_or_else(|| ParseFailure::Header(header.to_string()))?;
    let expected = schema.features().len();

    let mut samples = Vec::new();
    for (i, line) in lines.enumerate() {
        let line_no = i + 2;
        if line.trim().is_empty() {
            continue;
        }
        let row_err = |reason: String| ParseFailure::Row {
            line: line_no,
            reason,
        };
        let (name, rest) = split_name(line).map_err(row_err)?;
        let fields: Vec<&str> = rest.split(',').collect();
        if fields.len() != expected {
            return Err(row_err(format!(
                "expected {} feature columns, found {}",
                expected,
                fields.len()
            )));
        }
        let int = |idx: usize| -> Result<u64, ParseFailure> {
            fields[idx].trim().parse::<u64>().map_err(|e| {
                row_err(format!(
                    "{}: `{}`: {}",
                    schema.features()[idx].column(),
                    fields[idx],
                    e
                ))
            })
        };
        let (n90, l90) = match schema {
            FeatureSchema::Standard => (0, 0),
            FeatureSchema::Extended => (int(7)?, int(8)?),
        };
        let gc_field = fields[expected - 1].trim();
        let gc_percent = gc_field
            .parse::<f64>()
            .map_err(|e| row_err(format!("GC%: `{}`: {}", gc_field, e)))?;
        samples.push(SampleMetrics {
            name,
            total_length: int(0)?,
            num_contigs: int(1)?,
            longest_contig: int(2)?,
            n50: int(3)?,
            n75: int(4)?,
            l50: int(5)?,
            l75: int(6)?,
            n90,
            l90,
            gc_percent,
        });
    }
    Ok(SampleTable::new(schema, samples))
}

/// Splits off the (possibly quoted) first field.
fn split_name(line: &str) -> Result<(String, &str), String> {
    let Some(quoted) = line.strip_prefix('"') else {
        return line
            .split_once(',')
            .map(|(name, rest)| (name.to_string(), rest))
            .ok_or_else(|| "missing feature columns".to_string());
    };
    let mut name = String::new();
    let mut chars = quoted.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '"' {
            name.push(c);
            continue;
        }
        match quoted[i + 1..].chars().next() {
            Some('"') => {
                name.push('"');
                chars.next();
            }
            Some(',') => return Ok((name, &quoted[i + 2..])),
            _ => return Err("malformed quoted sample name".to_string()),
        }
    }
    Err("unterminated quoted sample name".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(name: &str, gc: f64) -> SampleMetrics {
        SampleMetrics {
            name: name.to_string(),
            total_length: 63,
            num_contigs: 3,
            longest_contig: 40,
            n50: 40,
            n75: 15,
            n90: 8,
            l50: 1,
            l75: 2,
            l90: 3,
            gc_percent: gc,
        }
    }

    fn render(table: &SampleTable, schema: FeatureSchema) -> String {
        let mut buf = Vec::new();
        write_table(&mut buf, table, schema).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn standard_layout() {
        let table = SampleTable::new(
            FeatureSchema::Extended,
            vec![sample("normal", 50.0), sample("odd", 33.333)],
        );
        assert_eq!(
            render(&table, FeatureSchema::Standard),
            "SampleName,TotalLength,NumContigs,LongestContig,N50,N75,L50,L75,GC%\n\
             normal,63,3,40,40,15,1,2,50.00\n\
             odd,63,3,40,40,15,1,2,33.33\n"
        );
    }

    #[test]
    fn extended_layout_inserts_n90_l90() {
        let table = SampleTable::new(FeatureSchema::Extended, vec![sample("normal", 25.0)]);
        let text = render(&table, FeatureSchema::Extended);
        assert_eq!(text.lines().nth(1), Some("normal,63,3,40,40,15,1,2,8,3,25.00"));
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let table = SampleTable::new(FeatureSchema::Extended, vec![sample("a,\"b\"", 75.0)]);
        let text = render(&table, FeatureSchema::Standard);
        assert!(text.contains("\"a,\"\"b\"\"\",63,"));
        let back = parse(&text).unwrap();
        assert_eq!(back.get("a,\"b\"").map(|s| s.gc_percent), Some(75.0));
    }

    #[test]
    fn write_then_read_restores_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("extracted_features.csv");
        let table = SampleTable::new(
            FeatureSchema::Extended,
            vec![sample("b", 50.0), sample("a", 12.5)],
        );
        write(&path, &table, FeatureSchema::Extended).unwrap();
        assert!(!dir.path().join("extracted_features.csv.tmp").exists());
        assert_eq!(read(&path).unwrap(), table);

        write(&path, &table, FeatureSchema::Standard).unwrap();
        let standard = read(&path).unwrap();
        assert_eq!(standard.schema(), FeatureSchema::Standard);
        assert_eq!(standard.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(standard.get("a").map(|s| (s.n90, s.l90)), Some((0, 0)));
    }

    #[test]
    fn write_into_missing_dir_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("extracted_features.csv");
        let table = SampleTable::new(FeatureSchema::Standard, vec![sample("a", 1.0)]);
        let err = write(&path, &table, FeatureSchema::Standard).unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
    }

    #[test]
    fn rejects_unknown_header_and_bad_rows() {
        assert!(matches!(parse("Sample,Foo\n"), Err(ParseFailure::Header(_))));
        assert!(matches!(parse(""), Err(ParseFailure::Header(_))));

        let header = FeatureSchema::Standard.header();
        match parse(&format!("{header}\na,1,2,3\n")) {
            Err(ParseFailure::Row { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected: {other:?}"),
        }
        match parse(&format!("{header}\na,1,1,1,1,1,1,1,1.0\nb,x,1,1,1,1,1,1,1.0\n")) {
            Err(ParseFailure::Row { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.starts_with("TotalLength"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn reads_legacy_float_formatting() {
        let text = format!("{}\nfifty_gc,4,1,4,4,4,1,1,50.0\n", FeatureSchema::Standard.header());
        let table = parse(&text).unwrap();
        assert_eq!(table.get("fifty_gc").map(|s| s.gc_percent), Some(50.0));
    }
}
