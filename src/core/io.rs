use flate2::read::MultiGzDecoder;
use gzp::deflate::{Bgzf, Mgzip};
use gzp::par::decompress::ParDecompressBuilder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

const GZIP_READ_BUF: usize = 1024 * 1024;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

/// Whole-file contents, mapped for plain files and decompressed into memory
/// for gzip.
pub enum SequenceBytes {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl SequenceBytes {
    pub fn bytes(&self) -> &[u8] {
        match self {
            SequenceBytes::Mapped(mmap) => &mmap[..],
            SequenceBytes::Owned(data) => data.as_slice(),
        }
    }
}

pub fn read_sequence_bytes(path: &Path, threads: usize) -> io::Result<SequenceBytes> {
    match detect_input_kind(path)? {
        InputKind::Plain => {
            let file = File::open(path)?;
            if file.metadata()?.len() == 0 {
                return Ok(SequenceBytes::Owned(Vec::new()));
            }
            // SAFETY: read-only file mapping.
            let mmap = unsafe { Mmap::map(&file) }?;
            Ok(SequenceBytes::Mapped(mmap))
        }
        InputKind::Gzip => {
            let mut reader = open_gzip_reader(path, threads)?;
            let mut data = Vec::with_capacity(GZIP_READ_BUF);
            reader.read_to_end(&mut data)?;
            Ok(SequenceBytes::Owned(data))
        }
    }
}

pub fn detect_input_kind(path: &Path) -> io::Result<InputKind> {
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        if ext.eq_ignore_ascii_case("gz") {
            return Ok(InputKind::Gzip);
        }
    }
    let mut file = File::open(path)?;
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    if n == 2 && magic == [0x1f, 0x8b] {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GzipVariant {
    Standard,
    Mgzip,
    Bgzf,
}

fn detect_gzip_variant(path: &Path) -> io::Result<GzipVariant> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 20];
    let n = file.read(&mut header)?;
    if n < 14 || header[0] != 0x1f || header[1] != 0x8b {
        return Ok(GzipVariant::Standard);
    }
    // FEXTRA carries the block subfield id for BGZF/MGZIP.
    if header[3] & 4 == 0 {
        return Ok(GzipVariant::Standard);
    }
    match (header[12], header[13]) {
        (b'B', b'C') => Ok(GzipVariant::Bgzf),
        (b'I', b'G') => Ok(GzipVariant::Mgzip),
        _ => Ok(GzipVariant::Standard),
    }
}

pub fn open_gzip_reader(path: &Path, threads: usize) -> io::Result<Box<dyn Read + Send>> {
    let variant = detect_gzip_variant(path)?;
    let reader = BufReader::new(File::open(path)?);
    let reader: Box<dyn Read + Send> = match variant {
        GzipVariant::Bgzf if threads > 1 => Box::new(
            ParDecompressBuilder::<Bgzf>::new()
                .num_threads(threads)
                .map_err(io::Error::other)?
                .from_reader(reader),
        ),
        GzipVariant::Mgzip if threads > 1 => Box::new(
            ParDecompressBuilder::<Mgzip>::new()
                .num_threads(threads)
                .map_err(io::Error::other)?
                .from_reader(reader),
        ),
        _ => Box::new(MultiGzDecoder::new(reader)),
    };
    Ok(reader)
}
