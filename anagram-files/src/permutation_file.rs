//! Reading and writing permutation files.
//!
//! Two encodings are understood: NumPy `.npy` arrays (what the permutation
//! generators emit) and a plain JSON array of integers.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use anagram_core::{CoreError, Permutation};

use crate::error::FileError;

const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";
/// Header blocks are padded so the data starts on this boundary.
const NPY_ALIGN: usize = 64;

/// Load and validate a permutation from `path`, choosing the decoder by
/// extension (`.npy` or `.json`).
pub fn read_permutation(path: &Path) -> crate::Result<Permutation> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let raw = match ext.as_deref() {
        Some("npy") => parse_npy(&fs::read(path)?)?,
        Some("json") => serde_json::from_slice::<Vec<i64>>(&fs::read(path)?)?,
        _ => {
            return Err(FileError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };
    let permutation = Permutation::from_indices(&raw)?;
    info!(
        "Read {}×{} permutation from {}",
        permutation.side(),
        permutation.side(),
        path.display()
    );
    Ok(permutation)
}

/// Write `permutation` as a little-endian `int64` NPY file.
pub fn write_npy(path: &Path, permutation: &Permutation) -> crate::Result<()> {
    let values: Vec<i64> = permutation
        .forward_table()
        .iter()
        .map(|&v| v as i64)
        .collect();
    fs::write(path, encode_npy(&values))?;
    debug!("Wrote {} indices to {}", values.len(), path.display());
    Ok(())
}

/// Encode a 1-D `int64` array in NPY format version 1.0.
pub fn encode_npy(values: &[i64]) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '<i8', 'fortran_order': False, 'shape': ({},), }}",
        values.len()
    );
    // magic(6) + version(2) + header_len(2) + header + '\n'
    let unpadded = NPY_MAGIC.len() + 4 + header.len() + 1;
    let padding = (NPY_ALIGN - unpadded % NPY_ALIGN) % NPY_ALIGN;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');

    let mut out = Vec::with_capacity(NPY_MAGIC.len() + 4 + header.len() + values.len() * 8);
    out.extend_from_slice(NPY_MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Integer element type of an NPY array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dtype {
    signed: bool,
    size: usize,
    big_endian: bool,
}

impl Dtype {
    fn parse(descr: &str) -> crate::Result<Self> {
        let mut chars = descr.chars();
        let (order, kind) = (chars.next(), chars.next());
        let size: usize = chars
            .as_str()
            .parse()
            .map_err(|_| npy(format!("unsupported dtype '{descr}'")))?;
        let big_endian = match order {
            Some('<') | Some('|') | Some('=') => false,
            Some('>') => true,
            _ => return Err(npy(format!("unsupported dtype '{descr}'"))),
        };
        let signed = match kind {
            Some('i') => true,
            Some('u') => false,
            _ => return Err(npy(format!("dtype '{descr}' is not an integer type"))),
        };
        if !matches!(size, 1 | 2 | 4 | 8) {
            return Err(npy(format!("unsupported integer width in '{descr}'")));
        }
        Ok(Self {
            signed,
            size,
            big_endian,
        })
    }

    fn decode(&self, bytes: &[u8]) -> Option<i64> {
        let mut buf = [0u8; 8];
        if self.big_endian {
            buf[8 - self.size..].copy_from_slice(bytes);
            buf.reverse();
        } else {
            buf[..self.size].copy_from_slice(bytes);
        }
        let unsigned = u64::from_le_bytes(buf);
        if self.signed {
            // Sign-extend from `size` bytes.
            let shift = 64 - 8 * self.size as u32;
            Some(((unsigned << shift) as i64) >> shift)
        } else {
            i64::try_from(unsigned).ok()
        }
    }
}

/// Decode a 1-D integer NPY array into `i64` values.
///
/// A multi-dimensional array is reported as an invalid permutation, since
/// the file itself is well-formed.
pub fn parse_npy(bytes: &[u8]) -> crate::Result<Vec<i64>> {
    if bytes.len() < 10 || &bytes[..6] != NPY_MAGIC {
        return Err(npy("missing NPY magic"));
    }
    let (header_len, header_start) = match bytes[6] {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(npy("truncated header"));
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
            (len as usize, 12)
        }
        v => return Err(npy(format!("unsupported format version {v}"))),
    };
    let data_start = header_start + header_len;
    let header = bytes
        .get(header_start..data_start)
        .ok_or_else(|| npy("truncated header"))?;
    let header = std::str::from_utf8(header).map_err(|_| npy("header is not UTF-8"))?;

    let dtype = Dtype::parse(quoted_value(header, "descr")?)?;
    let shape = shape_value(header)?;
    if shape.len() != 1 {
        return Err(CoreError::InvalidPermutation {
            reason: format!("must be a 1D array, got shape {shape:?}"),
        }
        .into());
    }
    let count = shape[0];

    let data = &bytes[data_start..];
    let needed = count
        .checked_mul(dtype.size)
        .ok_or_else(|| npy("shape is too large"))?;
    if data.len() < needed {
        return Err(npy(format!(
            "expected {needed} data bytes, found {}",
            data.len()
        )));
    }
    data[..needed]
        .chunks_exact(dtype.size)
        .map(|chunk| {
            dtype
                .decode(chunk)
                .ok_or_else(|| npy("value does not fit in a signed 64-bit integer"))
        })
        .collect()
}

/// Text following `'key':` in the header dictionary.
fn raw_value<'a>(header: &'a str, key: &str) -> crate::Result<&'a str> {
    let needle = format!("'{key}':");
    let at = header
        .find(&needle)
        .ok_or_else(|| npy(format!("header has no '{key}' entry")))?;
    Ok(header[at + needle.len()..].trim_start())
}

fn quoted_value<'a>(header: &'a str, key: &str) -> crate::Result<&'a str> {
    let rest = raw_value(header, key)?;
    let rest = rest
        .strip_prefix('\'')
        .ok_or_else(|| npy(format!("'{key}' is not a string")))?;
    let end = rest
        .find('\'')
        .ok_or_else(|| npy(format!("unterminated '{key}' value")))?;
    Ok(&rest[..end])
}

fn shape_value(header: &str) -> crate::Result<Vec<usize>> {
    let rest = raw_value(header, "shape")?;
    let inner = rest
        .strip_prefix('(')
        .and_then(|r| r.split_once(')'))
        .map(|(inner, _)| inner)
        .ok_or_else(|| npy("'shape' is not a tuple"))?;
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| npy(format!("bad shape dimension '{s}'")))
        })
        .collect()
}

fn npy(reason: impl Into<String>) -> FileError {
    FileError::Npy {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npy_with(descr: &str, shape: &str, data: &[u8]) -> Vec<u8> {
        let header =
            format!("{{'descr': '{descr}', 'fortran_order': False, 'shape': {shape}, }}\n");
        let mut out = NPY_MAGIC.to_vec();
        out.extend_from_slice(&[1, 0]);
        out.extend_from_slice(&(header.len() as u16).to_le_bytes());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn encoded_header_is_aligned() {
        let bytes = encode_npy(&[3, 1, 2, 0]);
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        assert_eq!((10 + header_len) % NPY_ALIGN, 0);
        assert_eq!(bytes[10 + header_len - 1], b'\n');
        assert_eq!(parse_npy(&bytes).unwrap(), vec![3, 1, 2, 0]);
    }

    #[test]
    fn parses_small_and_big_endian_dtypes() {
        let little = npy_with("<i4", "(2,)", &[1, 0, 0, 0, 0, 1, 0, 0]);
        assert_eq!(parse_npy(&little).unwrap(), vec![1, 256]);

        let big = npy_with(">u2", "(2,)", &[0, 3, 1, 0]);
        assert_eq!(parse_npy(&big).unwrap(), vec![3, 256]);

        let bytes = npy_with("|i1", "(2,)", &[0xff, 0x02]);
        assert_eq!(parse_npy(&bytes).unwrap(), vec![-1, 2]);
    }

    #[test]
    fn rejects_two_dimensional_arrays() {
        let bytes = npy_with("<i8", "(2, 2)", &[0u8; 32]);
        assert!(matches!(
            parse_npy(&bytes),
            Err(FileError::Core(CoreError::InvalidPermutation { .. }))
        ));
    }

    #[test]
    fn rejects_float_dtype_and_bad_magic() {
        let bytes = npy_with("<f8", "(1,)", &[0u8; 8]);
        assert!(matches!(parse_npy(&bytes), Err(FileError::Npy { .. })));
        assert!(matches!(parse_npy(b"not an npy file"), Err(FileError::Npy { .. })));
    }

    #[test]
    fn rejects_truncated_data() {
        let bytes = npy_with("<i8", "(4,)", &[0u8; 16]);
        assert!(matches!(parse_npy(&bytes), Err(FileError::Npy { .. })));
    }
}
