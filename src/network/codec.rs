//! Binary weight-file layout.
//!
//! ```text
//! i32               matrix count
//! per matrix:
//!   i32             rows
//!   i32             cols
//!   f64 * rows*cols entries, row-major
//! ```
//!
//! Every field is big-endian. There is no magic number and no version field.

use std::io::{ErrorKind, Read, Write};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Read buffer size used by [`WeightReader::new`].
pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024;

const INT_BYTES: usize = 4;
const DOUBLE_BYTES: usize = 8;

/// Writes `weights` in the binary layout. The caller owns buffering and flushing.
pub fn encode<W: Write>(mut writer: W, weights: &[Matrix]) -> Result<()> {
    writer.write_all(&to_format_int(weights.len(), "matrix count")?.to_be_bytes())?;
    for matrix in weights {
        writer.write_all(&to_format_int(matrix.rows(), "row count")?.to_be_bytes())?;
        writer.write_all(&to_format_int(matrix.cols(), "column count")?.to_be_bytes())?;
        for value in matrix.as_slice() {
            writer.write_all(&value.to_be_bytes())?;
        }
    }
    Ok(())
}

/// Reads a full matrix list from `reader` through a [`WeightReader`].
pub fn decode<R: Read>(reader: R) -> Result<Vec<Matrix>> {
    WeightReader::new(reader).read_weights()
}

fn to_format_int(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        Error::invalid_argument(format!("{} {} does not fit the weight format", what, value))
    })
}

/// Streaming decoder over a bounded buffer.
///
/// The buffer is refilled from the source whenever fewer bytes remain than
/// the next field needs, so decoding does not depend on how the source
/// chunks its data.
pub struct WeightReader<R> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    end: usize,
    consumed: u64,
}

impl<R: Read> WeightReader<R> {
    pub fn new(inner: R) -> WeightReader<R> {
        WeightReader::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    /// Capacity is raised to at least one `f64` so any single field fits.
    pub fn with_capacity(capacity: usize, inner: R) -> WeightReader<R> {
        WeightReader {
            inner,
            buf: vec![0u8; capacity.max(DOUBLE_BYTES)].into_boxed_slice(),
            pos: 0,
            end: 0,
            consumed: 0,
        }
    }

    /// Reads the matrix count followed by that many matrices.
    pub fn read_weights(&mut self) -> Result<Vec<Matrix>> {
        let count = self.read_i32()?;
        if count <= 0 {
            return Err(Error::invalid_format(format!(
                "matrix count must be positive, was {}",
                count
            )));
        }
        let mut weights = Vec::with_capacity((count as usize).min(64));
        for _ in 0..count {
            weights.push(self.read_matrix()?);
        }
        Ok(weights)
    }

    /// Reads one `rows, cols, entries` record.
    pub fn read_matrix(&mut self) -> Result<Matrix> {
        let rows = self.read_dimension("row")?;
        let cols = self.read_dimension("column")?;
        let len = rows.checked_mul(cols).ok_or_else(|| {
            Error::invalid_format(format!("matrix of {}x{} entries overflows", rows, cols))
        })?;

        // Grow with the payload rather than trusting the header for the allocation.
        let mut data = Vec::with_capacity(len.min(self.buf.len() / DOUBLE_BYTES));
        for _ in 0..len {
            data.push(self.read_f64()?);
        }
        Matrix::from_vec(rows, cols, data)
            .ok_or_else(|| Error::invalid_format("matrix payload length mismatch"))
    }

    fn read_dimension(&mut self, what: &str) -> Result<usize> {
        let value = self.read_i32()?;
        if value <= 0 {
            return Err(Error::invalid_format(format!(
                "{} count must be positive, was {}",
                what, value
            )));
        }
        Ok(value as usize)
    }

    fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take::<INT_BYTES>()?;
        Ok(i32::from_be_bytes(bytes))
    }

    fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.take::<DOUBLE_BYTES>()?;
        Ok(f64::from_be_bytes(bytes))
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.fill(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        self.consumed += N as u64;
        Ok(out)
    }

    /// Ensures at least `needed` unread bytes are buffered, compacting first.
    fn fill(&mut self, needed: usize) -> Result<()> {
        if self.end - self.pos >= needed {
            return Ok(());
        }
        self.buf.copy_within(self.pos..self.end, 0);
        self.end -= self.pos;
        self.pos = 0;

        while self.end < needed {
            match self.inner.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    return Err(Error::invalid_format(format!(
                        "unexpected end of stream after {} bytes, needed {} more",
                        self.consumed + self.end as u64,
                        needed - self.end
                    )))
                }
                Ok(n) => self.end += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn encodes_documented_layout() {
        let m = Matrix::from_vec(1, 2, vec![1.0, -2.5]).unwrap();
        let mut bytes = Vec::new();
        encode(&mut bytes, &[m]).unwrap();

        let mut expected = header(&[1, 1, 2]);
        expected.extend_from_slice(&1.0f64.to_be_bytes());
        expected.extend_from_slice(&(-2.5f64).to_be_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn rejects_zero_matrix_count() {
        let err = decode(&header(&[0])[..]).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn rejects_negative_columns() {
        let err = decode(&header(&[1, 2, -3])[..]).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn truncated_header_is_invalid_format() {
        let err = decode(&[0u8, 0, 0][..]).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn huge_declared_matrix_fails_without_allocating_it() {
        let err = decode(&header(&[1, i32::MAX, i32::MAX])[..]).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn small_buffer_refills_across_fields() {
        let m = Matrix::from_vec(2, 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let mut bytes = Vec::new();
        encode(&mut bytes, &[m.clone()]).unwrap();

        let mut reader = WeightReader::with_capacity(1, &bytes[..]);
        let weights = reader.read_weights().unwrap();
        assert_eq!(weights, vec![m]);
    }
}
