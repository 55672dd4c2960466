//! IDX headers as used by the MNIST image and label files.
//!
//! ```text
//! image file: i32 magic (0x0803), i32 count, i32 height, i32 width
//! label file: i32 magic (0x0801), i32 count
//! ```
//!
//! All fields are big-endian.

use std::io::{ErrorKind, Read};

use crate::error::{Error, Result};

pub const IMAGE_MAGIC: i32 = 0x0803;
pub const LABEL_MAGIC: i32 = 0x0801;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub count: usize,
    pub height: usize,
    pub width: usize,
}

impl ImageHeader {
    pub fn read<R: Read>(reader: &mut R) -> Result<ImageHeader> {
        let [magic, count, height, width] = read_fields::<R, 4>(reader, "image")?;
        check_magic("image", IMAGE_MAGIC, magic)?;
        if count < 0 {
            return Err(Error::invalid_format(format!("illegal image count {}", count)));
        }
        if height < 1 {
            return Err(Error::invalid_format(format!("illegal image height {}", height)));
        }
        if width < 1 {
            return Err(Error::invalid_format(format!("illegal image width {}", width)));
        }
        if (height as usize).checked_mul(width as usize).is_none() {
            return Err(Error::invalid_format(format!(
                "image of {}x{} pixels overflows",
                height, width
            )));
        }
        Ok(ImageHeader {
            count: count as usize,
            height: height as usize,
            width: width as usize,
        })
    }

    /// Bytes per image.
    pub fn image_size(&self) -> usize {
        self.height * self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelHeader {
    pub count: usize,
}

impl LabelHeader {
    pub fn read<R: Read>(reader: &mut R) -> Result<LabelHeader> {
        let [magic, count] = read_fields::<R, 2>(reader, "label")?;
        check_magic("label", LABEL_MAGIC, magic)?;
        if count < 0 {
            return Err(Error::invalid_format(format!("negative label count {}", count)));
        }
        Ok(LabelHeader {
            count: count as usize,
        })
    }
}

fn read_fields<R: Read, const N: usize>(reader: &mut R, what: &str) -> Result<[i32; N]> {
    let mut fields = [0i32; N];
    let mut buf = [0u8; 4];
    for field in fields.iter_mut() {
        reader.read_exact(&mut buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => {
                Error::invalid_format(format!("corrupted {} file header", what))
            }
            _ => Error::Io(e),
        })?;
        *field = i32::from_be_bytes(buf);
    }
    Ok(fields)
}

fn check_magic(what: &str, expected: i32, actual: i32) -> Result<()> {
    if actual != expected {
        return Err(Error::invalid_format(format!(
            "{} file: expected magic number {:#x}, was {:#x}",
            what, expected, actual
        )));
    }
    Ok(())
}
