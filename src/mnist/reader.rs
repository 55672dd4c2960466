use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::mnist::header::{ImageHeader, LabelHeader};
use crate::mnist::sample::MnistSample;

const IMAGE_BUFFER_SIZE: usize = 256 * 1024;
const LABEL_BUFFER_SIZE: usize = 16 * 1024;

/// Lazily yields labelled images from a pair of IDX streams.
///
/// Both headers are validated when the iterator is built; samples are read
/// one at a time afterwards. After the first error the iterator is exhausted.
pub struct MnistSamples<I, L> {
    images: I,
    labels: L,
    header: ImageHeader,
    remaining: usize,
}

impl MnistSamples<BufReader<File>, BufReader<File>> {
    /// Opens an image file and its matching label file.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(images: P, labels: Q) -> Result<Self> {
        let mut images = File::open(images)?;
        let labels = File::open(labels)?;
        let header = ImageHeader::read(&mut images)?;
        // Round the image buffer to whole images, unless one image alone exceeds it.
        let size = header.image_size();
        let capacity = if size <= IMAGE_BUFFER_SIZE {
            (IMAGE_BUFFER_SIZE + size - 1) / size * size
        } else {
            IMAGE_BUFFER_SIZE
        };
        let images = BufReader::with_capacity(capacity, images);
        let labels = BufReader::with_capacity(LABEL_BUFFER_SIZE, labels);
        MnistSamples::with_image_header(images, labels, header)
    }
}

impl<I: Read, L: Read> MnistSamples<I, L> {
    /// Reads both headers from already opened streams.
    pub fn from_readers(mut images: I, labels: L) -> Result<Self> {
        let header = ImageHeader::read(&mut images)?;
        MnistSamples::with_image_header(images, labels, header)
    }

    fn with_image_header(images: I, mut labels: L, header: ImageHeader) -> Result<Self> {
        let label_header = LabelHeader::read(&mut labels)?;
        if label_header.count != header.count {
            return Err(Error::invalid_format(format!(
                "inconsistent files: {} images but {} labels",
                header.count, label_header.count
            )));
        }
        debug!(
            count = header.count,
            height = header.height,
            width = header.width,
            "opened mnist sample streams"
        );
        Ok(MnistSamples {
            images,
            labels,
            header,
            remaining: header.count,
        })
    }

    pub fn header(&self) -> ImageHeader {
        self.header
    }

    fn read_sample(&mut self) -> Result<MnistSample> {
        let mut label = [0u8; 1];
        read_payload(&mut self.labels, &mut label, "label")?;
        // The header size is untrusted; grow with the bytes actually present.
        let size = self.header.image_size();
        let mut pixels = Vec::with_capacity(size.min(IMAGE_BUFFER_SIZE));
        (&mut self.images).take(size as u64).read_to_end(&mut pixels)?;
        if pixels.len() < size {
            return Err(Error::invalid_format(
                "image file ends before its declared count",
            ));
        }
        Ok(MnistSample {
            label: label[0],
            width: self.header.width,
            pixels,
        })
    }
}

fn read_payload<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => {
            Error::invalid_format(format!("{} file ends before its declared count", what))
        }
        _ => Error::Io(e),
    })
}

impl<I: Read, L: Read> Iterator for MnistSamples<I, L> {
    type Item = Result<MnistSample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let sample = self.read_sample();
        self.remaining = if sample.is_ok() { self.remaining - 1 } else { 0 };
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I: Read, L: Read> ExactSizeIterator for MnistSamples<I, L> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnist::header::{IMAGE_MAGIC, LABEL_MAGIC};

    fn image_file(count: i32, height: i32, width: i32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes: Vec<u8> = [IMAGE_MAGIC, count, height, width]
            .iter()
            .flat_map(|f| f.to_be_bytes())
            .collect();
        bytes.extend_from_slice(pixels);
        bytes
    }

    fn label_file(count: i32, labels: &[u8]) -> Vec<u8> {
        let mut bytes: Vec<u8> = [LABEL_MAGIC, count].iter().flat_map(|f| f.to_be_bytes()).collect();
        bytes.extend_from_slice(labels);
        bytes
    }

    #[test]
    fn yields_every_sample_in_order() {
        let images = image_file(2, 1, 2, &[1, 2, 3, 4]);
        let labels = label_file(2, &[7, 9]);
        let samples: Vec<_> = MnistSamples::from_readers(&images[..], &labels[..])
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label, 7);
        assert_eq!(samples[1].pixels, vec![3, 4]);
    }

    #[test]
    fn reports_exact_size() {
        let images = image_file(2, 1, 1, &[1, 2]);
        let labels = label_file(2, &[0, 1]);
        let mut samples = MnistSamples::from_readers(&images[..], &labels[..]).unwrap();
        assert_eq!(samples.len(), 2);
        samples.next();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let images = image_file(2, 1, 1, &[1, 2]);
        let labels = label_file(3, &[0, 1, 2]);
        let err = MnistSamples::from_readers(&images[..], &labels[..]).err().unwrap();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn truncated_images_stop_the_iterator() {
        let images = image_file(2, 2, 2, &[1, 2, 3, 4, 5]);
        let labels = label_file(2, &[0, 1]);
        let mut samples = MnistSamples::from_readers(&images[..], &labels[..]).unwrap();
        assert!(samples.next().unwrap().is_ok());
        assert!(matches!(samples.next(), Some(Err(Error::InvalidFormat(_)))));
        assert!(samples.next().is_none());
    }

    #[test]
    fn huge_declared_image_is_invalid_format() {
        let dir = tempfile::tempdir().unwrap();
        let images_path = dir.path().join("images-idx3-ubyte");
        let labels_path = dir.path().join("labels-idx1-ubyte");
        std::fs::write(&images_path, image_file(1, 1 << 30, 1 << 30, &[0; 16])).unwrap();
        std::fs::write(&labels_path, label_file(1, &[3])).unwrap();

        let mut samples = MnistSamples::open(&images_path, &labels_path).unwrap();
        assert!(matches!(samples.next(), Some(Err(Error::InvalidFormat(_)))));
        assert!(samples.next().is_none());
    }

    #[test]
    fn open_reads_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let images_path = dir.path().join("images-idx3-ubyte");
        let labels_path = dir.path().join("labels-idx1-ubyte");
        std::fs::write(&images_path, image_file(1, 2, 2, &[0, 64, 128, 255])).unwrap();
        std::fs::write(&labels_path, label_file(1, &[5])).unwrap();

        let mut samples = MnistSamples::open(&images_path, &labels_path).unwrap();
        let sample = samples.next().unwrap().unwrap();
        assert_eq!(sample.label, 5);
        assert_eq!(sample.width, 2);
        assert!(samples.next().is_none());
    }
}
