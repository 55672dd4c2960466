use std::fmt;

/// Divisor applied to raw pixel bytes when building input vectors.
pub const PIXEL_SCALE: f64 = 200.0;

/// One labelled image, pixels row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MnistSample {
    pub label: u8,
    pub width: usize,
    pub pixels: Vec<u8>,
}

impl MnistSample {
    /// Pixels scaled by [`PIXEL_SCALE`].
    pub fn input(&self) -> Vec<f64> {
        self.pixels.iter().map(|&p| p as f64 / PIXEL_SCALE).collect()
    }

    /// One-hot target of length `classes`, or `None` if the label is out of range.
    pub fn target(&self, classes: usize) -> Option<Vec<f64>> {
        let label = self.label as usize;
        if label >= classes {
            return None;
        }
        let mut one_hot = vec![0.0; classes];
        one_hot[label] = 1.0;
        Some(one_hot)
    }
}

/// Four-level ASCII rendering, one text line per pixel row.
impl fmt::Display for MnistSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SHADES: [char; 4] = [' ', ':', '*', '#'];
        for row in self.pixels.chunks(self.width.max(1)) {
            for &p in row {
                write!(f, "{}", SHADES[p as usize * SHADES.len() / 256])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
