use crate::error::{DiagnosisError, DiagnosisResult};
use image::RgbImage;

/// Mean intensity per RGB channel, in the 0..=255 range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelMeans {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// A successfully decoded upload, converted to 8-bit RGB.
#[derive(Debug, Clone)]
pub struct LeafImage {
    pixels: RgbImage,
}

impl LeafImage {
    /// Decode raw upload bytes. Any format supported by `image` is accepted.
    pub fn decode(bytes: &[u8]) -> DiagnosisResult<Self> {
        if bytes.is_empty() {
            return Err(DiagnosisError::invalid_input("Empty file"));
        }

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| DiagnosisError::invalid_input(format!("Invalid image: {}", e)))?;

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(DiagnosisError::invalid_input(
                "Invalid image: zero-sized pixel grid",
            ));
        }

        Ok(Self::from_rgb(decoded.to_rgb8()))
    }

    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn channel_means(&self) -> ChannelMeans {
        let count = self.pixels.width() as u64 * self.pixels.height() as u64;
        if count == 0 {
            return ChannelMeans::default();
        }

        let mut sums = [0u64; 3];
        for pixel in self.pixels.pixels() {
            sums[0] += pixel[0] as u64;
            sums[1] += pixel[1] as u64;
            sums[2] += pixel[2] as u64;
        }

        let n = count as f64;
        ChannelMeans {
            red: sums[0] as f64 / n,
            green: sums[1] as f64 / n,
            blue: sums[2] as f64 / n,
        }
    }
}
