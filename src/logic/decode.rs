use anyhow::{Context, Result};
use clap::ValueEnum;
use image::io::Reader as ImageReader;
use image::DynamicImage;
use ndarray::{Array2, Array3, ArrayD};
use std::path::Path;

/// How decoded pixels are interpreted before they are stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// 8-bit luminance, written as MONOCHROME2
    #[default]
    #[value(alias = "grayscale")]
    Greyscale,
    /// 8-bit RGB with any alpha dropped
    Rgb,
}

/// Decode the image at `path` into a row-major pixel array.
///
/// The shape is `[rows, columns]` in greyscale mode and
/// `[rows, columns, 3]` in RGB mode.
pub fn decode_image(path: &Path, mode: ColorMode) -> Result<ArrayD<u8>> {
    let image = ImageReader::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read image {}", path.display()))?
        .decode()
        .with_context(|| format!("Failed to decode image {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "image decoded"
    );

    to_pixel_array(&image, mode)
}

fn to_pixel_array(image: &DynamicImage, mode: ColorMode) -> Result<ArrayD<u8>> {
    let rows = image.height() as usize;
    let columns = image.width() as usize;

    let array = match mode {
        ColorMode::Greyscale => {
            Array2::from_shape_vec((rows, columns), image.to_luma8().into_raw())
                .context("Luminance buffer does not match image dimensions")?
                .into_dyn()
        }
        ColorMode::Rgb => Array3::from_shape_vec((rows, columns, 3), image.to_rgb8().into_raw())
            .context("RGB buffer does not match image dimensions")?
            .into_dyn(),
    };
    Ok(array)
}
