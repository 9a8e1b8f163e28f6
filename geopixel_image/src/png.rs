use anyhow::{Result, anyhow, bail};
use geopixel_derive::context;
use image::{
	DynamicImage, ImageEncoder, ImageFormat,
	codecs::png::{CompressionType, FilterType, PngEncoder},
	load_from_memory_with_format,
};
use std::path::Path;

/// Encodes an 8 or 16 bit image as PNG.
///
/// `speed` ranges from 0 (smallest file) to 100 (fastest), default 10.
pub fn encode_png(image: &DynamicImage, speed: Option<u8>) -> Result<Vec<u8>> {
	let bits = image.color().bits_per_pixel() / u16::from(image.color().channel_count());
	if bits != 8 && bits != 16 {
		bail!("png only supports 8 and 16 bit images");
	}

	let (compression_type, filter_type) = match speed.unwrap_or(10).min(100) {
		0..20 => (CompressionType::Best, FilterType::Adaptive),
		20..40 => (CompressionType::Default, FilterType::Adaptive),
		40..60 => (CompressionType::Default, FilterType::Paeth),
		60..80 => (CompressionType::Default, FilterType::Avg),
		80..90 => (CompressionType::Fast, FilterType::Avg),
		_ => (CompressionType::Fast, FilterType::NoFilter),
	};

	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new_with_quality(&mut buffer, compression_type, filter_type).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;
	Ok(buffer)
}

pub fn decode_png(data: &[u8]) -> Result<DynamicImage> {
	load_from_memory_with_format(data, ImageFormat::Png).map_err(|e| anyhow!("failed to decode PNG image: {e}"))
}

#[context("failed to write PNG {path:?}")]
pub fn write_png(image: &DynamicImage, path: &Path) -> Result<()> {
	log::debug!("write {}x{} PNG to {path:?}", image.width(), image.height());
	let data = encode_png(image, None)?;
	std::fs::write(path, data)?;
	Ok(())
}
