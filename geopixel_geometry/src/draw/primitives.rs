use geopixel_core::Color;
use imageproc::{
	drawing::{draw_line_segment_mut, draw_polygon_mut},
	image::{Rgba, RgbaImage},
	point::Point,
};

fn to_i32(value: i64) -> i32 {
	value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Sets a single pixel; positions outside the image are ignored.
pub fn draw_pixel(image: &mut RgbaImage, (x, y): (i64, i64), color: Color) {
	if x < 0 || y < 0 || x >= i64::from(image.width()) || y >= i64::from(image.height()) {
		return;
	}
	image.put_pixel(x as u32, y as u32, Rgba(color.0));
}

pub fn draw_segment(image: &mut RgbaImage, start: (i64, i64), end: (i64, i64), color: Color) {
	if start == end {
		draw_pixel(image, start, color);
		return;
	}
	draw_line_segment_mut(
		image,
		(start.0 as f32, start.1 as f32),
		(end.0 as f32, end.1 as f32),
		Rgba(color.0),
	);
}

/// Fills the ring through `points` (closing point optional) including its outline.
///
/// Consecutive duplicates are removed first; rings that collapse to one or two pixels are
/// drawn as a pixel or a segment.
pub fn fill_ring(image: &mut RgbaImage, points: &[(i64, i64)], color: Color) {
	let mut ring: Vec<(i64, i64)> = Vec::with_capacity(points.len());
	for point in points {
		if ring.last() != Some(point) {
			ring.push(*point);
		}
	}
	while ring.len() > 1 && ring.first() == ring.last() {
		ring.pop();
	}

	match ring.len() {
		0 => {}
		1 => draw_pixel(image, ring[0], color),
		2 => draw_segment(image, ring[0], ring[1], color),
		_ => {
			let polygon = ring
				.iter()
				.map(|(x, y)| Point::new(to_i32(*x), to_i32(*y)))
				.collect::<Vec<_>>();
			draw_polygon_mut(image, &polygon, Rgba(color.0));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const RED: Color = Color::new(255, 0, 0, 255);

	fn count(image: &RgbaImage, color: Color) -> usize {
		image.pixels().filter(|p| p.0 == color.0).count()
	}

	#[test]
	fn pixel_outside_is_ignored() {
		let mut image = RgbaImage::new(4, 4);
		draw_pixel(&mut image, (-1, 0), RED);
		draw_pixel(&mut image, (4, 0), RED);
		draw_pixel(&mut image, (3, 3), RED);
		assert_eq!(count(&image, RED), 1);
		assert_eq!(image.get_pixel(3, 3).0, RED.0);
	}

	#[test]
	fn horizontal_segment() {
		let mut image = RgbaImage::new(8, 4);
		draw_segment(&mut image, (1, 2), (6, 2), RED);
		assert_eq!(count(&image, RED), 6);
		assert!((1..=6).all(|x| image.get_pixel(x, 2).0 == RED.0));
	}

	#[test]
	fn filled_square() {
		let mut image = RgbaImage::new(10, 10);
		fill_ring(&mut image, &[(2, 2), (6, 2), (6, 6), (2, 6), (2, 2)], RED);
		assert_eq!(count(&image, RED), 25);
		assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0, 0]);
	}

	#[test]
	fn degenerate_rings() {
		let mut image = RgbaImage::new(10, 10);
		fill_ring(&mut image, &[(3, 3), (3, 3), (3, 3), (3, 3)], RED);
		assert_eq!(count(&image, RED), 1);

		let mut image = RgbaImage::new(10, 10);
		fill_ring(&mut image, &[(1, 1), (4, 1), (1, 1), (1, 1)], RED);
		assert_eq!(count(&image, RED), 4);

		let mut image = RgbaImage::new(10, 10);
		fill_ring(&mut image, &[], RED);
		assert_eq!(count(&image, RED), 0);
	}
}
