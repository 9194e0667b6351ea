use egui::{Color32, Pos2, Vec2, vec2};
use image::{Rgba, RgbaImage, imageops};

use super::path::stroke_triangles;
use super::{CanvasState, PaintState, Surface, SubPath, dedup_points, effective_rgba};

/// Pixel surface backed by an RGBA image.
///
/// Coverage is sampled once at each pixel centre with the non-zero winding
/// rule and no anti-aliasing, so the same calls always produce the same bytes.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    background: Rgba<u8>,
    state: CanvasState,
}

impl RasterSurface {
    /// Transparent surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Color32::TRANSPARENT)
    }

    /// Surface of the given size filled with `background`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_background(width: u32, height: u32, background: Color32) -> Self {
        assert!(
            width > 0 && height > 0,
            "raster surface needs a non-empty size, got {width}x{height}"
        );
        let background = Rgba(background.to_srgba_unmultiplied());
        Self {
            pixels: RgbaImage::from_pixel(width, height, background),
            background,
            state: CanvasState::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Unmultiplied RGBA of one pixel; `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// PNG encoding of the current pixels, for exporting a flattened scene
    pub fn encode_png(&self) -> image::ImageResult<Vec<u8>> {
        let mut bytes = std::io::Cursor::new(Vec::new());
        self.pixels.write_to(&mut bytes, image::ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    /// Number of pixels that differ from the background
    pub fn painted_pixel_count(&self) -> usize {
        self.pixels.pixels().filter(|p| **p != self.background).count()
    }

    fn fill_polygons(&mut self, polygons: &[Vec<Pos2>], rgba: [u8; 4]) {
        if rgba[3] == 0 {
            return;
        }

        let edges: Vec<(Pos2, Pos2)> = polygons
            .iter()
            .filter(|poly| poly.len() >= 3 && poly.iter().all(|p| p.x.is_finite() && p.y.is_finite()))
            .flat_map(|poly| {
                poly.iter()
                    .zip(poly.iter().cycle().skip(1))
                    .map(|(&a, &b)| (a, b))
            })
            .filter(|(a, b)| a.y != b.y)
            .collect();
        if edges.is_empty() {
            return;
        }

        let (min_y, max_y) = edges.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (a, b)| {
            (lo.min(a.y).min(b.y), hi.max(a.y).max(b.y))
        });
        let height = self.pixels.height() as i64;
        let width = self.pixels.width() as i64;
        let first_row = ((min_y - 0.5).ceil() as i64).max(0);
        let last_row = ((max_y - 0.5).floor() as i64).min(height - 1);

        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for row in first_row..=last_row {
            let sample_y = row as f32 + 0.5;
            crossings.clear();
            for (a, b) in &edges {
                let direction = if a.y <= sample_y && b.y > sample_y {
                    1
                } else if b.y <= sample_y && a.y > sample_y {
                    -1
                } else {
                    continue;
                };
                let x = a.x + (sample_y - a.y) * (b.x - a.x) / (b.y - a.y);
                crossings.push((x, direction));
            }
            crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

            let mut winding = 0;
            let mut span_start = 0.0;
            for &(x, direction) in &crossings {
                let before = winding;
                winding += direction;
                if before == 0 && winding != 0 {
                    span_start = x;
                } else if before != 0 && winding == 0 {
                    let from = ((span_start - 0.5).ceil() as i64).max(0);
                    let to = ((x - 0.5).ceil() as i64).min(width);
                    for column in from..to {
                        blend(self.pixels.get_pixel_mut(column as u32, row as u32), rgba);
                    }
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    type Snapshot = RgbaImage;

    fn size(&self) -> Vec2 {
        vec2(self.pixels.width() as f32, self.pixels.height() as f32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        assert!(
            width > 0 && height > 0,
            "raster surface needs a non-empty size, got {width}x{height}"
        );
        self.pixels = RgbaImage::from_pixel(width, height, self.background);
        self.state.reset();
    }

    fn canvas_state(&self) -> &CanvasState {
        &self.state
    }

    fn canvas_state_mut(&mut self) -> &mut CanvasState {
        &mut self.state
    }

    fn clear_pixels(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = self.background;
        }
    }

    fn fill_subpaths(&mut self, subpaths: &[SubPath], paint: &PaintState) {
        let polygons: Vec<Vec<Pos2>> = subpaths.iter().map(|s| dedup_points(&s.points)).collect();
        self.fill_polygons(&polygons, effective_rgba(paint.fill_color, paint.opacity));
    }

    /// Tessellated stroke triangles share one orientation, so the non-zero
    /// fill paints their union and blends each pixel once.
    fn stroke_subpaths(&mut self, subpaths: &[SubPath], paint: &PaintState) {
        let polygons: Vec<Vec<Pos2>> = stroke_triangles(subpaths, paint.line_width)
            .into_iter()
            .map(|triangle| oriented(triangle.to_vec()))
            .collect();
        self.fill_polygons(&polygons, effective_rgba(paint.stroke_color, paint.opacity));
    }

    fn snapshot(&self) -> Self::Snapshot {
        self.pixels.clone()
    }

    fn restore_snapshot(&mut self, snapshot: &Self::Snapshot) {
        if snapshot.dimensions() == self.pixels.dimensions() {
            self.pixels.copy_from_slice(snapshot.as_raw());
        } else {
            self.clear_pixels();
            imageops::replace(&mut self.pixels, snapshot, 0, 0);
        }
    }
}

fn signed_area(polygon: &[Pos2]) -> f32 {
    polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f32>()
        / 2.0
}

fn oriented(mut polygon: Vec<Pos2>) -> Vec<Pos2> {
    if signed_area(&polygon) < 0.0 {
        polygon.reverse();
    }
    polygon
}

/// Source-over compositing of an unmultiplied colour
fn blend(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let src_alpha = src[3] as f32 / 255.0;
    if src[3] == 255 {
        *dst = Rgba(src);
        return;
    }

    let dst_alpha = dst.0[3] as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }

    for channel in 0..3 {
        let value = (src[channel] as f32 * src_alpha
            + dst.0[channel] as f32 * dst_alpha * (1.0 - src_alpha))
            / out_alpha;
        dst.0[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_alpha * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;

    #[test]
    fn test_fill_square_covers_pixel_centres() {
        let mut surface = RasterSurface::new(10, 10);
        surface.set_fill_color(Color32::RED);
        surface.begin_path();
        surface.move_to(2.0, 2.0);
        surface.line_to(6.0, 2.0);
        surface.line_to(6.0, 6.0);
        surface.line_to(2.0, 6.0);
        surface.close_path();
        surface.fill();

        assert_eq!(surface.painted_pixel_count(), 16);
        assert_eq!(surface.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(6, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_stroke_paints_horizontal_band() {
        let mut surface = RasterSurface::new(20, 10);
        surface.set_stroke_color(Color32::BLUE);
        surface.set_line_width(2.0);
        surface.begin_path();
        surface.move_to(5.0, 5.0);
        surface.line_to(15.0, 5.0);
        surface.stroke();

        assert_eq!(surface.pixel(10, 4), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(10, 5), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(10, 7), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_overlapping_stroke_parts_blend_once() {
        let mut surface = RasterSurface::new(20, 20);
        surface.set_stroke_color(Color32::from_rgba_unmultiplied(0, 0, 0, 255));
        surface.set_opacity(0.5);
        surface.set_line_width(4.0);
        surface.begin_path();
        surface.move_to(2.0, 10.0);
        surface.line_to(10.0, 10.0);
        surface.line_to(18.0, 10.0);
        surface.stroke();

        // The join circle overlaps both segment quads
        let at_join = surface.pixel(10, 10).unwrap();
        let on_segment = surface.pixel(5, 10).unwrap();
        assert_eq!(at_join, on_segment);
        assert_eq!(at_join[3], 128);
    }

    #[test]
    fn test_opacity_blends_over_existing_pixels() {
        let mut surface = RasterSurface::with_background(4, 4, Color32::WHITE);
        surface.set_fill_color(Color32::BLACK);
        surface.set_opacity(0.5);
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(4.0, 0.0);
        surface.line_to(4.0, 4.0);
        surface.line_to(0.0, 4.0);
        surface.fill();

        assert_eq!(surface.pixel(1, 1), Some([127, 127, 127, 255]));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut surface = RasterSurface::new(8, 8);
        let blank = surface.snapshot();
        surface.set_fill_color(Color32::GREEN);
        surface.begin_path();
        surface.arc(4.0, 4.0, 3.0, 0.0, TAU);
        surface.fill();
        assert!(surface.painted_pixel_count() > 0);

        surface.restore_snapshot(&blank);
        assert_eq!(surface.painted_pixel_count(), 0);
    }

    #[test]
    fn test_clear_resets_paint_state() {
        let mut surface = RasterSurface::new(4, 4);
        surface.save();
        surface.set_line_width(9.0);
        surface.clear();
        assert_eq!(surface.paint_state(), PaintState::NEUTRAL);
        assert_eq!(surface.canvas_state().depth(), 0);
    }

    #[test]
    fn test_png_export_decodes_to_same_pixels() {
        let mut surface = RasterSurface::new(6, 4);
        surface.set_fill_color(Color32::GREEN);
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(3.0, 0.0);
        surface.line_to(3.0, 4.0);
        surface.line_to(0.0, 4.0);
        surface.fill();

        let png = surface.encode_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(&decoded, surface.image());
    }

    #[test]
    #[should_panic(expected = "non-empty size")]
    fn test_zero_sized_surface_is_rejected() {
        let _ = RasterSurface::new(0, 10);
    }
}
