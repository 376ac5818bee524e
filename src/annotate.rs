// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Bounding-box overlay drawing.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use serde_json::Value;

use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::overlay::{OverlayRenderer, encode_jpeg_base64};
use crate::predictions::Prediction;
use crate::utils::clamp_coord;
use crate::{verbose, warn};

/// Fonts tried, in order, when no font is configured.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Box and label colour (matplotlib `tab:blue`, #1f77b4).
pub const BOX_COLOR: Rgb<u8> = Rgb([31, 119, 180]);

/// Box outline thickness in pixels.
pub const BOX_THICKNESS: i32 = 2;

/// Label font size in pixels.
pub const LABEL_SCALE: f32 = 12.0;

/// Gap between the label baseline and the box top.
const LABEL_OFFSET: i32 = 6;

/// Brightness kept under the label backing (40% black).
const LABEL_BACKING: f32 = 0.6;

/// Where label glyphs come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Use this file. An unreadable file disables labels.
    Path(PathBuf),
    /// Use the first font found in the usual system locations.
    System,
    /// Draw boxes only.
    Disabled,
}

/// Load image helper to bypass zune-jpeg stride issues
pub fn load_image(path: &Path) -> image::ImageResult<DynamicImage> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    if matches!(ext.as_deref(), Some("jpg" | "jpeg")) {
        if let Ok(file) = File::open(path) {
            let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
            if let Ok(pixels) = decoder.decode() {
                if let Some(metadata) = decoder.info() {
                    let width = u32::from(metadata.width);
                    let height = u32::from(metadata.height);
                    match metadata.pixel_format {
                        jpeg_decoder::PixelFormat::RGB24 => {
                            if let Some(buffer) =
                                image::ImageBuffer::from_raw(width, height, pixels)
                            {
                                return Ok(DynamicImage::ImageRgb8(buffer));
                            }
                        }
                        jpeg_decoder::PixelFormat::L8 => {
                            if let Some(buffer) =
                                image::ImageBuffer::from_raw(width, height, pixels)
                            {
                                return Ok(DynamicImage::ImageLuma8(buffer));
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }
    // Fallback
    image::open(path)
}

/// Check common system locations for a usable font.
pub fn system_font() -> Option<PathBuf> {
    SYSTEM_FONT_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

fn read_font(path: &Path) -> Option<FontVec> {
    let data = fs::read(path)
        .map_err(|e| verbose!("Cannot read font {}: {e}", path.display()))
        .ok()?;
    FontVec::try_from_vec(data)
        .map_err(|e| verbose!("Invalid font {}: {e}", path.display()))
        .ok()
}

/// Draws detection boxes and labels onto images.
#[derive(Debug, Clone)]
pub struct ImageOverlay {
    font_source: FontSource,
}

impl ImageOverlay {
    /// Create a renderer using `source` for label glyphs.
    #[must_use]
    pub const fn new(font_source: FontSource) -> Self {
        Self { font_source }
    }

    /// Create a renderer from configuration: the configured font if set,
    /// otherwise a system font.
    #[must_use]
    pub fn from_config(config: &WorkflowConfig) -> Self {
        let source = config
            .font_path
            .clone()
            .map_or(FontSource::System, FontSource::Path);
        Self::new(source)
    }

    /// Renderer that draws boxes without labels.
    #[must_use]
    pub const fn without_labels() -> Self {
        Self::new(FontSource::Disabled)
    }

    fn load_font(&self) -> Option<FontVec> {
        match &self.font_source {
            FontSource::Path(path) => {
                let font = read_font(path);
                if font.is_none() {
                    warn!("Font {} is unusable, labels skipped", path.display());
                }
                font
            }
            FontSource::System => {
                let found = system_font();
                if found.is_none() {
                    verbose!("No system font found, labels skipped");
                }
                found.and_then(|p| read_font(&p))
            }
            FontSource::Disabled => None,
        }
    }

    /// Annotate an image with prediction boxes and labels.
    ///
    /// Entries that do not parse as predictions, and boxes lying entirely
    /// outside the image, are skipped. Returns the canvas (same size as
    /// `image`) and the number of boxes drawn.
    #[must_use]
    pub fn annotate(&self, image: &DynamicImage, predictions: &[&Value]) -> (RgbImage, usize) {
        let mut canvas = image.to_rgb8();
        let (width, height) = canvas.dimensions();
        let visible: Vec<Prediction> = predictions
            .iter()
            .filter_map(|v| Prediction::from_value(v))
            .filter(|p| overlaps(p, width, height))
            .collect();

        let font = if visible.is_empty() {
            None
        } else {
            self.load_font()
        };

        for pred in &visible {
            let (x1, y1) = draw_box(&mut canvas, pred);
            if let Some(ref f) = font {
                draw_label(&mut canvas, f, x1, y1, &pred.label);
            }
        }

        (canvas, visible.len())
    }
}

/// Whether any part of the box falls on a `width` x `height` canvas.
fn overlaps(pred: &Prediction, width: u32, height: u32) -> bool {
    let [x1, y1, x2, y2] = pred.xyxy();
    x1.max(x2) >= 0.0
        && x1.min(x2) < f64::from(width)
        && y1.max(y2) >= 0.0
        && y1.min(y2) < f64::from(height)
}

/// Draw one box and return its clamped top-left corner.
fn draw_box(canvas: &mut RgbImage, pred: &Prediction) -> (i32, i32) {
    let (width, height) = canvas.dimensions();
    let [bx1, by1, bx2, by2] = pred.xyxy();

    let mut x1 = clamp_coord(bx1, width);
    let mut y1 = clamp_coord(by1, height);
    let mut x2 = clamp_coord(bx2, width);
    let mut y2 = clamp_coord(by2, height);

    // Ensure x1 < x2 and y1 < y2
    if x1 > x2 {
        std::mem::swap(&mut x1, &mut x2);
    }
    if y1 > y2 {
        std::mem::swap(&mut y1, &mut y2);
    }
    x2 = x2.max(x1 + 1);
    y2 = y2.max(y1 + 1);

    for t in 0..BOX_THICKNESS {
        let tx1 = (x1 + t).min(x2 - 1);
        let ty1 = (y1 + t).min(y2 - 1);
        let tx2 = (x2 - t).max(tx1 + 1);
        let ty2 = (y2 - t).max(ty1 + 1);
        #[allow(clippy::cast_sign_loss)]
        let rect = Rect::at(tx1, ty1).of_size((tx2 - tx1) as u32, (ty2 - ty1) as u32);
        draw_hollow_rect_mut(canvas, rect, BOX_COLOR);
    }

    (x1, y1)
}

#[allow(clippy::cast_possible_wrap)]
fn draw_label(canvas: &mut RgbImage, font: &FontVec, x: i32, y: i32, label: &str) {
    let scale = PxScale::from(LABEL_SCALE);
    let (text_w, text_h) = text_size(scale, font, label);
    let (width, height) = canvas.dimensions();

    // Baseline sits just above the box; keep the label on the canvas
    let text_x = x.clamp(0, (width as i32 - text_w as i32).max(0));
    let text_y = (y - LABEL_OFFSET - text_h as i32).clamp(0, (height as i32 - 1).max(0));

    shade(canvas, text_x - 2, text_y - 1, text_w + 4, text_h + 2);
    draw_text_mut(canvas, BOX_COLOR, text_x, text_y, scale, font, label);
}

/// Darken a rectangle to give labels a translucent black backing.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
fn shade(canvas: &mut RgbImage, x: i32, y: i32, w: u32, h: u32) {
    let (width, height) = canvas.dimensions();
    let x0 = x.max(0) as u32;
    let y0 = y.max(0) as u32;
    let x1 = (x + w as i32).clamp(0, width as i32) as u32;
    let y1 = (y + h as i32).clamp(0, height as i32) as u32;

    for py in y0..y1 {
        for px in x0..x1 {
            let pixel = canvas.get_pixel_mut(px, py);
            for c in &mut pixel.0 {
                *c = (f32::from(*c) * LABEL_BACKING).round() as u8;
            }
        }
    }
}

impl OverlayRenderer for ImageOverlay {
    fn render(&self, image_path: &Path, predictions: &[&Value]) -> Result<Option<String>> {
        if predictions.is_empty() {
            return Ok(None);
        }

        let image = load_image(image_path)?;
        let (canvas, drawn) = self.annotate(&image, predictions);
        let skipped = predictions.len() - drawn;
        verbose!(
            "overlay {}x{}: {drawn} drawn, {skipped} skipped",
            canvas.width(),
            canvas.height()
        );

        encode_jpeg_base64(&canvas).map(Some)
    }
}
