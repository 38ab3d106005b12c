use std::sync::Arc;

use crate::coords::Rect;
use crate::image::Image;
use crate::paint::Color;

use super::{ImageDraw, RenderBackend};

/// A backend call captured by [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    Translate { x: f32, y: f32 },
    /// Canvas upload; only the payload size is kept.
    UploadCanvas { layer: usize, width: i32, height: i32, bytes: usize },
    Canvas { layer: usize },
    Image { image: Arc<Image>, draw: ImageDraw },
    FillRect { rect: Rect, color: Color },
}

/// Backend that records calls in issue order.
///
/// Used by tests and by headless drivers that only need to know what would
/// have been drawn.
#[derive(Debug, Default)]
pub struct Recorder {
    cmds: Vec<DrawCmd>,
}

impl Recorder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded commands, keeping capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    /// Number of canvas uploads recorded.
    pub fn upload_count(&self) -> usize {
        self.cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::UploadCanvas { .. }))
            .count()
    }

    /// Number of quads recorded (images, canvases and filled rects).
    pub fn quad_count(&self) -> usize {
        self.cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Image { .. } | DrawCmd::Canvas { .. } | DrawCmd::FillRect { .. }))
            .count()
    }
}

impl RenderBackend for Recorder {
    fn clear(&mut self, color: Color) {
        self.cmds.push(DrawCmd::Clear(color));
    }

    fn set_translation(&mut self, x: f32, y: f32) {
        self.cmds.push(DrawCmd::Translate { x, y });
    }

    fn upload_canvas(&mut self, layer: usize, width: i32, height: i32, rgba: &[u8]) {
        self.cmds.push(DrawCmd::UploadCanvas { layer, width, height, bytes: rgba.len() });
    }

    fn draw_canvas(&mut self, layer: usize, _width: i32, _height: i32) {
        self.cmds.push(DrawCmd::Canvas { layer });
    }

    fn draw_image(&mut self, image: &Arc<Image>, draw: ImageDraw) {
        self.cmds.push(DrawCmd::Image { image: Arc::clone(image), draw });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.cmds.push(DrawCmd::FillRect { rect, color });
    }
}
