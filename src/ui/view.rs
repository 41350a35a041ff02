use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::ui::{
    raster::FrameBuffer,
    theme::{ColorCapability, quantize},
};

/// Upper half block: foreground paints the top pixel, background the bottom one.
const HALF_BLOCK: &str = "▀";

/// Blits a rasterized frame into a terminal buffer, two pixels per cell.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    frame: &'a FrameBuffer,
    capability: ColorCapability,
}

impl<'a> SceneView<'a> {
    #[must_use]
    pub fn new(frame: &'a FrameBuffer, capability: ColorCapability) -> Self {
        Self { frame, capability }
    }
}

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = usize::from(col);
                let y = usize::from(row) * 2;
                let (Some(top), Some(bottom)) = (self.frame.pixel(x, y), self.frame.pixel(x, y + 1))
                else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(quantize(top, self.capability))
                        .set_bg(quantize(bottom, self.capability));
                }
            }
        }
    }
}
