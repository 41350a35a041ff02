pub mod camera;
pub mod hud;
pub mod raster;
pub mod theme;
pub mod view;

use ratatui::{
    Frame,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::state::AppState;

pub const MIN_WIDTH: u16 = 20;
pub const MIN_HEIGHT: u16 = 8;

pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let warning = Paragraph::new(format!(
            "Terminal too small. Resize to at least {MIN_WIDTH}x{MIN_HEIGHT}."
        ))
        .block(Block::default().borders(Borders::ALL).title("atmos-scene"));
        frame.render_widget(warning, area);
        return;
    }

    let capability = state.capability;
    state.controller.render(area, frame.buffer_mut(), capability);

    if state.settings.hud {
        hud::render_hud(frame, area, &state.hud_text(), state.controller.phase());
    }
    if let Some(err) = &state.last_error {
        hud::render_error_badge(frame, area, err);
    }
}
