use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::{
    domain::{
        palette::{IconMode, icon_for_condition},
        weather::{DayPhase, WeatherSnapshot},
    },
    ui::theme::hud_colors,
};

#[must_use]
pub fn hud_line(
    snapshot: Option<&WeatherSnapshot>,
    phase: DayPhase,
    icon_mode: IconMode,
    paused: bool,
) -> String {
    let phase_label = match phase {
        DayPhase::Day => "day",
        DayPhase::Night => "night",
    };
    let mut line = match snapshot {
        Some(snapshot) => {
            let condition = snapshot.condition_key();
            let icon = icon_for_condition(condition.as_deref()).glyph(icon_mode);
            let label = snapshot
                .primary_condition()
                .map(|c| {
                    if c.description.is_empty() {
                        c.main.to_lowercase()
                    } else {
                        c.description.clone()
                    }
                })
                .unwrap_or_else(|| "unknown".to_string());
            let mut line = format!("{icon} {:.0}° {label}", snapshot.temp);
            if let Some(clouds) = snapshot.clouds {
                line.push_str(&format!(" · clouds {clouds:.0}%"));
            }
            line.push_str(&format!(" · {phase_label}"));
            line
        }
        None => {
            let icon = icon_for_condition(None).glyph(icon_mode);
            format!("{icon} waiting for weather · {phase_label}")
        }
    };
    if paused {
        line.push_str(" · paused");
    }
    line
}

pub fn render_hud(frame: &mut Frame, area: Rect, text: &str, phase: DayPhase) {
    if area.height == 0 {
        return;
    }
    let (fg, bg) = hud_colors(phase);
    let width = (text.chars().count() as u16 + 2).min(area.width);
    let hud_area = Rect {
        x: area.x,
        y: area.y,
        width,
        height: 1,
    };
    let badge = Paragraph::new(Line::from(format!(" {text}")))
        .style(Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD));
    frame.render_widget(badge, hud_area);
}

pub fn render_error_badge(frame: &mut Frame, area: Rect, message: &str) {
    if area.height < 2 {
        return;
    }
    let text = format!("⚠ {message}");
    let width = (text.chars().count() as u16 + 2).min(area.width);
    let badge_area = Rect {
        x: area.right().saturating_sub(width + 1),
        y: area.bottom().saturating_sub(1),
        width,
        height: 1,
    };
    let badge = Paragraph::new(Line::from(text)).style(
        Style::default()
            .fg(Color::LightRed)
            .bg(Color::Black)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(badge, badge_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::WeatherCondition;

    fn rainy() -> WeatherSnapshot {
        WeatherSnapshot {
            temp: 11.6,
            feels_like: 10.0,
            humidity: 91.0,
            pressure: 1003.0,
            dew_point: 10.0,
            uvi: 0.2,
            clouds: Some(75.0),
            visibility: 7_000.0,
            wind_speed: 6.2,
            wind_deg: 210.0,
            sunrise: 0,
            sunset: 0,
            weather: vec![WeatherCondition::new("Rain", "light rain")],
        }
    }

    #[test]
    fn hud_describes_snapshot() {
        insta::assert_snapshot!(
            hud_line(Some(&rainy()), DayPhase::Day, IconMode::Ascii, false),
            @"RAN 12° light rain · clouds 75% · day"
        );
    }

    #[test]
    fn hud_falls_back_to_main_when_description_missing() {
        let mut snapshot = rainy();
        snapshot.weather = vec![WeatherCondition::new("Mist", "")];
        snapshot.clouds = None;
        insta::assert_snapshot!(
            hud_line(Some(&snapshot), DayPhase::Night, IconMode::Ascii, true),
            @"FOG 12° mist · night · paused"
        );
    }

    #[test]
    fn hud_waits_without_snapshot() {
        insta::assert_snapshot!(
            hud_line(None, DayPhase::Day, IconMode::Ascii, false),
            @"--- waiting for weather · day"
        );
    }
}
