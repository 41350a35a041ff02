mod common;

use std::time::Duration;

use atmos_scene::{
    app::{
        controller::{SceneController, SnapshotChange},
        events::{AppEvent, FrameLoop},
    },
    domain::weather::DayPhase,
    scene::{ElementKind, resources::ResourceLedger},
    ui,
};
use common::{demo_state, noon, reading};
use ratatui::{Terminal, backend::TestBackend};
use tokio::{sync::mpsc, time::timeout};

fn screen_lines(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

#[test]
fn renders_scene_and_hud_onto_test_backend() {
    let mut state = demo_state(&["--ascii-icons"], (60, 20));
    state.controller.mount_at(60, 20, Some(reading("Rain", 12.0, Some(80.0), true)), noon());

    let mut terminal = Terminal::new(TestBackend::new(60, 20)).expect("terminal");
    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .expect("draw");

    let lines = screen_lines(&terminal);
    assert!(lines[0].starts_with(" RAN 12° rain · clouds 80% · day"));
    let blocks = lines[1..].iter().flat_map(|l| l.chars()).filter(|c| *c == '▀').count();
    assert_eq!(blocks, 60 * 19);

    let buffer = terminal.backend().buffer();
    let sphere = &buffer[(30, 10)];
    let sky = &buffer[(59, 19)];
    assert_ne!(sphere.fg, sky.fg, "sphere pixels differ from the sky behind them");
}

#[test]
fn hud_can_be_hidden() {
    let mut state = demo_state(&["--no-hud"], (40, 12));
    state.controller.mount_at(40, 12, None, noon());

    let mut terminal = Terminal::new(TestBackend::new(40, 12)).expect("terminal");
    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .expect("draw");
    let lines = screen_lines(&terminal);
    assert!(lines[0].chars().all(|c| c == '▀'));
}

#[test]
fn tiny_terminal_shows_warning() {
    let mut state = demo_state(&[], (12, 4));
    state.controller.mount_at(12, 4, None, noon());

    let mut terminal = Terminal::new(TestBackend::new(12, 4)).expect("terminal");
    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .expect("draw");
    let text = screen_lines(&terminal).join("");
    assert!(!text.contains('▀'));
    assert!(text.contains("Termin"));
}

#[test]
fn error_badge_is_drawn_bottom_right() {
    let mut state = demo_state(&[], (50, 12));
    state.controller.mount_at(50, 12, None, noon());
    state.last_error = Some("snapshot now.json is empty".to_string());

    let mut terminal = Terminal::new(TestBackend::new(50, 12)).expect("terminal");
    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .expect("draw");
    let lines = screen_lines(&terminal);
    assert!(lines[11].contains("⚠ snapshot now.json is empty"));
}

#[test]
fn ledger_returns_to_zero_across_rebuilds_and_unmount() {
    let ledger = ResourceLedger::new();
    let mut controller = SceneController::new(ledger.clone());
    controller.mount_at(30, 10, Some(reading("Clear", 22.0, Some(10.0), true)), noon());

    let change = controller.set_snapshot_at(Some(reading("Rain", 9.0, Some(90.0), false)), noon());
    assert_eq!(change, SnapshotChange::Rebuilt);
    assert_eq!(controller.phase(), DayPhase::Night);
    let scene = controller.scene().expect("mounted");
    assert_eq!(scene.count(ElementKind::Rain), 1);
    assert_eq!(ledger.live(), scene.resource_ids().len() as u64 + 1);

    let change = controller.set_snapshot_at(Some(reading("Rain", 3.0, Some(30.0), false)), noon());
    assert_eq!(change, SnapshotChange::Refreshed);

    controller.unmount();
    assert_eq!(ledger.live(), 0);
    drop(controller);
    assert_eq!(ledger.allocated(), ledger.released());
}

#[tokio::test]
async fn frame_loop_drives_ticks_until_unmount() {
    let (tx, mut rx) = mpsc::channel(16);
    let mut controller = SceneController::default();
    controller.mount_at(30, 10, None, noon());
    controller.attach_frame_loop(FrameLoop::start(tx, 60));

    for _ in 0..3 {
        let event = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("tick arrives");
        assert!(matches!(event, Some(AppEvent::TickFrame)));
        controller.tick(Duration::from_millis(16));
    }
    assert!(controller.elapsed_ms() > 0.0);

    controller.unmount();
    let closed = timeout(Duration::from_secs(2), async {
        while rx.recv().await.is_some() {}
    })
    .await;
    assert!(closed.is_ok());
    assert_eq!(controller.ledger().live(), 0);
}
