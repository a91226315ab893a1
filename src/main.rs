//! Gomoku AI Engine GUI
//!
//! A graphical interface for playing Gomoku against the MCTS engine or
//! another player.

use gomoku::ui::GomokuApp;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), eframe::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gomoku=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = gomoku::load_config();
    tracing::info!(
        difficulty = config.difficulty.label(),
        human = ?config.human_color,
        "starting gomoku"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Gomoku - MCTS"),
        ..Default::default()
    };

    eframe::run_native(
        "Gomoku",
        options,
        Box::new(|cc| Ok(Box::new(GomokuApp::new(cc, config)))),
    )
}
