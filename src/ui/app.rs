//! eframe host: one window, a toolbar, the board and a status line

use eframe::egui;
use egui::{CentralPanel, Context, Sense, TopBottomPanel};

use crate::game::{GameMode, GameState, GameStatus};
use crate::search::Difficulty;
use crate::{GameConfig, Stone};

use super::board_view::{self, Grid};
use super::session::Session;

pub struct GomokuApp {
    session: Session,
}

impl GomokuApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: GameConfig) -> Self {
        Self {
            session: Session::new(&config),
        }
    }

    fn toolbar(&mut self, ctx: &Context) {
        TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Play Black").clicked() {
                    self.session.new_game(GameMode::PvE { human: Stone::Black });
                }
                if ui.button("Play White").clicked() {
                    self.session.new_game(GameMode::PvE { human: Stone::White });
                }
                if ui.button("Two players").clicked() {
                    self.session.new_game(GameMode::PvP);
                }
                if ui.button("Restart").clicked() {
                    self.session.reset();
                }
                ui.separator();
                if ui.button("Undo").clicked() {
                    self.session.undo();
                }
                if self.session.mode() == GameMode::PvP && ui.button("Hint").clicked() {
                    self.session.request_suggestion();
                }
                ui.separator();
                egui::ComboBox::from_id_salt("difficulty")
                    .selected_text(self.session.difficulty.label())
                    .show_ui(ui, |ui| {
                        for d in Difficulty::ALL {
                            ui.selectable_value(&mut self.session.difficulty, d, d.label());
                        }
                    });
            });
        });
    }

    fn status_line(&self, ctx: &Context, state: &GameState) {
        TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(status_text(state, self.session.is_ai_thinking()));
                if let Some(percent) = self.session.progress() {
                    ui.add(
                        egui::ProgressBar::new(f32::from(percent) / 100.0)
                            .desired_width(160.0)
                            .show_percentage(),
                    );
                    if let Some(secs) = self.session.thinking_secs() {
                        ui.weak(format!("{secs:.1}s"));
                    }
                } else if let Some(result) = &self.session.last_ai_result {
                    ui.weak(format!(
                        "last engine move: {:?}, {:.0}% over {} iterations in {} ms",
                        result.search_type,
                        result.win_rate * 100.0,
                        result.iterations,
                        result.time_ms
                    ));
                }
                if let Some(msg) = &self.session.message {
                    ui.colored_label(egui::Color32::LIGHT_RED, msg);
                }
            });
        });
    }

    fn board(&mut self, ctx: &Context, state: &GameState) {
        CentralPanel::default().show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
            let grid = Grid::fit(response.rect);
            let heat = self.session.search_heat();
            board_view::paint(&painter, grid, state, &heat, self.session.suggested_move);

            if !response.clicked() || state.is_over() {
                return;
            }
            let Some(pos) = response.interact_pointer_pos().and_then(|p| grid.cell_at(p)) else {
                return;
            };
            if let Err(e) = self.session.try_place_stone(pos) {
                self.session.message = Some(e.to_string());
            }
        });
    }
}

fn status_text(state: &GameState, thinking: bool) -> String {
    match &state.status {
        GameStatus::Won { winner, .. } => format!("{winner:?} wins"),
        GameStatus::Draw => "Draw".to_string(),
        GameStatus::InProgress if thinking => "Engine thinking".to_string(),
        GameStatus::InProgress => format!("{:?} to move (move {})", state.current_player, state.move_count() + 1),
    }
}

impl eframe::App for GomokuApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // One search slice per frame
        self.session.tick();

        let state = self.session.state();
        self.toolbar(ctx);
        self.status_line(ctx, &state);
        self.board(ctx, &state);

        if self.session.is_ai_thinking() {
            ctx.request_repaint();
        }
    }
}
