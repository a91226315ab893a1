//! Board painting and click mapping

use egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::game::GameState;
use crate::{Pos, Stone, BOARD_SIZE};

const WOOD: Color32 = Color32::from_rgb(214, 178, 120);
const LINE: Color32 = Color32::from_rgb(70, 50, 30);
const MARK: Color32 = Color32::from_rgb(210, 50, 50);
const WIN: Color32 = Color32::from_rgb(40, 200, 80);
const HINT: Color32 = Color32::from_rgb(40, 120, 220);

/// Where the grid sits inside the allocated rect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    origin: Pos2,
    step: f32,
}

impl Grid {
    /// Largest square grid that fits `rect`, with half a cell of margin.
    pub fn fit(rect: Rect) -> Self {
        let side = rect.width().min(rect.height());
        let step = side / BOARD_SIZE as f32;
        let used = step * (BOARD_SIZE as f32 - 1.0);
        let origin = rect.center() - egui::vec2(used, used) / 2.0;
        Self { origin, step }
    }

    pub fn center_of(&self, pos: Pos) -> Pos2 {
        self.origin + egui::vec2(pos.col as f32, pos.row as f32) * self.step
    }

    /// Nearest intersection to `point`, if it lies within half a cell.
    pub fn cell_at(&self, point: Pos2) -> Option<Pos> {
        let rel = (point - self.origin) / self.step;
        let (row, col) = (rel.y.round(), rel.x.round());
        if row < 0.0 || col < 0.0 || (rel.y - row).abs() > 0.5 || (rel.x - col).abs() > 0.5 {
            return None;
        }
        Pos::try_new(row as usize, col as usize)
    }

    fn radius(&self) -> f32 {
        self.step * 0.45
    }
}

/// Paint the board, stones and overlays for `state`.
pub fn paint(
    painter: &Painter,
    grid: Grid,
    state: &GameState,
    heat: &[(Pos, f32)],
    hint: Option<Pos>,
) {
    let last = BOARD_SIZE as u8 - 1;
    let pad = grid.step * 0.5;
    let frame = Rect::from_min_max(
        grid.center_of(Pos::new(0, 0)) - egui::vec2(pad, pad),
        grid.center_of(Pos::new(last, last)) + egui::vec2(pad, pad),
    );
    painter.rect_filled(frame, 4.0, WOOD);

    let stroke = Stroke::new(1.0, LINE);
    for i in 0..=last {
        painter.line_segment([grid.center_of(Pos::new(i, 0)), grid.center_of(Pos::new(i, last))], stroke);
        painter.line_segment([grid.center_of(Pos::new(0, i)), grid.center_of(Pos::new(last, i))], stroke);
    }
    painter.circle_filled(grid.center_of(Pos::CENTER), 3.0, LINE);

    for (pos, share) in heat {
        let alpha = (share.clamp(0.0, 1.0) * 200.0) as u8 + 30;
        painter.circle_filled(
            grid.center_of(*pos),
            grid.radius() * 0.35,
            Color32::from_rgba_unmultiplied(HINT.r(), HINT.g(), HINT.b(), alpha),
        );
    }

    for (stone, fill, edge) in [
        (Stone::Black, Color32::from_gray(20), Color32::from_gray(60)),
        (Stone::White, Color32::from_gray(245), Color32::from_gray(150)),
    ] {
        let Some(stones) = state.board.stones(stone) else {
            continue;
        };
        for pos in stones.iter_ones() {
            let c = grid.center_of(pos);
            painter.circle_filled(c, grid.radius(), fill);
            painter.circle_stroke(c, grid.radius(), Stroke::new(1.0, edge));
        }
    }

    if let Some(pos) = state.last_move {
        painter.circle_filled(grid.center_of(pos), grid.radius() * 0.25, MARK);
    }
    for &pos in state.winning_line() {
        painter.circle_stroke(grid.center_of(pos), grid.radius(), Stroke::new(3.0, WIN));
    }
    if let Some(pos) = hint {
        painter.circle_stroke(grid.center_of(pos), grid.radius() * 0.8, Stroke::new(2.0, HINT));
    }
}
