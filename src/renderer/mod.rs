//! Rendering interface
//!
//! Drawing lives in the host (canvas on the web). The simulation hands it a
//! `RenderView` each frame and expects nothing back. `TextRenderer` draws
//! the lit part of the maze as text for headless runs.

use std::fmt::Write;

use crate::sim::{Direction, GameState, Maze, Position};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub maze: &'a Maze,
    pub player: Position,
    pub exit: Position,
    /// Visibility radius in cells, pulse included
    pub light_radius: f32,
    /// Pixels per cell
    pub tile_size: u32,
}

impl<'a> RenderView<'a> {
    pub fn from_state(state: &'a GameState, now_ms: f64, tile_size: u32) -> Self {
        Self {
            maze: state.maze(),
            player: state.player(),
            exit: state.exit(),
            light_radius: state.effective_light_radius(now_ms),
            tile_size,
        }
    }

    /// True if `pos` is inside the player's light
    pub fn is_lit(&self, pos: Position) -> bool {
        let dx = pos.x as f32 - self.player.x as f32;
        let dy = pos.y as f32 - self.player.y as f32;
        (dx * dx + dy * dy).sqrt() <= self.light_radius
    }
}

/// A write-only frame consumer
pub trait RenderSink {
    fn render(&mut self, view: &RenderView<'_>);
}

/// Draws lit cells with box characters; unlit cells are blank
#[derive(Debug, Default)]
pub struct TextRenderer {
    pub frame: String,
}

impl RenderSink for TextRenderer {
    fn render(&mut self, view: &RenderView<'_>) {
        let maze = view.maze;
        self.frame.clear();

        for y in 0..maze.rows() {
            // Top walls
            for x in 0..maze.cols() {
                let pos = Position::new(x, y);
                if view.is_lit(pos) {
                    let open = maze.cell(pos).is_open(Direction::North);
                    self.frame.push_str(if open { "+  " } else { "+--" });
                } else {
                    self.frame.push_str("   ");
                }
            }
            self.frame.push('\n');

            // West walls and contents
            for x in 0..maze.cols() {
                let pos = Position::new(x, y);
                if !view.is_lit(pos) {
                    self.frame.push_str("   ");
                    continue;
                }
                let wall = if maze.cell(pos).is_open(Direction::West) { ' ' } else { '|' };
                let glyph = if pos == view.player {
                    "@ "
                } else if pos == view.exit {
                    "X "
                } else {
                    "  "
                };
                let _ = write!(self.frame, "{wall}{glyph}");
            }
            self.frame.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_render_shows_player() {
        let mut state = GameState::new(3);
        state.start(0.0);
        let view = RenderView::from_state(&state, 0.0, 40);
        assert!(view.is_lit(Position::ORIGIN));
        assert!(!view.is_lit(Position::new(10, 10)));

        let mut renderer = TextRenderer::default();
        renderer.render(&view);
        assert_eq!(renderer.frame.matches('@').count(), 1);
        assert_eq!(renderer.frame.lines().count(), 30);
        // Origin always has its west wall
        assert!(renderer.frame.lines().nth(1).unwrap().starts_with("|@"));
    }
}
