//! Text-mode renderer for terminals and logs
//!
//! Rasterizes the snapshot into a coarse character grid, one cell per
//! `field / grid` pixels, with a HUD line on top.

use std::io::{self, Write};

use super::{Renderer, Snapshot};
use crate::sim::{CharacterMode, GamePhase, ObstacleKind};

/// Character grid
struct CharGrid {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
}

impl CharGrid {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![' '; cols * rows],
        }
    }

    /// Fill the cells covered by a pixel rectangle
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, cell: (f32, f32), c: char) {
        let col_range = span(x, w, cell.0, self.cols);
        let row_range = span(y, h, cell.1, self.rows);
        for row in row_range {
            for col in col_range.clone() {
                self.cells[row * self.cols + col] = c;
            }
        }
    }

    fn write_row(&mut self, row: usize, pattern: impl Fn(usize) -> char) {
        for col in 0..self.cols {
            self.cells[row * self.cols + col] = pattern(col);
        }
    }

    fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
    }
}

/// Cell indices covered by `[start, start + len)` in pixels
fn span(start: f32, len: f32, cell: f32, count: usize) -> std::ops::Range<usize> {
    let first = (start / cell).floor().max(0.0) as usize;
    let last = ((start + len) / cell).ceil().max(0.0) as usize;
    first.min(count)..last.min(count)
}

fn phase_banner(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Menu => "PRESS SPACE TO START",
        GamePhase::Playing => "",
        GamePhase::GameOver => "GAME OVER - PRESS SPACE TO RESTART",
    }
}

/// Draw a snapshot as text (HUD line followed by the playfield)
pub fn render_to_string(snapshot: &Snapshot<'_>, cols: usize, rows: usize) -> String {
    let field = &snapshot.config.field;
    let cell = (field.width / cols as f32, field.height / rows as f32);
    let mut grid = CharGrid::new(cols, rows);

    for cloud in snapshot.clouds {
        let clouds = &snapshot.config.clouds;
        grid.fill_rect(cloud.pos.x, cloud.pos.y, clouds.width, clouds.height, cell, '~');
    }

    let ground_row = ((field.ground_line_y / cell.1) as usize).min(rows.saturating_sub(1));
    let offset_cells = (-snapshot.ground_offset / cell.0) as usize;
    grid.write_row(ground_row, |col| {
        if (col + offset_cells) % 4 == 0 { '.' } else { '_' }
    });

    for obstacle in snapshot.obstacles {
        let c = match obstacle.kind {
            ObstacleKind::CactusSmall => '|',
            ObstacleKind::CactusLarge => '#',
            ObstacleKind::BirdHigh | ObstacleKind::BirdLow => 'v',
        };
        grid.fill_rect(
            obstacle.pos.x,
            obstacle.pos.y,
            obstacle.size.x,
            obstacle.size.y,
            cell,
            c,
        );
    }

    let ch = snapshot.character;
    let c = match ch.mode {
        CharacterMode::Running | CharacterMode::Jumping => 'D',
        CharacterMode::Ducking => 'd',
        CharacterMode::Dead => 'X',
    };
    let cfg = &snapshot.config.character;
    let height = ch.height(cfg);
    // Ducking sprites hug the ground instead of shrinking from the top
    let y = ch.y + (cfg.height - height);
    grid.fill_rect(ch.x, y, cfg.width, height, cell, c);

    let mut out = format!(
        "HI {:05} {:05}  {}",
        snapshot.high_score,
        snapshot.score,
        phase_banner(snapshot.phase)
    )
    .trim_end()
    .to_string();
    for line in grid.lines() {
        out.push('\n');
        out.push_str(&line);
    }
    out
}

/// Renderer that writes every `interval`-th frame to a text sink
pub struct AsciiRenderer<W: Write> {
    out: W,
    cols: usize,
    rows: usize,
    interval: u64,
    frames: u64,
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(out: W, interval: u64) -> Self {
        Self {
            out,
            cols: 80,
            rows: 10,
            interval: interval.max(1),
            frames: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let frame = render_to_string(snapshot, self.cols, self.rows);
        writeln!(self.out, "{}\n", frame)?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for AsciiRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        let due = self.frames % self.interval == 0;
        self.frames += 1;
        if due {
            if let Err(e) = self.write_frame(snapshot) {
                log::warn!("ASCII render failed: {}", e);
            }
        }
    }
}
