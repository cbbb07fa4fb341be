//! Canvas 2D renderer (wasm32)
//!
//! Flat rectangles only; sprite art is not part of the engine.

use web_sys::CanvasRenderingContext2d;

use super::{Renderer, Snapshot};
use crate::sim::{CharacterMode, GamePhase, ObstacleKind};

const SKY: &str = "#87CEEB";
const GROUND: &str = "#A0522D";
const CLOUD: &str = "#FFFFFF";
const CHARACTER: &str = "#32CD32";
const CHARACTER_DEAD: &str = "#8B4513";
const CACTUS: &str = "#2E8B57";
const BIRD: &str = "#4B0082";
const TEXT: &str = "#2F4F4F";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn rect(&self, color: &str, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn text(&self, text: &str, x: f32, y: f32, align: &str) {
        self.ctx.set_fill_style_str(TEXT);
        self.ctx.set_font("bold 16px monospace");
        self.ctx.set_text_align(align);
        let _ = self.ctx.fill_text(text, x as f64, y as f64);
    }
}

impl Renderer for CanvasRenderer {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        let config = snapshot.config;
        let field = &config.field;

        self.rect(SKY, 0.0, 0.0, field.width, field.height);

        for cloud in snapshot.clouds {
            self.rect(
                CLOUD,
                cloud.pos.x,
                cloud.pos.y,
                config.clouds.width,
                config.clouds.height,
            );
        }

        self.rect(
            GROUND,
            0.0,
            field.ground_line_y,
            field.width,
            field.height - field.ground_line_y,
        );
        // Scrolling ground texture
        let mut x = snapshot.ground_offset;
        while x < field.width {
            self.rect(CHARACTER_DEAD, x, field.ground_line_y + 4.0, 4.0, 2.0);
            x += field.ground_wrap;
        }

        for obstacle in snapshot.obstacles {
            let color = match obstacle.kind {
                ObstacleKind::CactusSmall | ObstacleKind::CactusLarge => CACTUS,
                ObstacleKind::BirdHigh | ObstacleKind::BirdLow => BIRD,
            };
            self.rect(
                color,
                obstacle.pos.x,
                obstacle.pos.y,
                obstacle.size.x,
                obstacle.size.y,
            );
        }

        let ch = snapshot.character;
        let cfg = &config.character;
        let height = ch.height(cfg);
        let color = if ch.mode == CharacterMode::Dead {
            CHARACTER_DEAD
        } else {
            CHARACTER
        };
        self.rect(color, ch.x, ch.y + cfg.height - height, cfg.width, height);

        self.text(
            &format!("HI {:05}  {:05}", snapshot.high_score, snapshot.score),
            field.width - 20.0,
            24.0,
            "right",
        );
        let banner = match snapshot.phase {
            GamePhase::Menu => Some("PRESS SPACE TO START"),
            GamePhase::Playing => None,
            GamePhase::GameOver => Some("GAME OVER - PRESS SPACE TO RESTART"),
        };
        if let Some(banner) = banner {
            self.text(banner, field.width / 2.0, field.height / 2.0, "center");
        }
    }
}
