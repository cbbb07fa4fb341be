//! Collision detection
//!
//! Axis-aligned boxes shrunk by a per-entity inset, tested with strict overlap
//! so boxes that only share an edge do not collide. Discrete per-tick check;
//! nothing moves fast enough to tunnel at the configured speeds.

use glam::Vec2;

use super::config::RunnerConfig;
use super::state::{Character, Obstacle};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from a top-left corner and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Shrink by `inset` on every side
    pub fn inset(&self, inset: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(inset),
            max: self.max - Vec2::splat(inset),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap on both axes (shared edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Character hit-box for its current mode
pub fn character_hitbox(character: &Character, config: &RunnerConfig) -> Aabb {
    let c = &config.character;
    Aabb::from_pos_size(
        Vec2::new(character.x, character.y),
        Vec2::new(c.width, character.height(c)),
    )
    .inset(c.hitbox_inset)
}

pub fn obstacle_hitbox(obstacle: &Obstacle, config: &RunnerConfig) -> Aabb {
    Aabb::from_pos_size(obstacle.pos, obstacle.size).inset(config.obstacles.hitbox_inset)
}

/// Index of the first obstacle (in collection order) touching the character
pub fn find_collision(
    character: &Character,
    obstacles: &[Obstacle],
    config: &RunnerConfig,
) -> Option<usize> {
    let hitbox = character_hitbox(character, config);
    obstacles
        .iter()
        .position(|obstacle| hitbox.overlaps(&obstacle_hitbox(obstacle, config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{CharacterMode, ObstacleKind};

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::from_pos_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&boxed(5.0, 5.0, 10.0, 10.0)));
        assert!(a.overlaps(&boxed(2.0, 2.0, 1.0, 1.0)));
        assert!(!a.overlaps(&boxed(20.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_shared_edge_is_not_a_collision() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        // Right edge touches left edge
        assert!(!a.overlaps(&boxed(10.0, 0.0, 10.0, 10.0)));
        // Bottom edge touches top edge
        assert!(!a.overlaps(&boxed(0.0, 10.0, 10.0, 10.0)));
        // Corner touch
        assert!(!a.overlaps(&boxed(10.0, 10.0, 5.0, 5.0)));
        // Overlapping on x but only touching on y
        assert!(!a.overlaps(&boxed(5.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_character_hitbox_insets() {
        let config = RunnerConfig::default();
        let mut c = Character::new(&config.character);
        let standing = character_hitbox(&c, &config);
        assert_eq!(standing.min, Vec2::new(55.0, 155.0));
        assert_eq!(standing.size(), Vec2::new(30.0, 30.0));

        c.mode = CharacterMode::Ducking;
        let ducking = character_hitbox(&c, &config);
        assert_eq!(ducking.size(), Vec2::new(30.0, 15.0));
    }

    #[test]
    fn test_obstacle_hitbox_insets() {
        let config = RunnerConfig::default();
        let o = Obstacle::new(ObstacleKind::CactusSmall, 100.0, &config);
        let hb = obstacle_hitbox(&o, &config);
        assert_eq!(hb.min, Vec2::new(103.0, 138.0));
        assert_eq!(hb.size(), Vec2::new(11.0, 29.0));
    }

    #[test]
    fn test_touching_character_and_obstacle_do_not_collide() {
        let config = RunnerConfig::default();
        let c = Character::new(&config.character);
        // Character hit-box right edge is x = 85; obstacle hit-box left edge = x + 3
        let touching = Obstacle::new(ObstacleKind::CactusLarge, 82.0, &config);
        assert_eq!(find_collision(&c, &[touching], &config), None);

        let overlapping = Obstacle::new(ObstacleKind::CactusLarge, 81.0, &config);
        assert_eq!(find_collision(&c, &[overlapping], &config), Some(0));
    }

    #[test]
    fn test_first_collision_in_collection_order() {
        let config = RunnerConfig::default();
        let c = Character::new(&config.character);
        let obstacles = vec![
            Obstacle::new(ObstacleKind::CactusSmall, 500.0, &config),
            Obstacle::new(ObstacleKind::CactusLarge, 60.0, &config),
            Obstacle::new(ObstacleKind::CactusSmall, 55.0, &config),
        ];
        assert_eq!(find_collision(&c, &obstacles, &config), Some(1));
    }

    #[test]
    fn test_high_bird_clears_running_character() {
        let config = RunnerConfig::default();
        let c = Character::new(&config.character);
        let bird = Obstacle::new(ObstacleKind::BirdHigh, 50.0, &config);
        assert_eq!(find_collision(&c, &[bird], &config), None);
    }
}
