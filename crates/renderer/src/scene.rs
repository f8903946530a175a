use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chain::Chain;
use crate::color::{hsb_to_rgb, BackgroundHue};

const BACKGROUND_SATURATION: f32 = 0.6;
const BACKGROUND_BRIGHTNESS: f32 = 0.9;

/// Chain mutations driven by the keyboard surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainCommand {
    /// Empty the chain.
    Clear,
    /// Push a point at a random location inside the window.
    AppendRandom,
    /// Pop the tail point; no-op when the chain is empty.
    RemoveLast,
}

/// Everything the per-frame update and render steps read or write.
///
/// The scene is owned by the event loop and mutated from a single thread:
/// input handlers write the cursor and bounds and apply commands, `tick`
/// smooths the chain and advances the background hue.
#[derive(Debug)]
pub struct SceneState {
    chain: Chain,
    cursor: Vec2,
    bounds: Vec2,
    background: BackgroundHue,
    rng: StdRng,
}

impl SceneState {
    /// Builds the startup scene: cursor and `initial_chain_len` points at
    /// the window center.
    pub fn new(width: u32, height: u32, initial_chain_len: usize) -> Self {
        Self::with_rng(width, height, initial_chain_len, StdRng::from_entropy())
    }

    /// Deterministic variant used by tests.
    pub fn with_seed(width: u32, height: u32, initial_chain_len: usize, seed: u64) -> Self {
        Self::with_rng(width, height, initial_chain_len, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: u32, height: u32, initial_chain_len: usize, rng: StdRng) -> Self {
        let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
        Self {
            chain: Chain::seeded(initial_chain_len, center),
            cursor: center,
            bounds: Vec2::new(width.max(1) as f32, height.max(1) as f32),
            background: BackgroundHue::default(),
            rng,
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
    }

    /// Tracks the window size so `AppendRandom` samples the live bounds.
    pub fn set_bounds(&mut self, width: u32, height: u32) {
        self.bounds = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    }

    pub fn apply(&mut self, command: ChainCommand) {
        match command {
            ChainCommand::Clear => self.chain.clear(),
            ChainCommand::AppendRandom => {
                let point = Vec2::new(
                    self.rng.gen_range(0.0..self.bounds.x),
                    self.rng.gen_range(0.0..self.bounds.y),
                );
                self.chain.push(point);
            }
            ChainCommand::RemoveLast => {
                self.chain.pop_tail();
            }
        }
    }

    /// One frame of simulation: smooth the chain toward the cursor and step
    /// the background hue.
    pub fn tick(&mut self) {
        self.chain.advance(self.cursor);
        self.background.step();
    }

    /// Clear color for the current frame.
    pub fn background_color(&self) -> [f32; 3] {
        hsb_to_rgb(
            self.background.value(),
            BACKGROUND_SATURATION,
            BACKGROUND_BRIGHTNESS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_adds_one_point_inside_bounds() {
        let mut scene = SceneState::with_seed(800, 600, 0, 42);
        for expected_len in 1..=100 {
            scene.apply(ChainCommand::AppendRandom);
            assert_eq!(scene.chain().len(), expected_len);
            let point = scene.chain().points()[expected_len - 1];
            assert!((0.0..800.0).contains(&point.x), "x out of bounds: {point:?}");
            assert!((0.0..600.0).contains(&point.y), "y out of bounds: {point:?}");
        }
    }

    #[test]
    fn remove_last_on_empty_chain_is_noop() {
        let mut scene = SceneState::with_seed(800, 600, 0, 7);
        scene.apply(ChainCommand::RemoveLast);
        assert_eq!(scene.chain().len(), 0);
    }

    #[test]
    fn clear_empties_the_chain() {
        let mut scene = SceneState::with_seed(800, 600, 5, 7);
        scene.apply(ChainCommand::Clear);
        assert!(scene.chain().is_empty());
    }

    #[test]
    fn seeded_chain_starts_at_center() {
        let scene = SceneState::with_seed(800, 600, 20, 1);
        assert_eq!(scene.chain().len(), 20);
        for point in scene.chain().points() {
            assert_eq!(*point, Vec2::new(400.0, 300.0));
        }
        assert_eq!(scene.cursor(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn tick_pulls_chain_toward_cursor() {
        let mut scene = SceneState::with_seed(800, 600, 1, 1);
        scene.set_cursor(0.0, 0.0);
        let before = scene.chain().points()[0].length();
        scene.tick();
        let after = scene.chain().points()[0].length();
        assert!(after < before);
    }

    #[test]
    fn append_uses_updated_bounds() {
        let mut scene = SceneState::with_seed(800, 600, 0, 3);
        scene.set_bounds(100, 50);
        for _ in 0..50 {
            scene.apply(ChainCommand::AppendRandom);
        }
        for point in scene.chain().points() {
            assert!(point.x < 100.0 && point.y < 50.0);
        }
    }

    #[test]
    fn background_color_is_valid_rgb() {
        let mut scene = SceneState::with_seed(800, 600, 0, 9);
        for _ in 0..100 {
            scene.tick();
            for channel in scene.background_color() {
                assert!((0.0..=1.0).contains(&channel));
            }
        }
    }
}
