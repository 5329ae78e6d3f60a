//! Session configuration
//!
//! One parameterized core covers every board layout: width, height and spawn
//! column are plain configuration.

use crate::rng::{BagSource, PieceSource, UniformSource};
use crate::types::{
    CLASSIC_HEIGHT, CLASSIC_SPAWN_COLUMN, CLASSIC_WIDTH, DEFAULT_PLAYER_NAME, MAX_SHAPE_EXTENT,
    WIDE_HEIGHT, WIDE_SPAWN_COLUMN, WIDE_WIDTH,
};

/// Phase a session enters after `reset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPolicy {
    /// Play resumes immediately with a fresh board
    #[default]
    Running,
    /// A fresh board waits for `start`
    NotStarted,
}

impl ResetPolicy {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "running" => Some(ResetPolicy::Running),
            "not-started" | "notstarted" => Some(ResetPolicy::NotStarted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResetPolicy::Running => "running",
            ResetPolicy::NotStarted => "not-started",
        }
    }
}

/// Which piece source a session builds from its seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Randomizer {
    /// Independent uniform draw per piece
    #[default]
    Uniform,
    /// 7-bag shuffling
    Bag,
}

impl Randomizer {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uniform" | "random" => Some(Randomizer::Uniform),
            "bag" | "7bag" | "7-bag" => Some(Randomizer::Bag),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Randomizer::Uniform => "uniform",
            Randomizer::Bag => "bag",
        }
    }

    /// Build the piece source for `seed`
    pub fn build(&self, seed: u32) -> Box<dyn PieceSource + Send> {
        match self {
            Randomizer::Uniform => Box::new(UniformSource::new(seed)),
            Randomizer::Bag => Box::new(BagSource::new(seed)),
        }
    }
}

/// Everything a session needs to know before the first piece spawns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: u8,
    pub height: u8,
    /// Column of the spawn anchor (left edge of the piece's bounding box)
    pub spawn_column: u8,
    /// Name handed to the score sink at game over
    pub player_name: String,
    pub reset_policy: ResetPolicy,
    pub randomizer: Randomizer,
    pub seed: u32,
}

impl SessionConfig {
    /// 10x20 board, spawn column 3
    pub fn classic() -> Self {
        Self {
            width: CLASSIC_WIDTH,
            height: CLASSIC_HEIGHT,
            spawn_column: CLASSIC_SPAWN_COLUMN,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            reset_policy: ResetPolicy::default(),
            randomizer: Randomizer::default(),
            seed: 1,
        }
    }

    /// 15x30 board, spawn column 6
    pub fn wide() -> Self {
        Self {
            width: WIDE_WIDTH,
            height: WIDE_HEIGHT,
            spawn_column: WIDE_SPAWN_COLUMN,
            ..Self::classic()
        }
    }

    /// Describe what makes this configuration unusable, if anything.
    ///
    /// Every piece must fit the board in every rotation when spawned at the
    /// spawn column.
    pub fn validation_error(&self) -> Option<String> {
        let extent = MAX_SHAPE_EXTENT as u32;
        if u32::from(self.width) < extent {
            return Some(format!(
                "board width {} is smaller than the largest piece ({})",
                self.width, extent
            ));
        }
        if u32::from(self.height) < extent {
            return Some(format!(
                "board height {} is smaller than the largest piece ({})",
                self.height, extent
            ));
        }
        if u32::from(self.spawn_column) + extent > u32::from(self.width) {
            return Some(format!(
                "spawn column {} leaves no room for a {}-wide piece on a {}-wide board",
                self.spawn_column, extent, self.width
            ));
        }
        None
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::classic()
    }
}
