//! RNG module - seeded piece sources
//!
//! A session draws every new piece from a [`PieceSource`]. Three sources are
//! provided:
//!
//! - [`UniformSource`]: each spawn is an independent uniform pick of the seven kinds
//! - [`BagSource`]: the "7-bag" randomizer; each bag holds one of each kind, shuffled
//! - [`ScriptedSource`]: cycles a fixed sequence (puzzles, replays, tests)
//!
//! All randomness comes from [`SimpleRng`], a small LCG, so a seed fully
//! determines the piece sequence.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low bits of a power-of-two LCG have short periods.
        (self.next_u32() >> 16) % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Supplies the kind of each newly spawned piece
pub trait PieceSource {
    /// Kind of the next piece to spawn
    fn next_kind(&mut self) -> PieceKind;
}

/// Independent uniform draw per spawn
#[derive(Debug, Clone)]
pub struct UniformSource {
    rng: SimpleRng,
}

impl UniformSource {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }
}

impl PieceSource for UniformSource {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.next_range(PieceKind::ALL.len() as u32) as usize]
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct BagSource {
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    /// RNG for shuffling
    rng: SimpleRng,
}

impl BagSource {
    /// Create a new bag source with the given seed
    pub fn new(seed: u32) -> Self {
        let mut source = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        source.refill_bag();
        source
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }
}

impl PieceSource for BagSource {
    fn next_kind(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }
}

/// Cycles through a fixed, non-empty sequence of kinds
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    kinds: Vec<PieceKind>,
    next: usize,
}

impl ScriptedSource {
    /// Panics if `kinds` is empty.
    pub fn new(kinds: Vec<PieceKind>) -> Self {
        assert!(!kinds.is_empty(), "scripted source needs at least one kind");
        Self { kinds, next: 0 }
    }

    /// A source that always yields `kind`
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }
}

impl PieceSource for ScriptedSource {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.next];
        self.next = (self.next + 1) % self.kinds.len();
        kind
    }
}
