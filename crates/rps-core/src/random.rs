//! CPU move sources
//!
//! The CPU opponent draws its move through [`MoveSource`], so hosts and tests
//! decide where the randomness comes from.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::moves::Move;

/// Supplies the CPU's move for a round
pub trait MoveSource {
    fn next_move(&mut self) -> Move;
}

/// Seeded random number generator
///
/// Deterministic: same seed + stream = same sequence of moves.
/// xorshift64* under the hood.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a generator from arbitrary seed bytes and a stream index
    pub fn new(seed: &[u8], stream: u32) -> Self {
        let mut state = 0u64;
        for (i, chunk) in seed.chunks(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes[..chunk.len()].copy_from_slice(chunk);
            state ^= u64::from_le_bytes(bytes).rotate_left(i as u32 * 7);
        }
        state ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);

        // xorshift never leaves zero
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }

        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }
        rng
    }

    pub fn from_u64(seed: u64) -> Self {
        Self::new(&seed.to_le_bytes(), 0)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Value in [0, max); 0 when max is 0
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }
}

impl MoveSource for SeededRng {
    fn next_move(&mut self) -> Move {
        Move::ALL[self.next_range(Move::ALL.len() as u32) as usize]
    }
}

/// Uniform moves from any `rand` generator
#[derive(Clone, Debug)]
pub struct RandMoves<R> {
    rng: R,
}

impl<R: Rng> RandMoves<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandMoves<StdRng> {
    /// OS-seeded generator, the default CPU opponent
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> MoveSource for RandMoves<R> {
    fn next_move(&mut self) -> Move {
        Move::ALL[self.rng.gen_range(0..Move::ALL.len())]
    }
}

/// Replays a fixed cycle of moves. An empty script always throws rock.
#[derive(Clone, Debug, Default)]
pub struct ScriptedMoves {
    moves: Vec<Move>,
    cursor: usize,
}

impl ScriptedMoves {
    pub fn new(moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl MoveSource for ScriptedMoves {
    fn next_move(&mut self) -> Move {
        if self.moves.is_empty() {
            return Move::Rock;
        }
        let m = self.moves[self.cursor % self.moves.len()];
        self.cursor += 1;
        m
    }
}
