//! Deterministic RNG stubs for unit tests.
//!
//! `StandardUniform` samples an `f32` from the high 24 bits of `next_u32`,
//! so encoding a target draw into those bits lets tests script the exact
//! probability stream the engine sees.

use rand::RngCore;

fn encode(draw: f32) -> u32 {
    let fraction = ((draw * 16_777_216.0) as u32).min(0x00FF_FFFF);
    fraction << 8
}

/// Yields the same `f32` draw forever.
///
/// `ConstDraw(1.0)` fails every probability check (the draw saturates just
/// below 1.0); `ConstDraw(0.0)` passes every check.
pub(crate) struct ConstDraw(pub f32);

impl RngCore for ConstDraw {
    fn next_u32(&mut self) -> u32 {
        encode(self.0)
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }
}

/// Plays back a fixed sequence of `f32` draws, repeating the last entry once
/// exhausted.
pub(crate) struct ScriptedDraws {
    draws: Vec<f32>,
    next: usize,
}

impl ScriptedDraws {
    pub fn new(draws: &[f32]) -> Self {
        assert!(!draws.is_empty());
        ScriptedDraws {
            draws: draws.to_vec(),
            next: 0,
        }
    }
}

impl RngCore for ScriptedDraws {
    fn next_u32(&mut self) -> u32 {
        let idx = self.next.min(self.draws.len() - 1);
        self.next += 1;
        encode(self.draws[idx])
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }
}
