//! Deterministic RNG streams. Trees must replay identically for a given seed.
//!
//! **Not** cryptographic.

pub trait DeterministicRng {
    fn next_u64(&mut self) -> u64;

    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform float in `[0, 1)` built from 24 mantissa bits.
    fn next_f32_unit(&mut self) -> f32 {
        let bits = self.next_u32() >> 8;
        (bits as f32) / ((1u32 << 24) as f32)
    }

    fn next_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }

    /// Uniform index in `0..len`. Returns 0 when `len == 0`.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        // Multiply-shift keeps the bias below 2^-32 without a rejection loop.
        ((self.next_u32() as u64 * len as u64) >> 32) as usize
    }
}

/// SplitMix64: fast seeding generator, good enough for gameplay randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl DeterministicRng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GAMMA);
        mix64(self.state)
    }
}

/// SplitMix64 finalizer.
pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Derive an independent seed for `(agent, stream)` from a global seed.
pub fn derive_seed(global_seed: u64, agent_id: u64, stream: u64) -> u64 {
    let x = global_seed
        ^ mix64(agent_id.wrapping_add(SplitMix64::GAMMA))
        ^ mix64(stream);
    mix64(x)
}
