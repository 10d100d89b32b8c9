//! Deterministic RNG helpers.
//!
//! Small and dependency-free; **not** cryptographic. Used wherever a decision must be
//! reproducible from a seed (variant selection, wander jitter).

pub trait DeterministicRng {
    fn next_u64(&mut self) -> u64;

    /// Uniform float in `[0, 1)` built from the top 24 bits.
    fn next_f32_unit(&mut self) -> f32 {
        let x = (self.next_u64() >> 40) as u32;
        (x as f32) / ((1u32 << 24) as f32)
    }

    /// Uniform float in `[-1, 1)`.
    fn next_f32_signed(&mut self) -> f32 {
        self.next_f32_unit() * 2.0 - 1.0
    }

    /// Index drawn proportionally to `weights`.
    ///
    /// Negative and non-finite weights count as zero. Returns `None` when the slice is empty
    /// or every weight is zero.
    fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let weight = |w: f32| if w.is_finite() { w.max(0.0) } else { 0.0 };
        let total: f32 = weights.iter().copied().map(weight).sum();
        if total <= 0.0 {
            return None;
        }

        let mut pick = self.next_f32_unit() * total;
        let mut last_positive = None;
        for (i, w) in weights.iter().copied().map(weight).enumerate() {
            if w <= 0.0 {
                continue;
            }
            if pick < w {
                return Some(i);
            }
            pick -= w;
            last_positive = Some(i);
        }
        // Float rounding can leave `pick` marginally above the final bucket.
        last_positive
    }
}

/// SplitMix64 generator: cheap to seed, good enough for gameplay decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from a string (e.g. a creature's spawn seed), stable across platforms.
    pub fn from_str_seed(seed: &str) -> Self {
        let mut h: u64 = 0xCBF2_9CE4_8422_2325;
        for b in seed.bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(0x0000_0100_0000_01B3);
        }
        Self::new(mix64(h))
    }
}

impl DeterministicRng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        mix64(self.state)
    }
}

pub fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

pub fn derive_seed(global_seed: u64, entity_id: u64, stream: u64) -> u64 {
    mix64(global_seed ^ mix64(entity_id.wrapping_add(0x9E37_79B9_7F4A_7C15)) ^ mix64(stream))
}
