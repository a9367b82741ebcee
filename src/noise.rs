// noise.rs
// Random sources for thermal noise and coincident-particle separation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use ultraviolet::DVec2;

pub trait NoiseSource: Send {
    /// Uniform sample on [-1, 1) x [-1, 1).
    fn uniform_square(&mut self) -> DVec2;

    /// Sample of N(0, sigma).
    fn normal(&mut self, sigma: f64) -> f64;

    /// Random unit vector derived from `uniform_square`.
    fn unit_vector(&mut self) -> DVec2 {
        let v = self.uniform_square();
        let mag = v.mag();
        if mag > 0.0 {
            v / mag
        } else {
            DVec2::new(1.0, 0.0)
        }
    }
}

/// PRNG-backed noise. Not reproducible unless built with `seeded`.
pub struct RandomNoise {
    rng: StdRng,
}

impl RandomNoise {
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSource for RandomNoise {
    fn uniform_square(&mut self) -> DVec2 {
        DVec2::new(self.rng.random_range(-1.0..1.0), self.rng.random_range(-1.0..1.0))
    }

    fn normal(&mut self, sigma: f64) -> f64 {
        match Normal::new(0.0, sigma) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => 0.0,
        }
    }
}

/// Zero thermal noise; coincident particles separate along +x.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuietNoise;

impl NoiseSource for QuietNoise {
    fn uniform_square(&mut self) -> DVec2 {
        DVec2::new(1.0, 0.0)
    }

    fn normal(&mut self, _sigma: f64) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_samples_stay_in_square() {
        let mut noise = RandomNoise::seeded(3);
        for _ in 0..1000 {
            let v = noise.uniform_square();
            assert!((-1.0..1.0).contains(&v.x));
            assert!((-1.0..1.0).contains(&v.y));
        }
    }

    #[test]
    fn unit_vector_is_normalized() {
        let mut noise = RandomNoise::seeded(11);
        for _ in 0..100 {
            assert!((noise.unit_vector().mag() - 1.0).abs() < 1e-9);
        }
    }
}
