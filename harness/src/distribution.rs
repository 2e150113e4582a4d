use rand::Rng;
use std::fmt;
use std::str::FromStr;

pub const MIN_ALLOC_SIZE: usize = 8;

pub const KB4: usize = 4 * 1024;
pub const MB2: usize = 2 * 1024 * 1024;
pub const MB100: usize = 100 * 1024 * 1024;
pub const GB1: usize = 1024 * 1024 * 1024;

/// How request sizes are drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Distribution {
    /// Every size in `[MIN_ALLOC_SIZE, max)` equally likely.
    Uniform,
    /// 73% under 4K, 20% under 2M, 5% under 1G, 2% above.
    Weighted,
    /// Log-uniform, so every order of magnitude is equally likely.
    Exponential,
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Distribution::Uniform => "uniform",
            Distribution::Weighted => "weighted",
            Distribution::Exponential => "exponential",
        };

        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDistributionError(String);

impl fmt::Display for ParseDistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown distribution `{}`, expected uniform (0), weighted (1) or exponential (2)",
            self.0
        )
    }
}

impl std::error::Error for ParseDistributionError {}

impl FromStr for Distribution {
    type Err = ParseDistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "uniform" => Ok(Distribution::Uniform),
            "1" | "weighted" => Ok(Distribution::Weighted),
            "2" | "exponential" => Ok(Distribution::Exponential),
            _ => Err(ParseDistributionError(s.to_owned())),
        }
    }
}

/// Draws sizes in `[MIN_ALLOC_SIZE, max_size]` from a [`Distribution`].
#[derive(Debug, Copy, Clone)]
pub struct SizeSampler {
    distribution: Distribution,
    max_size: usize,
}

impl SizeSampler {
    pub fn new(distribution: Distribution, max_size: usize) -> Self {
        Self {
            distribution,
            max_size: max_size.max(MIN_ALLOC_SIZE),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self.distribution {
            Distribution::Uniform => self.range(rng, MIN_ALLOC_SIZE, self.max_size),
            Distribution::Weighted => self.weighted(rng),
            Distribution::Exponential => self.exponential(rng),
        }
    }

    fn weighted<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match rng.gen_range(0..100) {
            0..=72 => self.range(rng, MIN_ALLOC_SIZE, KB4),
            73..=92 => self.range(rng, KB4, MB2),
            93..=97 => self.range(rng, MB2, GB1),
            _ => self.range(rng, GB1, self.max_size),
        }
    }

    fn exponential<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u: f64 = rng.gen();
        let min = MIN_ALLOC_SIZE as f64;
        let span = (self.max_size as f64 / min).ln();
        let size = (min.ln() + u * span).exp() as usize;

        size.clamp(MIN_ALLOC_SIZE, self.max_size)
    }

    // Uniform in [low, high) with high clamped to the max size. Collapses to
    // a single value when the clamp empties the range.
    fn range<R: Rng + ?Sized>(&self, rng: &mut R, low: usize, high: usize) -> usize {
        let high = high.min(self.max_size);
        let low = low.min(high);

        if low == high {
            high
        } else {
            rng.gen_range(low..high)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn samples(distribution: Distribution, max_size: usize) -> Vec<usize> {
        let sampler = SizeSampler::new(distribution, max_size);
        let mut rng = StdRng::seed_from_u64(7);

        (0..10_000).map(|_| sampler.sample(&mut rng)).collect()
    }

    #[test]
    fn parse_names_and_numbers() {
        assert_eq!("uniform".parse::<Distribution>(), Ok(Distribution::Uniform));
        assert_eq!("1".parse::<Distribution>(), Ok(Distribution::Weighted));
        assert_eq!("Exponential".parse::<Distribution>(), Ok(Distribution::Exponential));
        assert!("3".parse::<Distribution>().is_err());
        assert!("normal".parse::<Distribution>().is_err());
    }

    #[test]
    fn every_distribution_stays_in_bounds() {
        for distribution in [
            Distribution::Uniform,
            Distribution::Weighted,
            Distribution::Exponential,
        ] {
            for max_size in [8, 100, MB2, 4 * GB1] {
                for size in samples(distribution, max_size) {
                    assert!((MIN_ALLOC_SIZE..=max_size).contains(&size));
                }
            }
        }
    }

    #[test]
    fn weighted_favors_small_sizes() {
        let small = samples(Distribution::Weighted, 4 * GB1)
            .into_iter()
            .filter(|size| *size < KB4)
            .count();

        assert!((6_800..7_800).contains(&small), "small = {small}");
    }

    #[test]
    fn exponential_spreads_over_magnitudes() {
        let all = samples(Distribution::Exponential, GB1);
        let below_4k = all.iter().filter(|size| **size < KB4).count();
        let above_2m = all.iter().filter(|size| **size >= MB2).count();

        // ln(4K/8) / ln(1G/8) is about a third
        assert!((2_800..3_800).contains(&below_4k), "below_4k = {below_4k}");
        assert!(above_2m > 2_000, "above_2m = {above_2m}");
    }

    #[test]
    fn uniform_at_minimum_is_constant() {
        assert!(samples(Distribution::Uniform, MIN_ALLOC_SIZE)
            .iter()
            .all(|size| *size == MIN_ALLOC_SIZE));
    }
}
