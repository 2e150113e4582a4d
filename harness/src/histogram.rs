use crate::distribution::{GB1, KB4, MB100, MB2};
use rand::Rng;
use std::time::Duration;

pub const BUCKET_COUNT: usize = 5;
pub const RESERVOIR_SIZE: usize = 1000;

pub const BUCKET_NAMES: [&str; BUCKET_COUNT] = ["<4K", "<2M", "<100M", "<1G", ">=1G"];

/// Latencies for one size range.
#[derive(Debug, Clone)]
pub struct Bucket {
    min_ns: u64,
    max_ns: u64,
    total_ns: u128,
    count: u64,
    samples: Vec<u64>,
}

impl Bucket {
    pub fn new() -> Self {
        Self {
            min_ns: u64::MAX,
            max_ns: 0,
            total_ns: 0,
            count: 0,
            samples: Vec::with_capacity(RESERVOIR_SIZE),
        }
    }

    pub fn record<R: Rng + ?Sized>(&mut self, latency_ns: u64, rng: &mut R) {
        self.min_ns = self.min_ns.min(latency_ns);
        self.max_ns = self.max_ns.max(latency_ns);
        self.total_ns += latency_ns as u128;
        self.count += 1;

        // reservoir sampling keeps a uniform sample of every latency seen
        if self.samples.len() < RESERVOIR_SIZE {
            self.samples.push(latency_ns);
        } else {
            let slot = rng.gen_range(0..self.count) as usize;

            if slot < RESERVOIR_SIZE {
                self.samples[slot] = latency_ns;
            }
        }
    }

    pub fn get_count(&self) -> u64 {
        self.count
    }

    pub fn get_min(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.min_ns
        }
    }

    pub fn get_max(&self) -> u64 {
        self.max_ns
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }

        self.total_ns as f64 / self.count as f64
    }

    /// Linearly interpolated percentile of the sampled latencies.
    pub fn percentile(&self, percentile: f64) -> u64 {
        if self.samples.is_empty() {
            return 0;
        }

        let mut sorted = self.samples.clone();
        sorted.sort_unstable();

        let index = percentile / 100.0 * (sorted.len() - 1) as f64;
        let lower = index.floor() as usize;
        let upper = lower + 1;

        if upper >= sorted.len() {
            return sorted[sorted.len() - 1];
        }

        let fraction = index - lower as f64;

        (sorted[lower] as f64 * (1.0 - fraction) + sorted[upper] as f64 * fraction) as u64
    }
}

impl Default for Bucket {
    fn default() -> Self {
        Self::new()
    }
}

/// Latencies of one operation, bucketed by request size.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    buckets: [Bucket; BUCKET_COUNT],
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket_index(size: usize) -> usize {
        match size {
            s if s < KB4 => 0,
            s if s < MB2 => 1,
            s if s < MB100 => 2,
            s if s < GB1 => 3,
            _ => 4,
        }
    }

    pub fn record<R: Rng + ?Sized>(&mut self, size: usize, latency: Duration, rng: &mut R) {
        let latency_ns = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);

        self.buckets[Self::bucket_index(size)].record(latency_ns, rng);
    }

    pub fn buckets(&self) -> &[Bucket; BUCKET_COUNT] {
        &self.buckets
    }

    pub fn total_count(&self) -> u64 {
        self.buckets.iter().map(Bucket::get_count).sum()
    }
}
