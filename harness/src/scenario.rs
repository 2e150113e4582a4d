use crate::config::BenchConfig;
use crate::distribution::SizeSampler;
use crate::histogram::Histogram;
use crate::target::Target;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::{debug, info, warn};

const RESIZE_START_SIZE: usize = 1024;
const MAX_ELEMENT_SIZE: usize = 16;

/// Latency histograms for each measured operation.
#[derive(Debug, Clone, Default)]
pub struct Histograms {
    pub allocate: Histogram,
    pub zero_allocate: Histogram,
    pub resize: Histogram,
    pub release: Histogram,
}

impl Histograms {
    pub fn named(&self) -> [(&'static str, &Histogram); 4] {
        [
            ("allocate", &self.allocate),
            ("zero-allocate", &self.zero_allocate),
            ("resize", &self.resize),
            ("release", &self.release),
        ]
    }
}

pub struct Bench<'a, T: Target + ?Sized> {
    config: &'a BenchConfig,
    target: &'a T,
    sampler: SizeSampler,
    rng: StdRng,
    histograms: Histograms,
}

impl<'a, T: Target + ?Sized> Bench<'a, T> {
    pub fn new(config: &'a BenchConfig, target: &'a T) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            target,
            sampler: SizeSampler::new(config.distribution, config.max_alloc_size),
            rng,
            histograms: Histograms::default(),
        }
    }

    pub fn run(mut self) -> Histograms {
        self.sequential_alloc_release();
        self.zero_allocate();
        self.resize_chain();

        self.histograms
    }

    pub fn sequential_alloc_release(&mut self) {
        info!(allocator = self.target.name(), "benchmark: sequential allocate and release");

        let mut blocks = Vec::with_capacity(self.config.allocations);

        for i in 0..self.config.allocations {
            let size = self.sampler.sample(&mut self.rng);
            let start = Instant::now();
            let ptr = self.target.allocate(size);
            let elapsed = start.elapsed();

            if ptr.is_null() {
                continue;
            }

            self.touch(ptr, size, i);
            self.histograms.allocate.record(size, elapsed, &mut self.rng);
            blocks.push((ptr, size));
        }

        self.report_failures("allocate", blocks.len());

        for (ptr, size) in blocks {
            let start = Instant::now();
            unsafe { self.target.release(ptr) };
            let elapsed = start.elapsed();

            self.histograms.release.record(size, elapsed, &mut self.rng);
        }
    }

    pub fn zero_allocate(&mut self) {
        info!(allocator = self.target.name(), "benchmark: zero-allocate");

        let mut blocks = Vec::with_capacity(self.config.allocations);

        for _ in 0..self.config.allocations {
            let total = self.sampler.sample(&mut self.rng);
            let element_size = self.rng.gen_range(1..=MAX_ELEMENT_SIZE);
            let count = (total / element_size).max(1);

            let start = Instant::now();
            let ptr = self.target.zero_allocate(count, element_size);
            let elapsed = start.elapsed();

            if ptr.is_null() {
                continue;
            }

            self.histograms.zero_allocate.record(total, elapsed, &mut self.rng);
            blocks.push(ptr);
        }

        self.report_failures("zero-allocate", blocks.len());

        for ptr in blocks {
            unsafe { self.target.release(ptr) };
        }
    }

    pub fn resize_chain(&mut self) {
        info!(allocator = self.target.name(), "benchmark: resize");

        let mut ptr = self.target.allocate(RESIZE_START_SIZE);

        if ptr.is_null() {
            warn!(size = RESIZE_START_SIZE, "initial allocation failed, skipping resize");
            return;
        }

        unsafe { ptr.write_bytes(0xaa, RESIZE_START_SIZE) };

        let mut resized = 0;

        for i in 0..self.config.allocations {
            let new_size = self.sampler.sample(&mut self.rng);
            let start = Instant::now();
            let new_ptr = unsafe { self.target.resize(ptr, new_size) };
            let elapsed = start.elapsed();

            // a failed resize leaves the old block in place
            if new_ptr.is_null() {
                continue;
            }

            ptr = new_ptr;
            resized += 1;
            self.touch(ptr, new_size, i);
            self.histograms.resize.record(new_size, elapsed, &mut self.rng);
        }

        self.report_failures("resize", resized);

        unsafe { self.target.release(ptr) };
    }

    fn touch(&self, ptr: *mut u8, size: usize, i: usize) {
        if self.config.memset {
            unsafe { ptr.write_bytes((i % 256) as u8, size) };
        }
    }

    fn report_failures(&self, operation: &str, succeeded: usize) {
        let failed = self.config.allocations - succeeded;

        if failed > 0 {
            warn!(operation, failed, "calls returned null");
        } else {
            debug!(operation, "all calls succeeded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Distribution;
    use crate::target::{MapTarget, SystemTarget, TargetKind};

    fn small_config(distribution: Distribution) -> BenchConfig {
        BenchConfig {
            allocations: 200,
            max_alloc_size: 64 * 1024,
            distribution,
            memset: true,
            seed: Some(42),
            target: TargetKind::Mapalloc,
        }
    }

    #[test]
    fn every_operation_is_recorded() {
        let config = small_config(Distribution::Uniform);
        let target = MapTarget::new();
        let histograms = Bench::new(&config, &target).run();

        assert_eq!(histograms.allocate.total_count(), 200);
        assert_eq!(histograms.release.total_count(), 200);
        assert_eq!(histograms.zero_allocate.total_count(), 200);
        assert_eq!(histograms.resize.total_count(), 200);
    }

    #[test]
    fn sizes_land_in_small_buckets() {
        let config = small_config(Distribution::Exponential);
        let target = MapTarget::new();
        let histograms = Bench::new(&config, &target).run();

        for (_, histogram) in histograms.named() {
            assert_eq!(histogram.buckets()[2].get_count(), 0);
            assert_eq!(histogram.buckets()[3].get_count(), 0);
            assert_eq!(histogram.buckets()[4].get_count(), 0);
        }
    }

    #[test]
    fn system_target_runs() {
        let config = BenchConfig {
            target: TargetKind::System,
            ..small_config(Distribution::Weighted)
        };
        let histograms = Bench::new(&config, &SystemTarget).run();

        assert_eq!(histograms.allocate.total_count(), 200);
    }
}
