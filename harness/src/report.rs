use crate::histogram::{Bucket, Histogram, BUCKET_NAMES};
use std::fmt::Write;

const BAR_WIDTH: u64 = 20;

/// Formats a latency in nanoseconds with a unit that keeps it readable.
pub fn format_ns(ns: f64) -> String {
    if ns < 1_000.0 {
        format!("{ns:.0}ns")
    } else if ns < 1_000_000.0 {
        format!("{:.2}us", ns / 1_000.0)
    } else if ns < 1_000_000_000.0 {
        format!("{:.2}ms", ns / 1_000_000.0)
    } else {
        format!("{:.2}s", ns / 1_000_000_000.0)
    }
}

fn bar(count: u64, total: u64) -> String {
    if total == 0 {
        return String::new();
    }

    "#".repeat((count * BAR_WIDTH / total) as usize)
}

fn row(out: &mut String, name: &str, bucket: &Bucket, total: u64) {
    let _ = writeln!(
        out,
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}  {}",
        name,
        bucket.get_count(),
        format_ns(bucket.get_min() as f64),
        format_ns(bucket.get_max() as f64),
        format_ns(bucket.mean()),
        format_ns(bucket.percentile(50.0) as f64),
        format_ns(bucket.percentile(90.0) as f64),
        format_ns(bucket.percentile(99.0) as f64),
        bar(bucket.get_count(), total),
    );
}

/// Renders one operation's histogram as a table, skipping empty size ranges.
pub fn render(name: &str, histogram: &Histogram) -> String {
    let total = histogram.total_count();
    let mut out = String::new();

    let _ = writeln!(out, "== {name} ({total} operations) ==");
    let _ = writeln!(
        out,
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}  Distribution",
        "Size Range", "Operations", "Min", "Max", "Avg", "P50", "P90", "P99"
    );

    for (bucket_name, bucket) in BUCKET_NAMES.iter().zip(histogram.buckets()) {
        if bucket.get_count() > 0 {
            row(&mut out, bucket_name, bucket, total);
        }
    }

    out
}

pub fn render_all<'a, 'b>(
    histograms: impl IntoIterator<Item = (&'a str, &'b Histogram)>,
) -> String {
    histograms
        .into_iter()
        .map(|(name, histogram)| render(name, histogram))
        .collect::<Vec<_>>()
        .join("\n")
}
