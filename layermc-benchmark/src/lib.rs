use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct GenerationMetrics {
    // Runs
    pub total_runs: AtomicUsize,
    pub total_run_time_us: AtomicU64,
    pub max_run_time_us: AtomicU64,

    // Detailed Breakdown
    pub total_height_scan_us: AtomicU64,
    pub total_edge_detection_us: AtomicU64,
    pub total_distance_us: AtomicU64,
    pub total_emit_us: AtomicU64,
    pub total_apply_us: AtomicU64,

    // Volume
    pub total_columns: AtomicUsize,
    pub total_block_writes: AtomicUsize,

    // Session
    pub start_time: Option<Instant>,
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn record_run(&self, duration: Duration, columns: usize) {
        self.total_runs.fetch_add(1, Ordering::Relaxed);
        self.total_columns.fetch_add(columns, Ordering::Relaxed);
        let us = duration.as_micros() as u64;
        self.total_run_time_us.fetch_add(us, Ordering::Relaxed);
        self.max_run_time_us.fetch_max(us, Ordering::Relaxed);
    }

    pub fn record_height_scan(&self, duration: Duration) {
        self.total_height_scan_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_edge_detection(&self, duration: Duration) {
        self.total_edge_detection_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_distance(&self, duration: Duration) {
        self.total_distance_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_emit(&self, duration: Duration) {
        self.total_emit_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_apply(&self, duration: Duration, writes: usize) {
        self.total_block_writes.fetch_add(writes, Ordering::Relaxed);
        self.total_apply_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn generate_report(&self) -> String {
        let uptime = self.start_time.unwrap_or_else(Instant::now).elapsed();
        let runs = self.total_runs.load(Ordering::Relaxed);
        let run_total = self.total_run_time_us.load(Ordering::Relaxed) as f64 / 1000.0; // ms
        let run_max = self.max_run_time_us.load(Ordering::Relaxed) as f64 / 1000.0; // ms
        let run_avg = if runs > 0 { run_total / runs as f64 } else { 0.0 };

        let per_run = |total: &AtomicU64| {
            let ms = total.load(Ordering::Relaxed) as f64 / 1000.0;
            if runs > 0 { ms / runs as f64 } else { 0.0 }
        };
        let scan_avg = per_run(&self.total_height_scan_us);
        let edge_avg = per_run(&self.total_edge_detection_us);
        let dist_avg = per_run(&self.total_distance_us);
        let emit_avg = per_run(&self.total_emit_us);
        let apply_avg = per_run(&self.total_apply_us);

        let columns = self.total_columns.load(Ordering::Relaxed);
        let writes = self.total_block_writes.load(Ordering::Relaxed);
        let us_per_column = if columns > 0 {
            self.total_run_time_us.load(Ordering::Relaxed) as f64 / columns as f64
        } else {
            0.0
        };

        format!(
            "LayerMC Benchmark Report\n\
             ========================\n\
             Session Duration: {:.2?}\n\n\
             [Generation]\n\
             Runs: {}\n\
             Total Time: {:.2} ms\n\
             Avg Time: {:.2} ms/run\n\
             Max Time: {:.2} ms\n\
               - Height Scan: {:.2} ms/run\n\
               - Edge Detection: {:.2} ms/run\n\
               - Distance Field: {:.2} ms/run\n\
               - Emit Actions: {:.2} ms/run\n\
               - Apply Writes: {:.2} ms/run\n\n\
             [Volume]\n\
             Columns: {}\n\
             Block Writes: {}\n\
             Cost: {:.2} us/column\n",
            uptime,
            runs, run_total, run_avg, run_max,
            scan_avg, edge_avg, dist_avg, emit_avg, apply_avg,
            columns, writes, us_per_column
        )
    }
}
