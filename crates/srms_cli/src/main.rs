//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `srms_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use srms_core::{compute_result, core_version, ping};

fn main() {
    println!("srms_core ping={}", ping());
    println!("srms_core version={}", core_version());

    let sample = compute_result(&[90.0, 90.0, 90.0, 90.0, 20.0]);
    println!(
        "srms_core sample total={}/{} cgpa={:.2} grade={} status={}",
        sample.total_obtained, sample.total_max, sample.cgpa, sample.grade, sample.status
    );
}
