//! Shared test utilities for the zhvi-lookup workspace.
//!
//! This crate provides common testing infrastructure including:
//! - CSV fixtures shaped like the upstream export
//! - Temporary export files on disk
//! - Float comparison macros
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;

pub use fixtures::*;

use std::io::Write;

/// Write `contents` to a temporary `.csv` file that lives as long as the handle.
pub fn temp_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(contents.as_bytes()).expect("write temp csv");
    file.flush().expect("flush temp csv");
    file
}

/// Assert that two numbers are within `tolerance` of each other.
///
/// Both sides are widened to `f64`, so index values parsed from the CSV can
/// be compared against integer literals.
///
/// ```ignore
/// assert_approx_eq!(summary.max.unwrap().value, 510_000, 1e-6);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr $(,)?) => {{
        let (actual, expected, tolerance) = ($actual as f64, $expected as f64, $tolerance as f64);
        assert!(
            (actual - expected).abs() <= tolerance,
            "values differ by more than {}: actual {}, expected {}",
            tolerance,
            actual,
            expected
        );
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_accepts_close_values() {
        assert_approx_eq!(250_000.5_f64, 250_000.5, 0.0);
        assert_approx_eq!(100_070.0004_f64, 100_070, 0.001);
        assert_approx_eq!(-1.5_f32, -1.5, 1e-6);
    }

    #[test]
    #[should_panic(expected = "values differ by more than")]
    fn test_approx_eq_rejects_distant_values() {
        assert_approx_eq!(510_000.0, 500_000.0, 1.0);
    }

    #[test]
    fn test_synthetic_csv_shape() {
        let csv = synthetic_csv(3, 14);
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("RegionName,2000-01,"));
        assert!(header.ends_with(",2001-02"));
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn test_temp_csv_round_trips_contents() {
        let file = temp_csv(DUPLICATE_CSV);
        let read = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(read, DUPLICATE_CSV);
    }
}
