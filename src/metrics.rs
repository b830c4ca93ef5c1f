//! Sample statistics and human-readable formatting for benchmark results.
//!
//! Heap usage is only observable when the process installs
//! [`TrackingAllocator`] as its global allocator:
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: mdbench::metrics::TrackingAllocator = mdbench::metrics::TrackingAllocator;
//! ```

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);

/// Errors produced by sample statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("cannot compute a median of an empty sample")]
    EmptySample,
}

/// Median of a sample: the middle value after an ascending sort, or the mean
/// of the two middle values for even-length samples.
///
/// # Errors
/// Returns [`MetricsError::EmptySample`] when `numbers` is empty.
///
/// # Example
///
/// ```
/// use mdbench::metrics::calculate_median;
///
/// assert_eq!(calculate_median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
/// ```
pub fn calculate_median(numbers: &[f64]) -> Result<f64, MetricsError> {
    if numbers.is_empty() {
        return Err(MetricsError::EmptySample);
    }
    let mut sorted = numbers.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Render a byte count with the largest unit that keeps the value >= 1.
///
/// Zero, negative and non-finite inputs render as `"0 B"`.
pub fn format_bytes(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".to_string();
    }
    #[allow(clippy::cast_possible_truncation)]
    let exponent = (bytes.ln() / 1024_f64.ln()).floor().clamp(0.0, 3.0) as i32;
    let scaled = bytes / 1024_f64.powi(exponent);
    #[allow(clippy::cast_sign_loss)]
    let unit = BYTE_UNITS[exponent as usize];
    format!("{} {unit}", trim_decimals(scaled))
}

/// Render a duration given in milliseconds as microseconds, milliseconds or
/// seconds, always with two decimals.
pub fn format_time(ms: f64) -> String {
    if ms < 1.0 {
        format!("{:.2} μs", ms * 1000.0)
    } else if ms < 1000.0 {
        format!("{ms:.2} ms")
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

/// Live heap bytes, or 0 when [`TrackingAllocator`] is not installed.
pub fn memory_usage() -> u64 {
    LIVE_BYTES.load(Ordering::Relaxed) as u64
}

// Two decimals at most, trailing zeros dropped ("1.50" -> "1.5", "1.00" -> "1").
fn trim_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Global allocator wrapper around [`System`] that counts live heap bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackingAllocator;

#[allow(unsafe_code)]
unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        LIVE_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            if new_size >= layout.size() {
                LIVE_BYTES.fetch_add(new_size - layout.size(), Ordering::Relaxed);
            } else {
                LIVE_BYTES.fetch_sub(layout.size() - new_size, Ordering::Relaxed);
            }
        }
        new_ptr
    }
}
