//! Millisecond tick arithmetic
//!
//! The engine is driven by a free-running `u32` millisecond counter that
//! wraps after ~49 days. All comparisons go through wrapping subtraction.

/// Milliseconds since an arbitrary epoch, wrapping
pub type Millis = u32;

/// Time elapsed from `since` to `now`, correct across counter wraparound
#[inline]
pub const fn elapsed(now: Millis, since: Millis) -> u32 {
    now.wrapping_sub(since)
}

/// True once at least `interval` ms have passed since `since`
#[inline]
pub const fn has_elapsed(now: Millis, since: Millis, interval: u32) -> bool {
    elapsed(now, since) >= interval
}
