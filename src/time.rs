//! Monotonic clock abstraction used by the scheduler and the periodic guards.
//!
//! Implement these traits for your platform timer (`embassy_time`, a HAL
//! millisecond counter, `std::time::Instant`, ...). Everything in this crate
//! reasons in milliseconds through [`TimeDuration::as_millis`].

/// A monotonic clock.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Span of time between two instants.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// A point on the monotonic clock.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Returns true once at least `period` has passed since `since`.
///
/// `None` means "never ran", which is always due.
#[inline]
pub(crate) fn period_elapsed<I: TimeInstant>(since: Option<I>, now: I, period: I::Duration) -> bool {
    match since {
        None => true,
        Some(last) => now.duration_since(last).as_millis() >= period.as_millis(),
    }
}

/// Time left until `period` has passed since `since`, ZERO if already due.
#[inline]
pub(crate) fn remaining<I: TimeInstant>(since: Option<I>, now: I, period: I::Duration) -> I::Duration {
    match since {
        None => I::Duration::ZERO,
        Some(last) => period.saturating_sub(now.duration_since(last)),
    }
}
