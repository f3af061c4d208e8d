//! Quiet-hour window evaluation.
//!
//! Quiet hours suppress push and email delivery only; the notification row
//! is persisted regardless so the pull feed stays complete. Windows are
//! clock-of-day pairs with inclusive boundaries, and a start later than the
//! end wraps across midnight (22:00-07:00 covers the whole night).

use chrono::NaiveTime;

/// Whether `at` falls inside the window `[start, end]`, wrapping across
/// midnight when `start > end`.
pub fn window_contains(start: NaiveTime, end: NaiveTime, at: NaiveTime) -> bool {
    if start <= end {
        at >= start && at <= end
    } else {
        at >= start || at <= end
    }
}

/// Whether `at` falls inside an optional quiet window.
///
/// A recipient without a configured window (either bound absent) is never
/// quiet.
pub fn is_quiet(start: Option<NaiveTime>, end: Option<NaiveTime>, at: NaiveTime) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => window_contains(start, end, at),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn same_day_window_contains_interior() {
        assert!(window_contains(t(13, 0), t(15, 0), t(14, 0)));
    }

    #[test]
    fn same_day_window_boundaries_are_inclusive() {
        assert!(window_contains(t(13, 0), t(15, 0), t(13, 0)));
        assert!(window_contains(t(13, 0), t(15, 0), t(15, 0)));
    }

    #[test]
    fn same_day_window_excludes_outside() {
        assert!(!window_contains(t(13, 0), t(15, 0), t(12, 59)));
        assert!(!window_contains(t(13, 0), t(15, 0), t(15, 1)));
    }

    #[test]
    fn overnight_window_wraps_across_midnight() {
        let start = t(22, 0);
        let end = t(7, 0);
        assert!(window_contains(start, end, t(23, 30)));
        assert!(window_contains(start, end, t(0, 0)));
        assert!(window_contains(start, end, t(6, 59)));
        assert!(!window_contains(start, end, t(12, 0)));
        assert!(!window_contains(start, end, t(21, 59)));
        assert!(!window_contains(start, end, t(7, 1)));
    }

    #[test]
    fn overnight_window_boundaries_are_inclusive() {
        assert!(window_contains(t(22, 0), t(7, 0), t(22, 0)));
        assert!(window_contains(t(22, 0), t(7, 0), t(7, 0)));
    }

    #[test]
    fn missing_window_is_never_quiet() {
        assert!(!is_quiet(None, None, t(3, 0)));
        assert!(!is_quiet(Some(t(22, 0)), None, t(3, 0)));
        assert!(!is_quiet(None, Some(t(7, 0)), t(3, 0)));
    }

    #[test]
    fn configured_window_is_quiet() {
        assert!(is_quiet(Some(t(22, 0)), Some(t(7, 0)), t(2, 0)));
    }
}
