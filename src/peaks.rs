// Sweep-line peak concurrency over (timestamp, delta) join/leave events.

use chrono::{DateTime, Utc};

use crate::models::PeakInterval;

/// Computes the interval of maximum simultaneous viewers from join (+1) and
/// leave (-1) events sorted ascending by timestamp, ties in input order.
///
/// When a new maximum is reached the interval collapses to that instant;
/// afterwards the end is extended exactly once, to the timestamp of the next
/// event. It is NOT extended to the end of a sustained plateau - that is the
/// original service's behavior and is kept as-is (see DESIGN.md).
pub fn count_peaks(events: &[(DateTime<Utc>, i64)]) -> PeakInterval {
    let mut current = 0i64;
    let mut peak = PeakInterval::zero();

    for &(ts, delta) in events {
        current += delta;
        if current > peak.count {
            peak.count = current;
            peak.start_time = Some(ts);
            peak.end_time = Some(ts);
        } else if peak.end_time == peak.start_time {
            peak.end_time = Some(ts);
        }
    }
    peak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_no_events_yields_zero_interval() {
        let peak = count_peaks(&[]);
        assert_eq!(peak, PeakInterval::zero());
    }

    #[test]
    fn test_two_overlapping_sessions() {
        let events = [(ts(1), 1), (ts(2), 1), (ts(3), -1), (ts(4), -1)];
        let peak = count_peaks(&events);
        assert_eq!(peak.count, 2);
        assert_eq!(peak.start_time, Some(ts(2)));
        assert_eq!(peak.end_time, Some(ts(3)));
    }

    #[test]
    fn test_single_session() {
        let events = [(ts(10), 1), (ts(20), -1)];
        let peak = count_peaks(&events);
        assert_eq!(peak.count, 1);
        assert_eq!(peak.start_time, Some(ts(10)));
        assert_eq!(peak.end_time, Some(ts(20)));
    }

    #[test]
    fn test_end_extended_only_once() {
        // Peak of 2 at t2; end extends to t3 and must not move to t4 even
        // though the count stays below the peak.
        let events = [
            (ts(1), 1),
            (ts(2), 1),
            (ts(3), -1),
            (ts(4), 1),
            (ts(5), -1),
            (ts(6), -1),
        ];
        let peak = count_peaks(&events);
        assert_eq!(peak.count, 2);
        assert_eq!(peak.start_time, Some(ts(2)));
        assert_eq!(peak.end_time, Some(ts(3)));
    }

    #[test]
    fn test_later_higher_peak_resets_interval() {
        let events = [
            (ts(1), 1),
            (ts(2), 1),
            (ts(3), -1),
            (ts(4), -1),
            (ts(5), 1),
            (ts(6), 1),
            (ts(7), 1),
            (ts(8), -1),
            (ts(9), -1),
            (ts(10), -1),
        ];
        let peak = count_peaks(&events);
        assert_eq!(peak.count, 3);
        assert_eq!(peak.start_time, Some(ts(7)));
        assert_eq!(peak.end_time, Some(ts(8)));
    }

    #[test]
    fn test_equal_peak_does_not_restart_interval() {
        // Second peak of 2 at t5 equals the first; the first interval stays.
        let events = [
            (ts(1), 1),
            (ts(2), 1),
            (ts(3), -1),
            (ts(5), 1),
            (ts(6), -1),
            (ts(7), -1),
        ];
        let peak = count_peaks(&events);
        assert_eq!(peak.count, 2);
        assert_eq!(peak.start_time, Some(ts(2)));
        assert_eq!(peak.end_time, Some(ts(3)));
    }
}
