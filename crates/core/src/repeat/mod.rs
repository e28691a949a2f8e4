use std::time::Duration;

use crate::{Result, TunerMetronomeError};

/// Identifies one repeating schedule created by [`RepeatTimer::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepeatHandle(u64);

#[derive(Debug, Clone)]
struct Schedule {
    handle: RepeatHandle,
    interval: Duration,
    next_due: Duration,
}

/// Cancellable repeating timer driven by an explicit clock.
///
/// Nothing fires on its own: the owner calls [`RepeatTimer::advance`] from its
/// event loop and reacts to the handles that came due. A cancelled handle is
/// removed immediately and never reported again.
#[derive(Debug, Default)]
pub struct RepeatTimer {
    now: Duration,
    next_id: u64,
    schedules: Vec<Schedule>,
}

impl RepeatTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the timer's clock since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedules a repeat whose first tick is one `interval` from now.
    pub fn start(&mut self, interval: Duration) -> Result<RepeatHandle> {
        if interval.is_zero() {
            return Err(TunerMetronomeError::msg(
                "repeat interval must be greater than zero",
            ));
        }

        let handle = RepeatHandle(self.next_id);
        self.next_id += 1;
        self.schedules.push(Schedule {
            handle,
            interval,
            next_due: self.now + interval,
        });
        Ok(handle)
    }

    /// Removes the schedule. Returns `false` when the handle was not active.
    pub fn cancel(&mut self, handle: RepeatHandle) -> bool {
        let before = self.schedules.len();
        self.schedules.retain(|schedule| schedule.handle != handle);
        self.schedules.len() != before
    }

    pub fn is_active(&self, handle: RepeatHandle) -> bool {
        self.schedules.iter().any(|schedule| schedule.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.schedules.len()
    }

    /// Moves the clock forward and reports, for every schedule that came due,
    /// how many ticks elapsed. Entries are ordered by their first due tick
    /// (ties resolved by creation order). The work done is independent of how
    /// many intervals `elapsed` spans.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<(RepeatHandle, u64)> {
        let target = self.now.saturating_add(elapsed);
        let mut fired: Vec<(Duration, RepeatHandle, u64)> = Vec::new();

        for schedule in &mut self.schedules {
            if schedule.next_due > target {
                continue;
            }

            let interval = schedule.interval.as_nanos();
            let overshoot = (target - schedule.next_due).as_nanos();
            let ticks = u64::try_from(overshoot / interval + 1).unwrap_or(u64::MAX);
            // Remainder is below one interval, so it fits in u64 nanoseconds.
            let into_period = Duration::from_nanos((overshoot % interval) as u64);

            fired.push((schedule.next_due, schedule.handle, ticks));
            schedule.next_due = (target - into_period).saturating_add(schedule.interval);
        }

        self.now = target;
        fired.sort_by_key(|(first_due, handle, _)| (*first_due, handle.0));
        fired
            .into_iter()
            .map(|(_, handle, ticks)| (handle, ticks))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(200);

    #[test]
    fn fires_once_per_elapsed_interval() {
        let mut timer = RepeatTimer::new();
        let handle = timer.start(TICK).unwrap();

        assert!(timer.advance(Duration::from_millis(199)).is_empty());
        assert_eq!(timer.advance(Duration::from_millis(1)), vec![(handle, 1)]);
        assert_eq!(timer.advance(Duration::from_millis(450)), vec![(handle, 2)]);
        assert_eq!(timer.now(), Duration::from_millis(650));

        // 650 -> 800 is the next tick; the 50 ms left over carries forward.
        assert!(timer.advance(Duration::from_millis(149)).is_empty());
        assert_eq!(timer.advance(Duration::from_millis(1)), vec![(handle, 1)]);
    }

    #[test]
    fn cancelled_schedule_never_fires() {
        let mut timer = RepeatTimer::new();
        let handle = timer.start(TICK).unwrap();
        timer.advance(Duration::from_millis(100));

        assert!(timer.cancel(handle));
        assert!(!timer.is_active(handle));
        assert!(timer.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn cancelling_unknown_handle_is_harmless() {
        let mut timer = RepeatTimer::new();
        let handle = timer.start(TICK).unwrap();
        timer.cancel(handle);

        assert!(!timer.cancel(handle));
        assert_eq!(timer.active_count(), 0);
    }

    #[test]
    fn orders_schedules_by_first_due_tick() {
        let mut timer = RepeatTimer::new();
        let slow = timer.start(Duration::from_millis(300)).unwrap();
        let fast = timer.start(Duration::from_millis(200)).unwrap();

        let fired = timer.advance(Duration::from_millis(600));
        assert_eq!(fired, vec![(fast, 3), (slow, 2)]);
    }

    #[test]
    fn huge_elapsed_time_is_counted_not_enumerated() {
        let mut timer = RepeatTimer::new();
        let handle = timer.start(TICK).unwrap();

        let fired = timer.advance(Duration::from_millis(1_000_000_000));
        assert_eq!(fired, vec![(handle, 5_000_000)]);

        let fired = timer.advance(Duration::from_millis(u64::MAX));
        assert_eq!(fired.len(), 1);
        assert!(fired[0].1 > 5_000_000);
        assert_eq!(timer.advance(TICK), vec![(handle, 1)]);
    }

    #[test]
    fn rejects_zero_interval() {
        let mut timer = RepeatTimer::new();
        assert!(timer.start(Duration::ZERO).is_err());
    }
}
