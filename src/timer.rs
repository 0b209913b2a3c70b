//! Per-question countdown
//!
//! The countdown never sleeps or spawns anything. It asks its host to deliver
//! an [`AlarmMessage`] one second later through a `schedule` callback, and the
//! host hands the alarm back to [`Countdown::receive_alarm`] when it fires.
//! Each countdown carries a generation number; cancelling or restarting
//! retires the generation, so alarms that were already scheduled are dropped
//! when they arrive instead of ticking a countdown that no longer exists.
//!
//! [`Scheduler`] is a small deadline queue for hosts that drive the game from
//! a real clock.

use std::time::Duration;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::constants::timer::TICK_INTERVAL;

/// Alarm messages for timed events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// One second has elapsed on a countdown
    Tick {
        /// Generation of the countdown that scheduled this alarm
        countdown: u64,
    },
}

/// What a delivered alarm meant for the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A second elapsed; carries the seconds left
    Tick(u64),
    /// The countdown reached zero
    Expired,
}

/// A cancellable one-hertz countdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Countdown {
    generation: u64,
    remaining: u64,
    active: bool,
}

impl Countdown {
    /// Starts counting down from `seconds`, superseding any running countdown
    ///
    /// # Arguments
    ///
    /// * `seconds` - Starting value of the countdown
    /// * `schedule` - Callback that delivers an alarm after a delay
    pub fn start<S: FnMut(AlarmMessage, Duration)>(&mut self, seconds: u64, mut schedule: S) {
        self.generation += 1;
        self.remaining = seconds;
        self.active = true;

        schedule(
            AlarmMessage::Tick {
                countdown: self.generation,
            },
            TICK_INTERVAL,
        );
    }

    /// Stops the countdown; alarms already scheduled will be ignored
    ///
    /// Cancelling an inactive countdown does nothing.
    pub fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.generation += 1;
        }
    }

    /// Whether a countdown is running
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds left on the current countdown
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Handles a delivered alarm
    ///
    /// Returns `None` for alarms of a cancelled or superseded countdown.
    /// Otherwise one second is taken off: while time remains the next alarm
    /// is scheduled and [`TimerEvent::Tick`] returned, and at zero the
    /// countdown stops and [`TimerEvent::Expired`] is returned exactly once.
    pub fn receive_alarm<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        alarm: AlarmMessage,
        mut schedule: S,
    ) -> Option<TimerEvent> {
        let AlarmMessage::Tick { countdown } = alarm;

        if !self.active || countdown != self.generation {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);

        if self.remaining == 0 {
            self.active = false;
            Some(TimerEvent::Expired)
        } else {
            schedule(alarm, TICK_INTERVAL);
            Some(TimerEvent::Tick(self.remaining))
        }
    }
}

/// Pending alarms ordered by deadline
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<(Instant, AlarmMessage)>,
}

impl Scheduler {
    /// Schedules `alarm` to fire `delay` from now
    pub fn schedule(&mut self, alarm: AlarmMessage, delay: Duration) {
        self.schedule_from(Instant::now(), alarm, delay);
    }

    /// Schedules `alarm` to fire `delay` after `now`
    pub fn schedule_from(&mut self, now: Instant, alarm: AlarmMessage, delay: Duration) {
        let deadline = now + delay;
        let index = self.pending.partition_point(|(due, _)| *due <= deadline);
        self.pending.insert(index, (deadline, alarm));
    }

    /// The earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|(due, _)| *due)
    }

    /// Removes and returns every alarm due at `now`, earliest first
    pub fn pop_due(&mut self, now: Instant) -> Vec<AlarmMessage> {
        let due = self.pending.partition_point(|(deadline, _)| *deadline <= now);
        self.pending
            .drain(..due)
            .map(|(_, alarm)| alarm)
            .collect_vec()
    }

    /// Number of pending alarms
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_ticks_then_expires_once() {
        let mut countdown = Countdown::default();
        let mut scheduled = Vec::new();

        countdown.start(3, |alarm, delay| scheduled.push((alarm, delay)));
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].1, TICK_INTERVAL);
        assert!(countdown.is_active());

        let mut events = Vec::new();
        while let Some((alarm, _)) = scheduled.pop() {
            if let Some(event) = countdown.receive_alarm(alarm, |a, d| scheduled.push((a, d))) {
                events.push(event);
            }
        }

        assert_eq!(
            events,
            vec![TimerEvent::Tick(2), TimerEvent::Tick(1), TimerEvent::Expired]
        );
        assert!(!countdown.is_active());
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn test_expired_countdown_ignores_repeat_alarm() {
        let mut countdown = Countdown::default();
        let mut alarm = None;

        countdown.start(1, |a, _| alarm = Some(a));
        let alarm = alarm.unwrap();

        assert_eq!(
            countdown.receive_alarm(alarm, |_, _| {}),
            Some(TimerEvent::Expired)
        );
        assert_eq!(countdown.receive_alarm(alarm, |_, _| {}), None);
    }

    #[test]
    fn test_cancelled_countdown_drops_alarm() {
        let mut countdown = Countdown::default();
        let mut alarm = None;

        countdown.start(30, |a, _| alarm = Some(a));
        countdown.cancel();

        let mut rescheduled = false;
        assert_eq!(
            countdown.receive_alarm(alarm.unwrap(), |_, _| rescheduled = true),
            None
        );
        assert!(!rescheduled);
        assert!(!countdown.is_active());
    }

    #[test]
    fn test_cancel_inactive_is_noop() {
        let mut countdown = Countdown::default();
        countdown.cancel();
        assert!(!countdown.is_active());

        let mut alarm = None;
        countdown.start(5, |a, _| alarm = Some(a));

        assert_eq!(
            countdown.receive_alarm(alarm.unwrap(), |_, _| {}),
            Some(TimerEvent::Tick(4))
        );
    }

    #[test]
    fn test_restart_supersedes_previous_countdown() {
        let mut countdown = Countdown::default();
        let mut first = None;
        let mut second = None;

        countdown.start(30, |a, _| first = Some(a));
        countdown.start(30, |a, _| second = Some(a));

        assert_ne!(first, second);
        assert_eq!(countdown.receive_alarm(first.unwrap(), |_, _| {}), None);
        assert_eq!(
            countdown.receive_alarm(second.unwrap(), |_, _| {}),
            Some(TimerEvent::Tick(29))
        );
    }

    #[test]
    fn test_scheduler_orders_by_deadline() {
        let mut scheduler = Scheduler::default();
        let now = Instant::now();

        scheduler.schedule_from(now, AlarmMessage::Tick { countdown: 2 }, Duration::from_secs(2));
        scheduler.schedule_from(now, AlarmMessage::Tick { countdown: 1 }, Duration::from_secs(1));
        scheduler.schedule_from(now, AlarmMessage::Tick { countdown: 3 }, Duration::from_secs(3));

        assert_eq!(scheduler.len(), 3);
        assert_eq!(scheduler.next_deadline(), Some(now + Duration::from_secs(1)));

        assert!(scheduler.pop_due(now).is_empty());
        assert_eq!(
            scheduler.pop_due(now + Duration::from_secs(2)),
            vec![
                AlarmMessage::Tick { countdown: 1 },
                AlarmMessage::Tick { countdown: 2 }
            ]
        );
        assert_eq!(scheduler.len(), 1);

        assert_eq!(
            scheduler.pop_due(now + Duration::from_secs(10)),
            vec![AlarmMessage::Tick { countdown: 3 }]
        );
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_scheduler_keeps_insertion_order_for_equal_deadlines() {
        let mut scheduler = Scheduler::default();
        let now = Instant::now();

        scheduler.schedule_from(now, AlarmMessage::Tick { countdown: 7 }, TICK_INTERVAL);
        scheduler.schedule_from(now, AlarmMessage::Tick { countdown: 8 }, TICK_INTERVAL);

        assert_eq!(
            scheduler.pop_due(now + TICK_INTERVAL),
            vec![
                AlarmMessage::Tick { countdown: 7 },
                AlarmMessage::Tick { countdown: 8 }
            ]
        );
    }
}
