use std::time::{Duration, Instant};

/// Two taps closer together than this are a double tap.
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Play or pause.
    SingleTap,
    /// Like.
    DoubleTap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    AwaitingSecondTap { since: Instant },
}

/// Tells single taps from double taps.
///
/// A single tap is only reported once the window has passed without a second one, so the caller has to [poll] at
/// [deadline].
///
/// [poll]: TapDetector::poll
/// [deadline]: TapDetector::deadline
#[derive(Debug, Clone)]
pub struct TapDetector {
    state: State,
    window: Duration,
}

impl Default for TapDetector {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_WINDOW)
    }
}

impl TapDetector {
    pub fn new(window: Duration) -> Self {
        Self {
            state: State::Idle,
            window,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// When the pending tap turns into a single tap, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            State::Idle => None,
            State::AwaitingSecondTap { since } => Some(since + self.window),
        }
    }

    pub fn tap(&mut self, now: Instant) -> Option<Gesture> {
        match self.state {
            State::Idle => {
                self.state = State::AwaitingSecondTap { since: now };
                None
            }
            State::AwaitingSecondTap { since } if self.within_window(since, now) => {
                self.state = State::Idle;
                Some(Gesture::DoubleTap)
            }
            State::AwaitingSecondTap { .. } => {
                // the earlier tap was never polled; flush it and wait on this one
                self.state = State::AwaitingSecondTap { since: now };
                Some(Gesture::SingleTap)
            }
        }
    }

    /// Reports the pending tap as a single tap once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Gesture> {
        match self.state {
            State::AwaitingSecondTap { since } if !self.within_window(since, now) => {
                self.state = State::Idle;
                Some(Gesture::SingleTap)
            }
            _ => None,
        }
    }

    fn within_window(&self, since: Instant, now: Instant) -> bool {
        now.saturating_duration_since(since) < self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn two_quick_taps_are_a_double_tap() {
        let start = Instant::now();
        let mut taps = TapDetector::default();

        assert_eq!(taps.tap(start), None);
        assert_eq!(taps.tap(start + ms(120)), Some(Gesture::DoubleTap));
        assert!(taps.is_idle());
        assert_eq!(taps.poll(start + ms(1000)), None, "nothing left to flush");
    }

    #[test]
    fn a_lone_tap_is_reported_after_the_window() {
        let start = Instant::now();
        let mut taps = TapDetector::default();

        taps.tap(start);
        assert_eq!(taps.deadline(), Some(start + DOUBLE_TAP_WINDOW));
        assert_eq!(taps.poll(start + ms(299)), None);
        assert_eq!(taps.poll(start + ms(300)), Some(Gesture::SingleTap));
        assert!(taps.is_idle());
        assert_eq!(taps.deadline(), None);
    }

    #[test]
    fn a_slow_second_tap_starts_a_new_window() {
        let start = Instant::now();
        let mut taps = TapDetector::default();

        taps.tap(start);
        assert_eq!(taps.tap(start + ms(500)), Some(Gesture::SingleTap));
        assert_eq!(taps.tap(start + ms(600)), Some(Gesture::DoubleTap));
    }

    #[test]
    fn custom_window() {
        let start = Instant::now();
        let mut taps = TapDetector::new(ms(50));

        taps.tap(start);
        assert_eq!(taps.tap(start + ms(80)), Some(Gesture::SingleTap));
    }
}
