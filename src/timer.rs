/// Default per-section duration: 35 minutes.
pub const SECTION_SECS: i64 = 35 * 60;

/// Below this many remaining seconds the timer display can no longer be hidden.
pub const LOW_TIME_SECS: i64 = 5 * 60;

/// Countdown for a single section.
///
/// Ticks arrive as millisecond deltas from the runtime and are folded into a
/// carry; the visible count decrements once per whole elapsed second. The
/// count keeps going negative after zero (overtime in flexible timing), and
/// the `fired` latch guarantees expiry is reported exactly once per section.
#[derive(Debug, Clone)]
pub struct SectionTimer {
    duration_secs: i64,
    remaining_secs: i64,
    carry_ms: u64,
    fired: bool,
    hidden: bool,
    hide_locked: bool,
}

impl SectionTimer {
    pub fn new(duration_secs: i64) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            carry_ms: 0,
            fired: false,
            hidden: false,
            hide_locked: false,
        }
    }

    /// Restore the full duration for a new section. Clears the expiry latch
    /// and the low-time display lock; the learner's hidden preference is kept.
    pub fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.carry_ms = 0;
        self.fired = false;
        self.hide_locked = false;
    }

    /// Advance by `elapsed_ms`. Returns true exactly once per section, on the
    /// decrement that lands on zero.
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        let mut expired = false;
        self.carry_ms += elapsed_ms;
        while self.carry_ms >= 1000 {
            self.carry_ms -= 1000;
            self.remaining_secs -= 1;
            if self.remaining_secs == 0 && !self.fired {
                self.fired = true;
                expired = true;
            }
        }
        if self.remaining_secs < LOW_TIME_SECS {
            self.hide_locked = true;
        }
        expired
    }

    pub fn remaining_secs(&self) -> i64 {
        self.remaining_secs
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn is_overtime(&self) -> bool {
        self.remaining_secs < 0
    }

    pub fn low_time(&self) -> bool {
        self.remaining_secs < LOW_TIME_SECS
    }

    /// Toggle the display preference. No-op once the low-time lock is set.
    pub fn toggle_hidden(&mut self) {
        if !self.hide_locked {
            self.hidden = !self.hidden;
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The display is shown unless hidden, and always shown under low time.
    pub fn is_visible(&self) -> bool {
        !self.hidden || self.low_time()
    }

    pub fn hide_locked(&self) -> bool {
        self.hide_locked
    }

    /// `MM:SS`, with a leading minus in overtime.
    pub fn format_remaining(&self) -> String {
        let abs = self.remaining_secs.unsigned_abs();
        let sign = if self.remaining_secs < 0 { "-" } else { "" };
        format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
    }
}

impl Default for SectionTimer {
    fn default() -> Self {
        Self::new(SECTION_SECS)
    }
}
