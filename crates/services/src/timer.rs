/// How the time spent compares to a question's limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    /// At or under the limit.
    OnTime,
    /// Over the limit by at most half of it.
    Warning,
    Overtime,
}

/// Per-question elapsed-time counter.
///
/// Driven by an external periodic tick (nominally once per second) rather
/// than a wall clock, so elapsed time only advances while the shell is
/// actually delivering ticks to a running timer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionTimer {
    elapsed_secs: u32,
    running: bool,
}

impl QuestionTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Zero the counter without changing whether it runs.
    pub fn reset(&mut self) {
        self.elapsed_secs = 0;
    }

    /// Zero the counter and start it.
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Advance by one second if running. Returns the elapsed seconds.
    pub fn tick(&mut self) -> u32 {
        if self.running {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
        self.elapsed_secs
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn status(&self, limit_secs: u32) -> TimerStatus {
        let elapsed = u64::from(self.elapsed_secs);
        let limit = u64::from(limit_secs);
        if elapsed <= limit {
            TimerStatus::OnTime
        } else if elapsed * 2 <= limit * 3 {
            TimerStatus::Warning
        } else {
            TimerStatus::Overtime
        }
    }

    #[must_use]
    pub fn remaining(&self, limit_secs: u32) -> u32 {
        limit_secs.saturating_sub(self.elapsed_secs)
    }

    #[must_use]
    pub fn overtime(&self, limit_secs: u32) -> u32 {
        self.elapsed_secs.saturating_sub(limit_secs)
    }
}
