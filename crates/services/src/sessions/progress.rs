use serde::Serialize;

use interview_core::model::Session;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// 1-based number of the question on screen; equals `total` once complete.
    pub position: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn of(session: &Session) -> Self {
        let total = session.questions().len();
        let answered = session.answers().len();
        let is_complete = session.is_complete();
        let position = if is_complete {
            total
        } else {
            session.current_index() + 1
        };
        Self {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            position,
            is_complete,
        }
    }

    /// Share of the session reached, as a rounded percentage.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.position * 200 + self.total) / (self.total * 2);
        u8::try_from(pct.min(100)).unwrap_or(100)
    }
}
