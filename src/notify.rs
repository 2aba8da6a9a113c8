use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{NOTICE_ENTER_MS, NOTICE_EXIT_MS, NOTICE_VISIBLE_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A notice moves through three fixed timed phases and is then removed
/// unconditionally. There is no cancellation and no coalescing; every
/// `post` produces an independent notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticePhase {
    Entering,
    Visible,
    Leaving,
}

impl NoticePhase {
    #[must_use]
    pub const fn duration_ms(self) -> u64 {
        match self {
            Self::Entering => NOTICE_ENTER_MS,
            Self::Visible => NOTICE_VISIBLE_MS,
            Self::Leaving => NOTICE_EXIT_MS,
        }
    }

    #[must_use]
    const fn next(self) -> Option<Self> {
        match self {
            Self::Entering => Some(Self::Visible),
            Self::Visible => Some(Self::Leaving),
            Self::Leaving => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub phase: NoticePhase,
    pub phase_started_ms: u64,
}

impl Notice {
    fn new(message: impl Into<String>, severity: Severity, now_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            phase: NoticePhase::Entering,
            phase_started_ms: now_ms,
        }
    }

    /// Steps the phase forward as far as `now_ms` allows. A late tick may
    /// carry a notice through more than one boundary. Returns false once
    /// the exit phase has elapsed and the notice should be dropped.
    fn step(&mut self, now_ms: u64) -> bool {
        loop {
            let ends_at = self
                .phase_started_ms
                .saturating_add(self.phase.duration_ms());
            if now_ms < ends_at {
                return true;
            }
            match self.phase.next() {
                Some(next) => {
                    self.phase = next;
                    self.phase_started_ms = ends_at;
                }
                None => return false,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NoticeBoard {
    active: Vec<Notice>,
}

impl NoticeBoard {
    pub fn post(&mut self, message: impl Into<String>, severity: Severity, now_ms: u64) -> Uuid {
        let notice = Notice::new(message, severity, now_ms);
        let id = notice.id;
        self.active.push(notice);
        id
    }

    /// Advances every active notice to `now_ms`, dropping the ones whose
    /// lifetime has fully elapsed.
    pub fn advance(&mut self, now_ms: u64) {
        self.active.retain_mut(|notice| notice.step(now_ms));
    }

    #[must_use]
    pub fn active(&self) -> &[Notice] {
        &self.active
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeView {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub phase: NoticePhase,
}

impl From<&Notice> for NoticeView {
    fn from(notice: &Notice) -> Self {
        Self {
            id: notice.id,
            message: notice.message.clone(),
            severity: notice.severity,
            phase: notice.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 10_000;

    #[test]
    fn notice_walks_three_phases() {
        let mut board = NoticeBoard::default();
        board.post("Working offline", Severity::Warning, T0);
        assert_eq!(board.active()[0].phase, NoticePhase::Entering);

        board.advance(T0 + NOTICE_ENTER_MS);
        assert_eq!(board.active()[0].phase, NoticePhase::Visible);

        board.advance(T0 + NOTICE_ENTER_MS + NOTICE_VISIBLE_MS);
        assert_eq!(board.active()[0].phase, NoticePhase::Leaving);

        board.advance(T0 + NOTICE_ENTER_MS + NOTICE_VISIBLE_MS + NOTICE_EXIT_MS);
        assert!(board.is_empty());
    }

    #[test]
    fn removal_is_unconditional_after_total_lifetime() {
        let mut board = NoticeBoard::default();
        board.post("done", Severity::Success, T0);

        // A single very late tick must still remove the notice.
        board.advance(T0 + NOTICE_ENTER_MS + NOTICE_VISIBLE_MS + NOTICE_EXIT_MS + 60_000);
        assert!(board.is_empty());
    }

    #[test]
    fn early_tick_keeps_phase() {
        let mut board = NoticeBoard::default();
        board.post("hello", Severity::Info, T0);
        board.advance(T0 + NOTICE_ENTER_MS - 1);
        assert_eq!(board.active()[0].phase, NoticePhase::Entering);
    }

    #[test]
    fn overlapping_notices_age_independently() {
        let mut board = NoticeBoard::default();
        board.post("first", Severity::Info, T0);
        board.post("second", Severity::Error, T0 + 2_000);
        assert_eq!(board.len(), 2);

        // First has fully elapsed; second is still visible.
        board.advance(T0 + NOTICE_ENTER_MS + NOTICE_VISIBLE_MS + NOTICE_EXIT_MS);
        assert_eq!(board.len(), 1);
        assert_eq!(board.active()[0].message, "second");
        assert_eq!(board.active()[0].phase, NoticePhase::Visible);
    }

    #[test]
    fn default_severity_is_info() {
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn notice_ids_are_unique() {
        let mut board = NoticeBoard::default();
        let a = board.post("a", Severity::Info, T0);
        let b = board.post("a", Severity::Info, T0);
        assert_ne!(a, b);
    }
}
