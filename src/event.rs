use serde::{Deserialize, Serialize};

use crate::model::DialTarget;
use crate::notify::Severity;
use crate::prefs::PrefKey;

/// Foreground app events. Capability results are converted into
/// crate-owned payloads at the closure boundary, so every variant here
/// is plainly serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Event {
    #[default]
    Noop,

    // Lifecycle
    AppStarted,

    // Preference store plumbing
    PrefLoaded {
        key: PrefKey,
        value: Option<Vec<u8>>,
    },
    PrefLoadFailed {
        key: PrefKey,
        error: String,
    },
    PrefWritten {
        key: PrefKey,
        error: Option<String>,
    },

    // Navigation & settings
    NavigateTo {
        page: String,
    },
    LanguageSelected {
        code: String,
    },

    // Local filtering
    PatientSearchChanged {
        query: String,
    },
    EducationSearchChanged {
        query: String,
    },

    // Connectivity
    NetworkStatusChanged {
        online: bool,
    },

    // Notices
    NoticePosted {
        message: String,
        severity: Severity,
    },
    TimerTick {
        now_ms: u64,
    },

    // Dial flow
    EmergencyCallRequested {
        number: String,
    },
    PatientCallRequested {
        patient_id: u32,
    },
    DialConfirmed,
    DialCancelled,
    DialCompleted {
        target: DialTarget,
        error: Option<String>,
    },
    FindNearestHospital,

    // Faults caught at the top level; recoverable by design.
    FaultReported {
        detail: String,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::AppStarted => "app_started",
            Self::PrefLoaded { .. } => "pref_loaded",
            Self::PrefLoadFailed { .. } => "pref_load_failed",
            Self::PrefWritten { .. } => "pref_written",
            Self::NavigateTo { .. } => "navigate_to",
            Self::LanguageSelected { .. } => "language_selected",
            Self::PatientSearchChanged { .. } => "patient_search_changed",
            Self::EducationSearchChanged { .. } => "education_search_changed",
            Self::NetworkStatusChanged { .. } => "network_status_changed",
            Self::NoticePosted { .. } => "notice_posted",
            Self::TimerTick { .. } => "timer_tick",
            Self::EmergencyCallRequested { .. } => "emergency_call_requested",
            Self::PatientCallRequested { .. } => "patient_call_requested",
            Self::DialConfirmed => "dial_confirmed",
            Self::DialCancelled => "dial_cancelled",
            Self::DialCompleted { .. } => "dial_completed",
            Self::FindNearestHospital => "find_nearest_hospital",
            Self::FaultReported { .. } => "fault_reported",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::NavigateTo { .. }
                | Self::LanguageSelected { .. }
                | Self::PatientSearchChanged { .. }
                | Self::EducationSearchChanged { .. }
                | Self::EmergencyCallRequested { .. }
                | Self::PatientCallRequested { .. }
                | Self::DialConfirmed
                | Self::DialCancelled
                | Self::FindNearestHospital
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_are_snake_case() {
        let events = [
            Event::Noop,
            Event::AppStarted,
            Event::NavigateTo {
                page: "patients".into(),
            },
            Event::DialConfirmed,
        ];
        for event in events {
            let name = event.name();
            assert!(!name.is_empty());
            assert!(name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn user_initiated_classification() {
        assert!(Event::NavigateTo {
            page: "emergency".into()
        }
        .is_user_initiated());
        assert!(Event::DialConfirmed.is_user_initiated());
        assert!(!Event::TimerTick { now_ms: 0 }.is_user_initiated());
        assert!(!Event::AppStarted.is_user_initiated());
        assert!(!Event::PrefLoaded {
            key: PrefKey::Language,
            value: None
        }
        .is_user_initiated());
    }

    #[test]
    fn event_size_is_reasonable() {
        // Keep the enum small; box payloads if this starts failing.
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 128,
            "Event enum is {size} bytes — too large, box more variants"
        );
    }
}
