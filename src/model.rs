use serde::{Deserialize, Serialize};
use std::fmt;

use crate::content;
use crate::notify::NoticeBoard;
use crate::prefs::{EmergencyLogEntry, PageViews};

/// The closed set of navigable pages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Dashboard,
    Patients,
    Appointments,
    FirstAid,
    Education,
    Emergency,
}

impl Page {
    pub const ALL: [Self; 6] = [
        Self::Dashboard,
        Self::Patients,
        Self::Appointments,
        Self::FirstAid,
        Self::Education,
        Self::Emergency,
    ];

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "dashboard" | "home" => Some(Self::Dashboard),
            "patients" => Some(Self::Patients),
            "appointments" => Some(Self::Appointments),
            "first-aid" | "firstaid" => Some(Self::FirstAid),
            "education" => Some(Self::Education),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Patients => "patients",
            Self::Appointments => "appointments",
            Self::FirstAid => "first-aid",
            Self::Education => "education",
            Self::Emergency => "emergency",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Patients => "Patients",
            Self::Appointments => "Appointments",
            Self::FirstAid => "First Aid",
            Self::Education => "Education",
            Self::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Te,
}

impl Language {
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Self::En),
            "hi" => Some(Self::Hi),
            "te" => Some(Self::Te),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Te => "te",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "हिंदी",
            Self::Te => "తెలుగు",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatientStatus {
    Active,
    FollowUp,
    Completed,
}

impl PatientStatus {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "-").as_str() {
            "active" => Some(Self::Active),
            "follow-up" | "followup" => Some(Self::FollowUp),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::FollowUp => "Follow-up",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: u32,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub phone: String,
    /// ISO date (yyyy-mm-dd) of the last recorded visit.
    pub last_visit: String,
    pub condition: String,
    pub status: PatientStatus,
    pub village: String,
}

impl Patient {
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.village.to_lowercase().contains(&query)
            || self.condition.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RosterStats {
    pub total: usize,
    pub active: usize,
    pub follow_up: usize,
}

impl RosterStats {
    #[must_use]
    pub fn of(patients: &[Patient]) -> Self {
        Self {
            total: patients.len(),
            active: patients
                .iter()
                .filter(|p| p.status == PatientStatus::Active)
                .count(),
            follow_up: patients
                .iter()
                .filter(|p| p.status == PatientStatus::FollowUp)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u32,
    pub patient_name: String,
    pub patient_phone: String,
    pub kind: String,
    /// ISO date (yyyy-mm-dd).
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    pub priority: Priority,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicineStatus {
    Due,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineReminder {
    pub id: u32,
    pub patient_name: String,
    pub medicine: String,
    pub dosage: String,
    pub next_due: String,
    pub status: MedicineStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub category: String,
    pub description: String,
}

impl Article {
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

/// A staged call waiting for user confirmation. `service` is set for
/// emergency numbers only; those dials are appended to the emergency log
/// once placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialTarget {
    pub number: String,
    pub label: String,
    pub service: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub page: Page,
    pub language: Language,
    pub network_online: bool,

    // Fixture roster, created at startup and never persisted in full.
    pub patients: Vec<Patient>,
    pub patient_query: String,
    pub education_query: String,

    // Mirrors of the durable preference records.
    pub page_views: PageViews,
    pub emergency_logs: Vec<EmergencyLogEntry>,

    pub pending_dial: Option<DialTarget>,
    pub notices: NoticeBoard,

    /// Preference reads still outstanding after `AppStarted`.
    pub hydrating: usize,
    /// Shell clock, fed by `TimerTick` and stamped onto log entries.
    pub now_ms: u64,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self {
            page: Page::Dashboard,
            language: Language::En,
            network_online: true,
            patients: content::sample_patients(),
            patient_query: String::new(),
            education_query: String::new(),
            page_views: PageViews::default(),
            emergency_logs: Vec::new(),
            pending_dial: None,
            notices: NoticeBoard::default(),
            hydrating: 0,
            now_ms: 0,
        }
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydrating == 0
    }

    #[must_use]
    pub fn roster_stats(&self) -> RosterStats {
        RosterStats::of(&self.patients)
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
