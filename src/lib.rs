#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod cache;
pub mod capabilities;
pub mod channel;
pub mod content;
pub mod event;
pub mod model;
pub mod notify;
pub mod prefs;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use app::Sathi;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::App as CruxApp;
pub use event::Event;
pub use model::{Language, Model, Page};
pub use notify::Severity;
pub use worker::{CacheWorker, WorkerEffect, WorkerEvent, WorkerModel};

use content::{EmergencyContact, OfflineContentItem};
use model::{Appointment, Article, MedicineReminder, PatientStatus, RosterStats};
use notify::NoticeView;

// Notice lifecycle: entrance delay + visible duration + exit animation.
pub const NOTICE_ENTER_MS: u64 = 100;
pub const NOTICE_VISIBLE_MS: u64 = 3_000;
pub const NOTICE_EXIT_MS: u64 = 300;
pub const NOTICE_TOTAL_MS: u64 = NOTICE_ENTER_MS + NOTICE_VISIBLE_MS + NOTICE_EXIT_MS;

pub const OFFLINE_NOTICE: &str = "Working offline";
pub const ONLINE_NOTICE: &str = "Connection restored";
pub const GENERIC_FAULT_MESSAGE: &str = "An error occurred. Please try again.";

pub const NEAREST_HOSPITAL_URL: &str = "https://maps.google.com/?q=nearest+hospital";

/// Placeholder until a real location provider exists.
pub const CURRENT_LOCATION_PLACEHOLDER: &str = "Current Location";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Navigation,
    Network,
    Storage,
    Serialization,
    Deserialization,
    Telephony,
    InvalidState,
    Internal,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Navigation => "NAVIGATION_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Storage => "STORAGE_ERROR",
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Telephony => "TELEPHONY_ERROR",
            Self::InvalidState => "INVALID_STATE",
            Self::Internal => "INTERNAL_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Navigation | Self::Network | Self::Storage | Self::Telephony => {
                ErrorSeverity::Transient
            }
            Self::Serialization | Self::Deserialization | Self::InvalidState | Self::Internal => {
                ErrorSeverity::Fatal
            }
            Self::Unknown => ErrorSeverity::Permanent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Navigation => "The requested page could not be found.".into(),
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            ErrorKind::Storage => {
                "Unable to save data locally. Please free up some storage space.".into()
            }
            ErrorKind::Serialization | ErrorKind::Deserialization => {
                "A data error occurred. Please contact support if this persists.".into()
            }
            ErrorKind::Telephony => "Unable to place the call. Please try again.".into(),
            ErrorKind::InvalidState => "The app is in an invalid state. Please restart it.".into(),
            ErrorKind::Internal | ErrorKind::Unknown => GENERIC_FAULT_MESSAGE.into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

/// Reformats an ISO date (yyyy-mm-dd) as dd/mm/yyyy for display; any
/// other shape passes through untouched.
#[must_use]
pub fn format_date_short(iso: &str) -> String {
    let mut parts = iso.splitn(3, '-');
    if let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) {
        let all_digits =
            |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if y.len() == 4 && m.len() == 2 && d.len() == 2 && [y, m, d].iter().all(|s| all_digits(s))
        {
            return format!("{d}/{m}/{y}");
        }
    }
    iso.to_string()
}

// --- View model -----------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub page: Page,
    pub label: String,
    pub current: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub page: Page,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialPromptView {
    pub message: String,
    pub number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub stats: RosterStats,
    pub appointments_upcoming: usize,
    pub medicines_due: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientCard {
    pub id: u32,
    pub name: String,
    pub detail_line: String,
    pub phone: String,
    pub condition: String,
    pub last_visit_label: String,
    pub status: PatientStatus,
    pub status_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientsView {
    pub query: String,
    pub patients: Vec<PatientCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentsView {
    pub appointments: Vec<Appointment>,
    pub medicine_reminders: Vec<MedicineReminder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstAidView {
    pub items: Vec<OfflineContentItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationView {
    pub query: String,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyView {
    pub contacts: Vec<EmergencyContact>,
    pub logged_calls: usize,
}

/// Content for the currently active page only; the page/nav lists carry
/// the activation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
pub enum PageContent {
    Dashboard(DashboardView),
    Patients(PatientsView),
    Appointments(AppointmentsView),
    FirstAid(FirstAidView),
    Education(EducationView),
    Emergency(EmergencyView),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub nav: Vec<NavEntry>,
    pub pages: Vec<PageView>,
    pub body: PageContent,
    pub online: bool,
    pub language: Language,
    pub language_name: String,
    pub notices: Vec<NoticeView>,
    pub dial_prompt: Option<DialPromptView>,
    pub hydrated: bool,
}

pub mod app {
    use super::{
        AppError, AppointmentsView, DashboardView, DialPromptView, EducationView, EmergencyView,
        ErrorKind, FirstAidView, NavEntry, PageContent, PageView, PatientCard, PatientsView,
        ViewModel, CURRENT_LOCATION_PLACEHOLDER, GENERIC_FAULT_MESSAGE, NEAREST_HOSPITAL_URL,
        OFFLINE_NOTICE, ONLINE_NOTICE,
    };
    use crate::capabilities::Capabilities;
    use crate::content;
    use crate::event::Event;
    use crate::model::{DialTarget, MedicineStatus, Model, Page};
    use crate::notify::{NoticeView, Severity};
    use crate::prefs::{self, EmergencyLogEntry, PrefKey};

    #[derive(Default)]
    pub struct Sathi;

    impl Sathi {
        fn persist_pref(caps: &Capabilities, key: PrefKey, value: Vec<u8>) {
            caps.kv.set(key.as_str().to_string(), value, move |result| {
                Event::PrefWritten {
                    key,
                    error: result.err().map(|e| e.to_string()),
                }
            });
        }

        /// Writes `currentPage` and the bumped `pageViews` counter after a
        /// navigation. Both are last-write-wins records.
        fn persist_navigation(model: &Model, caps: &Capabilities) {
            Self::persist_pref(
                caps,
                PrefKey::CurrentPage,
                prefs::encode_str(model.page.as_str()),
            );
            match prefs::encode_json(PrefKey::PageViews, &model.page_views) {
                Ok(bytes) => Self::persist_pref(caps, PrefKey::PageViews, bytes),
                Err(e) => tracing::warn!(error = %e, "page view counters not persisted"),
            }
        }

        fn persist_emergency_logs(model: &Model, caps: &Capabilities) {
            match prefs::encode_json(PrefKey::EmergencyLogs, &model.emergency_logs) {
                Ok(bytes) => Self::persist_pref(caps, PrefKey::EmergencyLogs, bytes),
                Err(e) => tracing::warn!(error = %e, "emergency log not persisted"),
            }
        }

        fn apply_pref(model: &mut Model, key: PrefKey, bytes: &[u8]) {
            match key {
                PrefKey::CurrentPage => match prefs::decode_str(key, bytes) {
                    Ok(raw) => match Page::parse(&raw) {
                        Some(page) => model.page = page,
                        None => {
                            tracing::warn!(saved = %raw, "persisted page is unknown, keeping dashboard");
                        }
                    },
                    Err(e) => tracing::warn!(error = %e, "persisted page unreadable"),
                },
                PrefKey::Language => match prefs::decode_str(key, bytes) {
                    Ok(raw) => match crate::model::Language::parse(&raw) {
                        Some(language) => model.language = language,
                        None => tracing::warn!(saved = %raw, "persisted language is unknown"),
                    },
                    Err(e) => tracing::warn!(error = %e, "persisted language unreadable"),
                },
                PrefKey::PageViews => match prefs::decode_json(key, bytes) {
                    Ok(views) => model.page_views = views,
                    Err(e) => tracing::warn!(error = %e, "page view counters unreadable"),
                },
                PrefKey::EmergencyLogs => match prefs::decode_json(key, bytes) {
                    Ok(logs) => model.emergency_logs = logs,
                    Err(e) => tracing::warn!(error = %e, "emergency log unreadable"),
                },
            }
        }

        fn build_body(model: &Model) -> PageContent {
            match model.page {
                Page::Dashboard => PageContent::Dashboard(DashboardView {
                    stats: model.roster_stats(),
                    appointments_upcoming: content::sample_appointments().len(),
                    medicines_due: content::sample_medicine_reminders()
                        .iter()
                        .filter(|r| r.status == MedicineStatus::Due)
                        .count(),
                }),
                Page::Patients => PageContent::Patients(PatientsView {
                    query: model.patient_query.clone(),
                    patients: model
                        .patients
                        .iter()
                        .filter(|p| p.matches_query(&model.patient_query))
                        .map(|p| PatientCard {
                            id: p.id,
                            name: p.name.clone(),
                            detail_line: format!(
                                "{} years • {} • {}",
                                p.age,
                                p.gender.display_name(),
                                p.village
                            ),
                            phone: p.phone.clone(),
                            condition: p.condition.clone(),
                            last_visit_label: super::format_date_short(&p.last_visit),
                            status: p.status,
                            status_label: p.status.display_name().to_string(),
                        })
                        .collect(),
                }),
                Page::Appointments => PageContent::Appointments(AppointmentsView {
                    appointments: content::sample_appointments(),
                    medicine_reminders: content::sample_medicine_reminders(),
                }),
                Page::FirstAid => PageContent::FirstAid(FirstAidView {
                    items: content::offline_first_aid(),
                }),
                Page::Education => PageContent::Education(EducationView {
                    query: model.education_query.clone(),
                    articles: content::education_articles()
                        .into_iter()
                        .filter(|a| a.matches_query(&model.education_query))
                        .collect(),
                }),
                Page::Emergency => PageContent::Emergency(EmergencyView {
                    contacts: content::emergency_contacts(),
                    logged_calls: model.emergency_logs.len(),
                }),
            }
        }
    }

    impl crux_core::App for Sathi {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            match event {
                Event::Noop => {}

                Event::AppStarted => {
                    model.hydrating = PrefKey::ALL.len();
                    for key in PrefKey::ALL {
                        caps.kv
                            .get(key.as_str().to_string(), move |result| match result {
                                Ok(value) => Event::PrefLoaded { key, value },
                                Err(e) => Event::PrefLoadFailed {
                                    key,
                                    error: e.to_string(),
                                },
                            });
                    }
                    caps.render.render();
                }

                Event::PrefLoaded { key, value } => {
                    model.hydrating = model.hydrating.saturating_sub(1);
                    if let Some(bytes) = value {
                        Self::apply_pref(model, key, &bytes);
                    }
                    if model.is_hydrated() {
                        tracing::debug!(page = %model.page, "preferences hydrated");
                    }
                    caps.render.render();
                }

                Event::PrefLoadFailed { key, error } => {
                    model.hydrating = model.hydrating.saturating_sub(1);
                    tracing::warn!(key = key.as_str(), error = %error, "preference read failed");
                    caps.render.render();
                }

                Event::PrefWritten { key, error } => {
                    if let Some(error) = error {
                        tracing::warn!(key = key.as_str(), error = %error, "preference write failed");
                    }
                }

                Event::NavigateTo { page } => {
                    let target = Page::parse(&page).unwrap_or_else(|| {
                        tracing::warn!(requested = %page, "unknown page, falling back to dashboard");
                        Page::Dashboard
                    });
                    model.page = target;
                    let views = model.page_views.increment(target);
                    tracing::debug!(page = %target, views, "navigated");
                    Self::persist_navigation(model, caps);
                    caps.render.render();
                }

                Event::LanguageSelected { code } => {
                    match crate::model::Language::parse(&code) {
                        Some(language) => {
                            model.language = language;
                            Self::persist_pref(
                                caps,
                                PrefKey::Language,
                                prefs::encode_str(language.code()),
                            );
                            model.notices.post(
                                format!("Language changed to {}", language.display_name()),
                                Severity::Success,
                                model.now_ms,
                            );
                        }
                        None => tracing::warn!(code = %code, "unknown language code ignored"),
                    }
                    caps.render.render();
                }

                Event::PatientSearchChanged { query } => {
                    model.patient_query = query;
                    caps.render.render();
                }

                Event::EducationSearchChanged { query } => {
                    model.education_query = query;
                    caps.render.render();
                }

                Event::NetworkStatusChanged { online } => {
                    // Notices fire on real transitions only.
                    if online == model.network_online {
                        return;
                    }
                    model.network_online = online;
                    if online {
                        model
                            .notices
                            .post(ONLINE_NOTICE, Severity::Success, model.now_ms);
                    } else {
                        model
                            .notices
                            .post(OFFLINE_NOTICE, Severity::Warning, model.now_ms);
                    }
                    caps.render.render();
                }

                Event::NoticePosted { message, severity } => {
                    model.notices.post(message, severity, model.now_ms);
                    caps.render.render();
                }

                Event::TimerTick { now_ms } => {
                    model.now_ms = now_ms;
                    model.notices.advance(now_ms);
                    caps.render.render();
                }

                Event::EmergencyCallRequested { number } => {
                    let service = content::emergency_service_name(&number);
                    model.pending_dial = Some(DialTarget {
                        label: format!("{service} ({number})"),
                        number,
                        service: Some(service.to_string()),
                    });
                    caps.render.render();
                }

                Event::PatientCallRequested { patient_id } => {
                    match model.patients.iter().find(|p| p.id == patient_id) {
                        Some(patient) => {
                            model.pending_dial = Some(DialTarget {
                                number: patient.phone.clone(),
                                label: patient.name.clone(),
                                service: None,
                            });
                        }
                        None => {
                            tracing::warn!(patient_id, "call requested for unknown patient");
                        }
                    }
                    caps.render.render();
                }

                Event::DialConfirmed => {
                    if let Some(target) = model.pending_dial.take() {
                        caps.intents
                            .dial(target.number.clone(), move |result| Event::DialCompleted {
                                target: target.clone(),
                                error: result.err().map(|e| e.to_string()),
                            });
                    } else {
                        tracing::warn!("dial confirmed with nothing staged");
                    }
                    caps.render.render();
                }

                Event::DialCancelled => {
                    model.pending_dial = None;
                    caps.render.render();
                }

                Event::DialCompleted { target, error } => {
                    match error {
                        None => {
                            let display = target
                                .service
                                .clone()
                                .unwrap_or_else(|| target.label.clone());
                            model.notices.post(
                                format!("Calling {display}"),
                                Severity::Success,
                                model.now_ms,
                            );
                            // Only emergency dials are logged.
                            if let Some(service) = target.service {
                                model.emergency_logs.push(EmergencyLogEntry {
                                    timestamp_ms: model.now_ms,
                                    number: target.number,
                                    service,
                                    location: CURRENT_LOCATION_PLACEHOLDER.to_string(),
                                });
                                Self::persist_emergency_logs(model, caps);
                            }
                        }
                        Some(error) => {
                            tracing::warn!(error = %error, "dial failed");
                            model.notices.post(
                                AppError::new(ErrorKind::Telephony, error).user_facing_message(),
                                Severity::Error,
                                model.now_ms,
                            );
                        }
                    }
                    caps.render.render();
                }

                Event::FindNearestHospital => {
                    caps.intents.open_url(NEAREST_HOSPITAL_URL.to_string());
                    model.notices.post(
                        "Opening maps to find nearest hospital",
                        Severity::Info,
                        model.now_ms,
                    );
                    caps.render.render();
                }

                Event::FaultReported { detail } => {
                    tracing::error!(detail = %detail, "uncaught fault");
                    model
                        .notices
                        .post(GENERIC_FAULT_MESSAGE, Severity::Error, model.now_ms);
                    caps.render.render();
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            let nav = Page::ALL
                .iter()
                .map(|&page| NavEntry {
                    page,
                    label: page.display_name().to_string(),
                    current: page == model.page,
                })
                .collect();

            let pages = Page::ALL
                .iter()
                .map(|&page| PageView {
                    page,
                    active: page == model.page,
                })
                .collect();

            ViewModel {
                nav,
                pages,
                body: Self::build_body(model),
                online: model.network_online,
                language: model.language,
                language_name: model.language.display_name().to_string(),
                notices: model.notices.active().iter().map(NoticeView::from).collect(),
                dial_prompt: model.pending_dial.as_ref().map(|target| DialPromptView {
                    message: format!("Call {}?", target.label),
                    number: target.number.clone(),
                }),
                hydrated: model.is_hydrated(),
            }
        }
    }
}
