//! Static reference content. Everything here is fixture data supplied to
//! the view layer and the offline data channel; none of it is mutated at
//! runtime.

use serde::{Deserialize, Serialize};

use crate::model::{
    Appointment, AppointmentStatus, Article, Gender, MedicineReminder, MedicineStatus, Patient,
    PatientStatus, Priority,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub number: String,
}

/// Offline-safe reference content served by the cache worker's data
/// channel: either a step-by-step procedure or a contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfflineContentItem {
    Procedure {
        title: String,
        steps: Vec<String>,
    },
    ContactList {
        title: String,
        contacts: Vec<EmergencyContact>,
    },
}

impl OfflineContentItem {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Procedure { title, .. } | Self::ContactList { title, .. } => title,
        }
    }
}

/// (number, service name) for the national emergency lines.
pub const EMERGENCY_SERVICES: &[(&str, &str)] = &[
    ("108", "Ambulance"),
    ("100", "Police"),
    ("101", "Fire Brigade"),
];

#[must_use]
pub fn emergency_service_name(number: &str) -> &'static str {
    EMERGENCY_SERVICES
        .iter()
        .find(|(n, _)| *n == number)
        .map_or("Emergency Service", |(_, name)| name)
}

/// The emergency panel's dialable contacts, derived from the service
/// table.
#[must_use]
pub fn emergency_contacts() -> Vec<EmergencyContact> {
    EMERGENCY_SERVICES
        .iter()
        .map(|(number, name)| EmergencyContact {
            name: (*name).to_string(),
            number: (*number).to_string(),
        })
        .collect()
}

#[must_use]
pub fn offline_first_aid() -> Vec<OfflineContentItem> {
    vec![
        OfflineContentItem::Procedure {
            title: "CPR Steps".into(),
            steps: vec![
                "Check responsiveness".into(),
                "Call 108".into(),
                "30 chest compressions".into(),
                "2 rescue breaths".into(),
                "Repeat until help arrives".into(),
            ],
        },
        OfflineContentItem::Procedure {
            title: "Bleeding Control".into(),
            steps: vec![
                "Apply direct pressure".into(),
                "Elevate if possible".into(),
                "Use clean cloth".into(),
                "Don't remove embedded objects".into(),
            ],
        },
        OfflineContentItem::ContactList {
            title: "Emergency Contacts".into(),
            contacts: vec![
                EmergencyContact {
                    name: "Ambulance".into(),
                    number: "108".into(),
                },
                EmergencyContact {
                    name: "Police".into(),
                    number: "100".into(),
                },
                EmergencyContact {
                    name: "Fire".into(),
                    number: "101".into(),
                },
            ],
        },
    ]
}

#[must_use]
pub fn sample_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: 1,
            name: "Sita Devi".into(),
            age: 32,
            gender: Gender::Female,
            phone: "+91 9876543210".into(),
            last_visit: "2024-05-30".into(),
            condition: "Pregnancy Checkup".into(),
            status: PatientStatus::Active,
            village: "Rampur".into(),
        },
        Patient {
            id: 2,
            name: "Ram Kumar".into(),
            age: 45,
            gender: Gender::Male,
            phone: "+91 9876543211".into(),
            last_visit: "2024-05-28".into(),
            condition: "Diabetes".into(),
            status: PatientStatus::FollowUp,
            village: "Shyampur".into(),
        },
        Patient {
            id: 3,
            name: "Meera Sharma".into(),
            age: 28,
            gender: Gender::Female,
            phone: "+91 9876543212".into(),
            last_visit: "2024-05-25".into(),
            condition: "Vaccination".into(),
            status: PatientStatus::Completed,
            village: "Rampur".into(),
        },
    ]
}

#[must_use]
pub fn sample_appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            id: 1,
            patient_name: "Sita Devi".into(),
            patient_phone: "+91 9876543210".into(),
            kind: "Pregnancy Checkup".into(),
            date: "2024-06-05".into(),
            time: "10:00 AM".into(),
            status: AppointmentStatus::Scheduled,
            priority: Priority::High,
            notes: "Second trimester checkup".into(),
        },
        Appointment {
            id: 2,
            patient_name: "Ram Kumar".into(),
            patient_phone: "+91 9876543211".into(),
            kind: "Diabetes Follow-up".into(),
            date: "2024-06-06".into(),
            time: "2:00 PM".into(),
            status: AppointmentStatus::Confirmed,
            priority: Priority::Medium,
            notes: "Blood sugar monitoring".into(),
        },
        Appointment {
            id: 3,
            patient_name: "Baby Meera".into(),
            patient_phone: "+91 9876543212".into(),
            kind: "Vaccination".into(),
            date: "2024-06-07".into(),
            time: "11:00 AM".into(),
            status: AppointmentStatus::Pending,
            priority: Priority::High,
            notes: "DPT booster shot".into(),
        },
        Appointment {
            id: 4,
            patient_name: "Elderly Kumar".into(),
            patient_phone: "+91 9876543213".into(),
            kind: "Health Screening".into(),
            date: "2024-06-08".into(),
            time: "9:00 AM".into(),
            status: AppointmentStatus::Scheduled,
            priority: Priority::Low,
            notes: "Annual health checkup".into(),
        },
    ]
}

#[must_use]
pub fn sample_medicine_reminders() -> Vec<MedicineReminder> {
    vec![
        MedicineReminder {
            id: 1,
            patient_name: "Ram Kumar".into(),
            medicine: "Metformin 500mg".into(),
            dosage: "Twice daily".into(),
            next_due: "2024-06-03 8:00 AM".into(),
            status: MedicineStatus::Due,
        },
        MedicineReminder {
            id: 2,
            patient_name: "Sita Devi".into(),
            medicine: "Iron Tablets".into(),
            dosage: "Once daily".into(),
            next_due: "2024-06-03 7:00 PM".into(),
            status: MedicineStatus::Upcoming,
        },
        MedicineReminder {
            id: 3,
            patient_name: "Radha Kumari".into(),
            medicine: "Blood Pressure Medicine".into(),
            dosage: "Morning".into(),
            next_due: "2024-06-04 7:00 AM".into(),
            status: MedicineStatus::Upcoming,
        },
    ]
}

#[must_use]
pub fn education_articles() -> Vec<Article> {
    vec![
        Article {
            title: "Hand Hygiene & Sanitation".into(),
            category: "Hygiene".into(),
            description: "Learn proper handwashing techniques and importance of sanitation".into(),
        },
        Article {
            title: "Maternal Health Care".into(),
            category: "Women's Health".into(),
            description: "Essential care during pregnancy and childbirth".into(),
        },
        Article {
            title: "Child Vaccination Schedule".into(),
            category: "Child Health".into(),
            description: "Complete immunization schedule for children".into(),
        },
        Article {
            title: "Nutrition & Malnutrition Prevention".into(),
            category: "Nutrition".into(),
            description: "Balanced diet and preventing malnutrition in families".into(),
        },
        Article {
            title: "Water, Sanitation & Hygiene (WASH)".into(),
            category: "Hygiene".into(),
            description: "Safe water practices and environmental sanitation".into(),
        },
        Article {
            title: "Mental Health & Wellness".into(),
            category: "Mental Health".into(),
            description: "Understanding and promoting mental wellbeing".into(),
        },
    ]
}
