use arogya_shared::prefs::PrefKey;
use arogya_shared::{Effect, Event, Model, Page, Sathi, Severity};
use assert_matches::assert_matches;
use crux_core::testing::AppTester;
use arogya_shared::notify::NoticePhase;
use arogya_shared::{NOTICE_TOTAL_MS, OFFLINE_NOTICE, ONLINE_NOTICE};

/// Cold start with nothing persisted, then navigate to the emergency
/// page: the emergency view is active, its counter is 1, and both
/// `currentPage` and `pageViews` are written through.
#[test]
fn cold_start_then_navigate_to_emergency() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    let update = app.update(Event::AppStarted, &mut model);
    let kv_reads = update
        .effects
        .iter()
        .filter(|e| matches!(e, Effect::Kv(_)))
        .count();
    assert_eq!(kv_reads, PrefKey::ALL.len());
    assert!(!model.is_hydrated());

    // Nothing persisted on a cold start.
    for key in PrefKey::ALL {
        app.update(Event::PrefLoaded { key, value: None }, &mut model);
    }
    assert!(model.is_hydrated());
    assert_eq!(model.page, Page::Dashboard);

    let update = app.update(
        Event::NavigateTo {
            page: "emergency".into(),
        },
        &mut model,
    );

    assert_eq!(model.page, Page::Emergency);
    assert_eq!(model.page_views.count(Page::Emergency), 1);

    // currentPage + pageViews both written.
    let kv_writes = update
        .effects
        .iter()
        .filter(|e| matches!(e, Effect::Kv(_)))
        .count();
    assert_eq!(kv_writes, 2);
    assert!(update
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Render(_))));

    let view = app.view(&model);
    assert_eq!(view.pages.iter().filter(|p| p.active).count(), 1);
    assert!(view
        .pages
        .iter()
        .any(|p| p.active && p.page == Page::Emergency));
    assert!(view
        .nav
        .iter()
        .any(|n| n.current && n.page == Page::Emergency));
    assert_matches!(view.body, arogya_shared::PageContent::Emergency(_));
}

#[test]
fn every_known_page_activates_exactly_one_view() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    for page in Page::ALL {
        app.update(
            Event::NavigateTo {
                page: page.as_str().into(),
            },
            &mut model,
        );
        assert_eq!(model.page, page);

        let view = app.view(&model);
        assert_eq!(view.pages.iter().filter(|p| p.active).count(), 1);
        assert!(view.pages.iter().any(|p| p.active && p.page == page));
        assert_eq!(view.nav.iter().filter(|n| n.current).count(), 1);
    }
}

#[test]
fn unknown_pages_fall_back_to_the_dashboard() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(
        Event::NavigateTo {
            page: "patients".into(),
        },
        &mut model,
    );

    app.update(
        Event::NavigateTo {
            page: "definitely-not-a-page".into(),
        },
        &mut model,
    );

    assert_eq!(model.page, Page::Dashboard);
    assert_eq!(model.page_views.count(Page::Dashboard), 1);

    // The fallback is idempotent.
    app.update(Event::NavigateTo { page: "???".into() }, &mut model);
    assert_eq!(model.page, Page::Dashboard);
    assert_eq!(model.page_views.count(Page::Dashboard), 2);
}

#[test]
fn page_view_counters_increase_by_one_per_navigation() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    for expected in 1..=3 {
        app.update(
            Event::NavigateTo {
                page: "patients".into(),
            },
            &mut model,
        );
        assert_eq!(model.page_views.count(Page::Patients), expected);
    }
    assert_eq!(model.page_views.count(Page::Emergency), 0);
}

#[test]
fn persisted_page_survives_restart() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(Event::AppStarted, &mut model);
    for key in PrefKey::ALL {
        let value = match key {
            PrefKey::CurrentPage => Some(b"first-aid".to_vec()),
            PrefKey::Language => Some(b"te".to_vec()),
            _ => None,
        };
        app.update(Event::PrefLoaded { key, value }, &mut model);
    }

    assert!(model.is_hydrated());
    assert_eq!(model.page, Page::FirstAid);
    assert_eq!(model.language, arogya_shared::Language::Te);
    // Restoring a page is not a navigation; no counter moved.
    assert_eq!(model.page_views.count(Page::FirstAid), 0);
}

#[test]
fn corrupt_persisted_page_keeps_the_dashboard() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(Event::AppStarted, &mut model);
    app.update(
        Event::PrefLoaded {
            key: PrefKey::CurrentPage,
            value: Some(b"retired-page".to_vec()),
        },
        &mut model,
    );
    assert_eq!(model.page, Page::Dashboard);
}

#[test]
fn connectivity_loss_shows_the_offline_warning_exactly_once() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(Event::NetworkStatusChanged { online: false }, &mut model);
    assert!(!model.network_online);
    assert_eq!(model.notices.len(), 1);
    let notice = &model.notices.active()[0];
    assert_eq!(notice.message, OFFLINE_NOTICE);
    assert_eq!(notice.severity, Severity::Warning);

    // A repeated offline report is not a transition.
    app.update(Event::NetworkStatusChanged { online: false }, &mut model);
    assert_eq!(model.notices.len(), 1);

    app.update(Event::NetworkStatusChanged { online: true }, &mut model);
    assert_eq!(model.notices.len(), 2);
    assert_eq!(model.notices.active()[1].message, ONLINE_NOTICE);
    assert_eq!(model.notices.active()[1].severity, Severity::Success);
}

#[test]
fn notices_expire_on_timer_ticks() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(Event::TimerTick { now_ms: 50_000 }, &mut model);
    app.update(
        Event::NoticePosted {
            message: "Saved".into(),
            severity: Severity::Success,
        },
        &mut model,
    );
    assert_eq!(model.notices.len(), 1);
    assert_eq!(model.notices.active()[0].phase, NoticePhase::Entering);

    app.update(
        Event::TimerTick {
            now_ms: 50_000 + NOTICE_TOTAL_MS,
        },
        &mut model,
    );
    assert!(model.notices.is_empty());
    assert!(app.view(&model).notices.is_empty());
}

#[test]
fn language_change_persists_and_notifies() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::LanguageSelected { code: "hi".into() },
        &mut model,
    );
    assert_eq!(model.language, arogya_shared::Language::Hi);
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Kv(_))));
    assert_eq!(model.notices.len(), 1);
    assert_eq!(model.notices.active()[0].severity, Severity::Success);

    // Unknown codes are ignored.
    app.update(Event::LanguageSelected { code: "xx".into() }, &mut model);
    assert_eq!(model.language, arogya_shared::Language::Hi);
    assert_eq!(model.notices.len(), 1);
}

#[test]
fn emergency_dial_confirm_logs_the_call() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(Event::TimerTick { now_ms: 1_000 }, &mut model);
    app.update(
        Event::EmergencyCallRequested {
            number: "108".into(),
        },
        &mut model,
    );

    let target = model.pending_dial.clone().expect("dial staged");
    assert_eq!(target.service.as_deref(), Some("Ambulance"));
    let view = app.view(&model);
    assert_eq!(
        view.dial_prompt.expect("prompt shown").message,
        "Call Ambulance (108)?"
    );

    let update = app.update(Event::DialConfirmed, &mut model);
    assert!(model.pending_dial.is_none());
    assert!(update
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Intents(_))));

    let update = app.update(
        Event::DialCompleted {
            target,
            error: None,
        },
        &mut model,
    );
    assert_eq!(model.emergency_logs.len(), 1);
    let entry = &model.emergency_logs[0];
    assert_eq!(entry.number, "108");
    assert_eq!(entry.service, "Ambulance");
    assert_eq!(entry.timestamp_ms, 1_000);
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Kv(_))));
    assert!(model
        .notices
        .active()
        .iter()
        .any(|n| n.message == "Calling Ambulance"));
}

#[test]
fn cancelled_dial_places_no_call() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(
        Event::EmergencyCallRequested {
            number: "100".into(),
        },
        &mut model,
    );
    let update = app.update(Event::DialCancelled, &mut model);
    assert!(model.pending_dial.is_none());
    assert!(model.emergency_logs.is_empty());
    assert!(!update
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Intents(_))));
}

#[test]
fn patient_calls_are_not_logged_as_emergencies() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(Event::PatientCallRequested { patient_id: 2 }, &mut model);
    let target = model.pending_dial.clone().expect("dial staged");
    assert_eq!(target.label, "Ram Kumar");
    assert!(target.service.is_none());

    app.update(Event::DialConfirmed, &mut model);
    app.update(
        Event::DialCompleted {
            target,
            error: None,
        },
        &mut model,
    );
    assert!(model.emergency_logs.is_empty());
}

#[test]
fn failed_dial_surfaces_an_error_notice() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(
        Event::EmergencyCallRequested {
            number: "101".into(),
        },
        &mut model,
    );
    let target = model.pending_dial.clone().expect("dial staged");
    app.update(Event::DialConfirmed, &mut model);
    app.update(
        Event::DialCompleted {
            target,
            error: Some("no dialer installed".into()),
        },
        &mut model,
    );

    assert!(model.emergency_logs.is_empty());
    assert_eq!(model.notices.len(), 1);
    let notice = &model.notices.active()[0];
    assert_eq!(notice.severity, Severity::Error);
    // Detail stays in the log, not in the user's face.
    assert!(!notice.message.contains("no dialer installed"));
}

#[test]
fn fault_reports_surface_the_generic_message() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(
        Event::FaultReported {
            detail: "stack overflow in renderer".into(),
        },
        &mut model,
    );
    assert_eq!(model.notices.len(), 1);
    let notice = &model.notices.active()[0];
    assert_eq!(notice.message, arogya_shared::GENERIC_FAULT_MESSAGE);
    assert_eq!(notice.severity, Severity::Error);
}

#[test]
fn patient_search_filters_the_view() {
    let app = AppTester::<Sathi, _>::default();
    let mut model = Model::default();

    app.update(
        Event::NavigateTo {
            page: "patients".into(),
        },
        &mut model,
    );
    app.update(
        Event::PatientSearchChanged {
            query: "rampur".into(),
        },
        &mut model,
    );

    let view = app.view(&model);
    match view.body {
        arogya_shared::PageContent::Patients(patients) => {
            assert_eq!(patients.query, "rampur");
            assert_eq!(patients.patients.len(), 2);
            assert!(patients
                .patients
                .iter()
                .all(|p| p.detail_line.contains("Rampur")));
        }
        other => panic!("expected the patients page, got {other:?}"),
    }
}
