use market_pulse_client::domain::dashboard::{ActivityEntry, Alert, AlertSeverity, LOG_CAPACITY};
use market_pulse_client::domain::store::DashboardStore;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn alerts_keep_the_newest_fifty(messages: Vec<String>) -> bool {
    let store = DashboardStore::new();
    for message in &messages {
        store.add_alert(Alert::now(AlertSeverity::Info, message.clone()));
    }

    let alerts = store.alerts();
    alerts.len() == messages.len().min(LOG_CAPACITY)
        && alerts.iter().zip(messages.iter().rev()).all(|(alert, message)| &alert.message == message)
}

#[quickcheck]
fn activity_keeps_the_newest_fifty(count: u8) -> bool {
    let store = DashboardStore::new();
    for i in 0..count {
        store.add_activity(ActivityEntry::now(format!("step {i}")));
    }

    let log = store.activity_log();
    let expected_len = (count as usize).min(LOG_CAPACITY);
    log.len() == expected_len
        && log.first().map(|entry| entry.message.clone()) == count.checked_sub(1).map(|last| format!("step {last}"))
}

#[test]
fn fifty_first_alert_drops_the_oldest() {
    let store = DashboardStore::new();
    for i in 0..=LOG_CAPACITY {
        store.add_alert(Alert::now(AlertSeverity::Warning, format!("alert {i}")));
    }

    let alerts = store.alerts();
    assert_eq!(alerts.len(), LOG_CAPACITY);
    assert_eq!(alerts[0].message, format!("alert {LOG_CAPACITY}"));
    assert_eq!(alerts[LOG_CAPACITY - 1].message, "alert 1");
}
