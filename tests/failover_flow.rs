//! End-to-end flows through the failover controller.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

use provider_failover::{
    CheckCatalog, ControllerError, FailoverConfig, FailoverController, PollerEvent, ProviderSeed,
    ScoredEndpoint, ValidationErrorDetails,
};

mod common;
use common::RecordingPoller;

fn two_provider_config() -> FailoverConfig {
    FailoverConfig {
        providers: vec![
            ProviderSeed {
                url: "https://api.hive.blog".to_string(),
                checks: vec!["block_api".to_string()],
            },
            ProviderSeed {
                url: "https://anyx.io".to_string(),
                checks: vec!["block_api".to_string()],
            },
        ],
        active_url: Some("https://api.hive.blog".to_string()),
    }
}

fn controller_with(config: &FailoverConfig) -> (Arc<RecordingPoller>, FailoverController) {
    let poller = Arc::new(RecordingPoller::new());
    let controller =
        FailoverController::new(poller.clone(), CheckCatalog::builtin(), config).unwrap();
    (poller, controller)
}

#[test]
fn test_shared_check_compiles_to_one_registration() {
    let (poller, _controller) = controller_with(&two_provider_config());

    let table = poller.table();
    assert_eq!(table.len(), 1, "one register call for the one shared check");
    assert_eq!(table[0].method, "block_api.get_block");
    assert_eq!(
        table[0].provider_urls,
        vec![
            "https://api.hive.blog".to_string(),
            "https://anyx.io".to_string()
        ]
    );
}

#[test]
fn test_each_mutation_recompiles_once() {
    let (poller, controller) = controller_with(&two_provider_config());
    assert_eq!(poller.unregister_count(), 1, "initial sync");

    controller.add_provider("https://new.node").unwrap();
    assert_eq!(poller.unregister_count(), 2);

    controller
        .set_checks_for_provider("https://new.node", &["block_api".to_string()])
        .unwrap();
    assert_eq!(poller.unregister_count(), 3);

    let table = poller.table();
    assert_eq!(table.len(), 1, "new.node's catalog defaults were replaced");
    assert!(table[0]
        .provider_urls
        .contains(&"https://new.node".to_string()));
}

#[test]
fn test_unchanged_config_compiles_identically() {
    let (poller, controller) = controller_with(&two_provider_config());
    let first = poller.table();

    // A mutation immediately undone leaves the same configuration; the
    // resulting registrations must be identical, call for call.
    controller.add_provider("https://new.node").unwrap();
    controller.delete_provider("https://new.node").unwrap();
    let second = poller.table();

    assert_eq!(first, second);
}

#[test]
fn test_removing_active_provider_fails_and_keeps_state() {
    let (poller, controller) = controller_with(&two_provider_config());
    let syncs = poller.unregister_count();

    let err = controller
        .delete_provider("https://api.hive.blog")
        .unwrap_err();
    assert!(matches!(err, ControllerError::ActiveProviderRemoval(_)));

    assert_eq!(controller.list().len(), 2);
    assert_eq!(
        controller.failover_state().active_provider_url.as_deref(),
        Some("https://api.hive.blog")
    );
    assert_eq!(poller.unregister_count(), syncs, "no recompilation happened");
}

#[test]
fn test_poller_failure_rolls_back_and_recovers() {
    let (poller, controller) = controller_with(&two_provider_config());

    poller.fail_registrations(true);
    let err = controller.add_provider("https://new.node").unwrap_err();
    assert!(matches!(err, ControllerError::Poller(_)));
    assert_eq!(controller.list().len(), 2);

    poller.fail_registrations(false);
    controller
        .set_checks_for_provider("https://anyx.io", &[])
        .unwrap();
    let table = poller.table();
    assert_eq!(table.len(), 1);
    assert_eq!(
        table[0].provider_urls,
        vec!["https://api.hive.blog".to_string()],
        "rolled-back provider is absent, anyx.io polls nothing"
    );
}

#[test]
fn test_fallback_registration_is_idempotent() {
    let (_poller, controller) = controller_with(&two_provider_config());

    controller.register_fallback("https://anyx.io").unwrap();
    controller.register_fallback("https://anyx.io").unwrap();
    assert_eq!(
        controller.failover_state().fallback_urls,
        vec!["https://anyx.io".to_string()]
    );

    controller.remove_fallback("https://api.deathwing.me");
    assert_eq!(controller.failover_state().fallback_urls.len(), 1);
}

#[test]
fn test_restore_defaults_resets_checks_and_fallbacks() {
    let (_poller, controller) = controller_with(&two_provider_config());
    let catalog = CheckCatalog::builtin();

    controller.add_provider("https://new.node").unwrap();
    controller.register_fallback("https://new.node").unwrap();
    controller
        .set_checks_for_provider("https://api.hive.blog", &[])
        .unwrap();

    controller.restore_defaults().unwrap();

    let providers = controller.list();
    assert_eq!(providers.len(), 2);
    for provider in &providers {
        assert_eq!(
            provider.enabled_checks,
            catalog.keys(),
            "restore re-enables the full default check set"
        );
        assert!(!provider.is_fallback);
    }
    assert!(controller.failover_state().fallback_urls.is_empty());
}

#[test]
fn test_unhealthy_score_is_reported_but_not_acted_on() {
    let (_poller, controller) = controller_with(&two_provider_config());

    controller.handle_event(PollerEvent::Scores(vec![ScoredEndpoint {
        url: "https://api.hive.blog".to_string(),
        score: -1.0,
        up: false,
        last_latency: None,
    }]));

    let score = controller.score_for("https://api.hive.blog").unwrap();
    assert!(!score.is_healthy());
    assert_eq!(
        controller.failover_state().active_provider_url.as_deref(),
        Some("https://api.hive.blog"),
        "failover stays a manual operator action"
    );

    controller
        .switch_to_provider(Some("https://anyx.io"))
        .unwrap();
    assert_eq!(
        controller.failover_state().active_provider_url.as_deref(),
        Some("https://anyx.io")
    );
}

#[test]
fn test_validation_error_slot_last_write_wins() {
    let (_poller, controller) = controller_with(&two_provider_config());

    let first = ValidationErrorDetails {
        provider_name: "https://api.hive.blog".to_string(),
        check_name: "block_api".to_string(),
        message: "response is missing \"block\"".to_string(),
        paths: vec!["result.block".to_string()],
    };
    let second = ValidationErrorDetails {
        provider_name: "https://anyx.io".to_string(),
        check_name: "block_api".to_string(),
        message: "response is missing \"block\"".to_string(),
        paths: vec!["result.block".to_string()],
    };

    controller.handle_event(PollerEvent::ValidationFailed(first.clone()));
    controller.handle_event(PollerEvent::ValidationFailed(second.clone()));
    assert_eq!(controller.validation_error(), Some(second.clone()));

    // A clear aimed at the replaced error must not clear the newer one.
    controller.clear_validation_error(&first.provider_name, &first.check_name);
    assert_eq!(controller.validation_error(), Some(second.clone()));

    controller.clear_validation_error(&second.provider_name, &second.check_name);
    assert_eq!(controller.validation_error(), None);
}

#[tokio::test]
async fn test_intake_loop_applies_snapshots_last_wins() {
    let (_poller, controller) = controller_with(&two_provider_config());
    let controller = Arc::new(controller);

    let (events_tx, events_rx) = mpsc::channel(8);
    let (shutdown_tx, _) = broadcast::channel(1);

    let intake = {
        let controller = controller.clone();
        let shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(async move { controller.run(events_rx, shutdown_rx).await })
    };

    let snapshot = |score: f64| {
        PollerEvent::Scores(vec![ScoredEndpoint {
            url: "https://api.hive.blog".to_string(),
            score,
            up: score > 0.0,
            last_latency: if score > 0.0 { Some(95) } else { None },
        }])
    };
    events_tx.send(snapshot(7.0)).await.unwrap();
    events_tx.send(snapshot(-2.0)).await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            let scores = controller.current_scores();
            if scores.len() == 1 && scores[0].score == -2.0 {
                break;
            }
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("intake never applied the second snapshot");

    shutdown_tx.send(()).unwrap();
    intake.await.unwrap();
}

#[tokio::test]
async fn test_intake_loop_exits_when_channel_closes() {
    let (_poller, controller) = controller_with(&two_provider_config());
    let controller = Arc::new(controller);

    let (events_tx, events_rx) = mpsc::channel::<PollerEvent>(1);
    // Keep the sender alive so the exit is driven by the event channel.
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let intake = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.run(events_rx, shutdown_rx).await })
    };

    drop(events_tx);
    tokio::time::timeout(Duration::from_secs(1), intake)
        .await
        .expect("intake did not exit on channel close")
        .unwrap();
}
