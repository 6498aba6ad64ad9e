// ABOUTME: Tests for the public lifecycle API: variant shorthands, snapshots and change notifications

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use toast_queue::{AnimationState, ToastError, ToastOptions, Toaster, ToasterConfig, Variant};

fn toaster() -> Toaster {
    Toaster::new(ToasterConfig::default()).expect("valid config")
}

#[tokio::test(start_paused = true)]
async fn test_shorthands_set_variant() {
    let toaster = toaster();

    let ids = [
        (toaster.success("ok"), Variant::Success),
        (toaster.error("bad"), Variant::Error),
        (toaster.warning("careful"), Variant::Warning),
        (toaster.info("fyi"), Variant::Info),
        (toaster.loading("wait"), Variant::Loading),
    ];

    for (id, expected) in ids {
        assert_eq!(toaster.store().get(&id).unwrap().variant, expected);
    }
}

#[tokio::test(start_paused = true)]
async fn test_loading_shorthand_forces_persistent() {
    let toaster = toaster();

    let id = toaster.loading_with("wait", ToastOptions::default().duration(Duration::from_secs(1)));

    let record = toaster.store().get(&id).unwrap();
    assert!(record.is_persistent());
    assert!(!toaster.store().has_countdown(&id));
}

#[tokio::test(start_paused = true)]
async fn test_shorthand_options_are_applied() {
    let toaster = toaster();
    let clicks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&clicks);

    let id = toaster.error_with(
        "Upload failed",
        ToastOptions::default()
            .id("upload-error")
            .title("Upload")
            .duration(Duration::from_secs(10))
            .action("Retry", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
    );

    assert_eq!(id.as_str(), "upload-error");
    let record = toaster.store().get(&id).unwrap();
    assert_eq!(record.content.title.as_deref(), Some("Upload"));
    assert_eq!(record.duration, Duration::from_secs(10));

    // The renderer triggers the action; the manager only carries it
    record.content.action.as_ref().unwrap().invoke();
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_snapshots_serialize_for_renderers() {
    let toaster = toaster();
    let id = toaster.success_with("Saved", ToastOptions::default().title("Profile"));
    toaster.pause_toast(&id);

    let snapshots = toaster.snapshots();
    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].paused);
    assert_eq!(snapshots[0].animation_state, AnimationState::Entering);
    assert_eq!(snapshots[0].remaining_ms, Some(5000));

    let json = serde_json::to_value(&snapshots[0]).unwrap();
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["variant"], "success");
    assert_eq!(json["title"], "Profile");
    assert_eq!(json["animation_state"], "entering");
    assert!(json.get("action_label").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_changes() {
    let toaster = toaster();
    let mut changes = toaster.subscribe();

    let id = toaster.info("hello");
    assert!(changes.has_changed().unwrap());
    changes.borrow_and_update();

    toaster.remove_toast(&id);
    changes.changed().await.unwrap();
    assert!(toaster.visible()[0].is_exiting());
}

#[tokio::test(start_paused = true)]
async fn test_position_is_carried_but_not_interpreted() {
    let config = ToasterConfig::default().with_position(toast_queue::Position::TopLeft);
    let toaster = Toaster::new(config.clone()).unwrap();

    assert_eq!(toaster.config(), config);
}

#[test]
fn test_toaster_requires_runtime() {
    let result = Toaster::new(ToasterConfig::default());
    assert!(matches!(result, Err(ToastError::NoRuntime)));
}

#[tokio::test]
async fn test_toaster_rejects_zero_max_visible() {
    let result = Toaster::new(ToasterConfig::default().with_max_visible(0));
    assert!(matches!(result, Err(ToastError::InvalidConfig(_))));
}
