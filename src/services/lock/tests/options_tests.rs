use super::*;

#[test]
fn lock_options_defaults() {
    let options = LockOptions::default();
    assert_eq!(options.threshold, 1);
    assert_eq!(options.auto_release_delay_ms, None);
    assert_eq!(options.locked_class(), Some(DEFAULT_LOCKED_CLASS));
    assert!(!options.return_last_result_while_locked);
    assert!(options.release_on_future_settle);
    assert!(options.release_on_stream_activity);
    assert!(!options.verbose_logging);
}

#[test]
fn default_config_uses_argument_locator() {
    let config = LockConfig::default();
    assert!(config.locator.is_some());
    assert!(LockConfig::default().without_locator().locator.is_none());
}

#[test]
fn from_json_merges_over_defaults() {
    let options = LockOptions::from_json(r#"{ "threshold": 3, "verbose_logging": true }"#).unwrap();
    assert_eq!(options.threshold, 3);
    assert!(options.verbose_logging);
    assert_eq!(options.locked_class(), Some(DEFAULT_LOCKED_CLASS));
    assert!(options.release_on_future_settle);
}

#[test]
fn from_json_accepts_camel_case_aliases() {
    let options = LockOptions::from_json(
        r#"{
            "maxCall": 2,
            "unlockTimeout": 3000,
            "lockClass": null,
            "returnLastResultWhenLocked": true,
            "debug": true
        }"#,
    )
    .unwrap();

    assert_eq!(options.threshold, 2);
    assert_eq!(
        options.auto_release_delay(),
        Some(Duration::from_millis(3000))
    );
    assert_eq!(options.locked_class(), None);
    assert!(options.return_last_result_while_locked);
    assert!(options.verbose_logging);
}

#[test]
fn from_json_rejects_zero_threshold_and_garbage() {
    assert_eq!(
        LockOptions::from_json(r#"{ "threshold": 0 }"#),
        Err(LockError::Configuration(
            "threshold must be at least 1".to_string()
        ))
    );
    assert!(matches!(
        LockOptions::from_json("{ not json"),
        Err(LockError::Configuration(_))
    ));
}

#[test]
fn zero_delay_means_no_auto_release() {
    let options = LockOptions {
        auto_release_delay_ms: Some(0),
        ..LockOptions::default()
    };
    assert_eq!(options.auto_release_delay(), None);
}

#[test]
fn options_round_trip_through_json() {
    let config = LockConfig::default()
        .with_threshold(4)
        .with_auto_release(Duration::from_millis(250))
        .with_locked_class(Some("busy"))
        .release_on_stream_activity(false);

    let json = serde_json::to_string(&config.options).unwrap();
    let restored = LockOptions::from_json(&json).unwrap();
    assert_eq!(restored, config.options);
}

#[test]
fn auto_release_builder_rounds_sub_millisecond_delays_up() {
    let config = LockConfig::default().with_auto_release(Duration::from_micros(250));
    assert_eq!(config.options.auto_release_delay(), Some(Duration::from_millis(1)));

    let config = LockConfig::default().with_auto_release(Duration::from_micros(1500));
    assert_eq!(config.options.auto_release_delay_ms, Some(1));

    let config = LockConfig::default().with_auto_release(Duration::MAX);
    assert_eq!(config.options.auto_release_delay_ms, Some(u64::MAX));

    let config = LockConfig::default().with_auto_release(Duration::ZERO);
    assert_eq!(config.options.auto_release_delay(), None);
}
