use super::*;
use crate::services::lock::options::LockOptions;
use crate::test_utils::init_logger;
use futures_util::stream as futures_stream;

fn locked_core(name: &str) -> Arc<LockCore> {
    init_logger();
    let core = LockCore::new(name, LockOptions::default()).unwrap();
    core.enter(&(), &[], None).unwrap();
    assert!(core.is_locked());
    core
}

#[tokio::test]
async fn release_on_activity_wraps_foreign_streams() {
    let core = locked_core("refresh");
    let source = futures_stream::iter(vec![Ok::<_, anyhow::Error>("a"), Ok("b")]);
    let mut tapped = release_on_activity(source, core.handle());

    assert_eq!(tapped.next().await.unwrap().unwrap(), "a");
    assert!(!core.is_locked());

    // Every later activity releases again; a new cycle is unlocked by it too
    core.enter(&(), &[], None).unwrap();
    assert_eq!(tapped.next().await.unwrap().unwrap(), "b");
    assert!(!core.is_locked());
}

#[tokio::test]
async fn dropping_after_activity_keeps_a_later_cycle_locked() {
    let core = locked_core("refresh");
    let source = futures_stream::iter(vec![Ok::<_, anyhow::Error>(1), Ok(2)]);
    let mut tapped = release_on_activity(source, core.handle());

    assert_eq!(tapped.next().await.unwrap().unwrap(), 1);
    assert!(!core.is_locked());

    core.enter(&(), &[], None).unwrap();
    drop(tapped);
    assert!(core.is_locked());
}

#[test]
fn dropping_an_idle_stream_releases() {
    let core = locked_core("refresh");
    let source = futures_stream::pending::<anyhow::Result<u8>>();
    drop(release_on_activity(source, core.handle()));
    assert!(!core.is_locked());
}

#[tokio::test]
async fn passthrough_stream_never_releases() {
    let core = locked_core("refresh");
    let source = futures_stream::iter(vec![Ok::<_, anyhow::Error>(1)]).boxed();
    let items: Vec<_> = GuardedStream::passthrough(source).collect().await;
    assert_eq!(items.len(), 1);
    assert!(core.is_locked());
}

#[tokio::test]
async fn stream_outliving_its_guard_is_harmless() {
    let core = locked_core("refresh");
    let handle = core.handle();
    drop(core);

    let source = futures_stream::iter(vec![Ok::<_, anyhow::Error>(1)]);
    let items: Vec<_> = release_on_activity(source, handle).collect().await;
    assert_eq!(items.len(), 1);
}

#[test]
fn release_on_drop_releases_at_scope_end() {
    let core = locked_core("upload");
    {
        let _release = ReleaseOnDrop::new(Some(core.handle()), MANUAL);
        assert!(core.is_locked());
    }
    assert!(!core.is_locked());

    // No handle, nothing to do
    drop(ReleaseOnDrop::new(None, MANUAL));
}

#[tokio::test]
async fn release_after_covers_success_and_cancellation() {
    let core = locked_core("upload");
    let value = release_after(async { 5 }, Some(core.handle()), RESPONSE_RECEIVED).await;
    assert_eq!(value, 5);
    assert!(!core.is_locked());

    core.enter(&(), &[], None).unwrap();
    let never = release_after(
        futures_util::future::pending::<()>(),
        Some(core.handle()),
        RESPONSE_RECEIVED,
    );
    let timed_out = tokio::time::timeout(Duration::from_millis(10), never).await;
    assert!(timed_out.is_err());
    assert!(!core.is_locked(), "dropping the request releases too");
}

#[tokio::test]
async fn release_on_settle_drives_future_eagerly() {
    let core = locked_core("load");
    let shared = release_on_settle(async { 3u8 }.boxed(), core.handle());

    // Nobody awaits `shared`; the spawned driver still settles it
    core.status().wait_for(false).await.unwrap();
    assert_eq!(shared.await, 3);
}
