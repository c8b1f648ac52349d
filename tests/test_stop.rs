//! Stopping a rotator: no updates after `stop`, idempotence, teardown.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use common::Updates;
use typecycle::error::RotatorError;
use typecycle::rotator::PhraseList;
use typecycle::scheduler::Scheduler;
use typecycle::{TextRotator, start};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test(start_paused = true)]
async fn no_updates_after_stop() {
    let updates = Updates::new();
    let handle = start(["Web Developer"], updates.sink()).unwrap();

    tokio::time::sleep(ms(1000)).await;
    let before = updates.snapshot();
    assert_eq!(before, vec!["W", "We", "Web", "Web ", "Web D", "Web De"]);

    handle.stop();
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(updates.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn stop_during_hold_prevents_deletion() {
    let updates = Updates::new();
    let handle = start(["ab"], updates.sink()).unwrap();

    tokio::time::sleep(ms(1000)).await;
    assert_eq!(updates.snapshot(), vec!["a", "ab", "ab"]);

    handle.stop();
    tokio::time::sleep(ms(5000)).await;
    assert_eq!(updates.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn stop_at_tick_boundary_delivers_nothing_later() {
    let updates = Updates::new();
    let handle = start(["abc"], updates.sink()).unwrap();

    // lands on the same instant as the second type tick
    tokio::time::sleep(ms(300)).await;
    handle.stop();
    let at_stop = updates.len();
    assert!((1..=2).contains(&at_stop), "got {at_stop} updates");

    tokio::time::sleep(ms(10_000)).await;
    assert_eq!(updates.len(), at_stop);
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent() {
    let updates = Updates::new();
    let handle = start(["abc"], updates.sink()).unwrap();
    tokio::time::sleep(ms(200)).await;

    handle.stop();
    handle.stop();
    handle.stop();
    assert!(handle.is_stopped());

    let summary = handle.shutdown().await;
    assert_eq!(summary.ticks, 1);
    assert_eq!(summary.emissions, 1);
}

#[tokio::test(start_paused = true)]
async fn stop_before_first_tick() {
    let updates = Updates::new();
    let handle = start(["abc"], updates.sink()).unwrap();
    handle.stop();

    tokio::time::sleep(ms(1000)).await;
    assert!(updates.snapshot().is_empty());
    assert_eq!(handle.shutdown().await.ticks, 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_tears_down() {
    let updates = Updates::new();
    {
        let _handle = start(["abc"], updates.sink()).unwrap();
        tokio::time::sleep(ms(160)).await;
    }
    tokio::time::sleep(ms(10_000)).await;
    assert_eq!(updates.snapshot(), vec!["a"]);
}

#[tokio::test]
async fn empty_phrase_list_rejected() {
    let updates = Updates::new();
    let result = start(Vec::<&str>::new(), updates.sink());
    let err = tokio_test::assert_err!(result);
    assert!(matches!(err, RotatorError::InvalidArgument(_)));

    assert!(PhraseList::new(Vec::<String>::new()).is_err());
}

#[test]
fn start_without_runtime_is_rejected() {
    let updates = Updates::new();
    let phrases = PhraseList::new(["a"]).unwrap();
    let err = TextRotator::new(phrases).start(updates.sink()).unwrap_err();
    assert_eq!(err, RotatorError::NoRuntime);
}

#[tokio::test(start_paused = true)]
async fn panicking_callback_surfaces_on_shutdown() {
    let handle = start(["a"], |_text: &str| panic!("render failed")).unwrap();
    tokio::time::sleep(ms(200)).await;

    let joined = tokio::spawn(handle.shutdown()).await;
    let err = joined.unwrap_err();
    assert!(err.is_panic());
}

/// Completes every delay at once so ticks contend with the caller.
struct YieldScheduler;

#[async_trait::async_trait]
impl Scheduler for YieldScheduler {
    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }

    fn name(&self) -> &'static str {
        "yield"
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn no_updates_after_stop_on_worker_threads() {
    let mut late = 0;
    for round in 0..2000 {
        let returned = Arc::new(AtomicBool::new(false));
        let late_calls = Arc::new(AtomicUsize::new(0));
        let handle = {
            let returned = Arc::clone(&returned);
            let late_calls = Arc::clone(&late_calls);
            TextRotator::new(PhraseList::new(["abc", "de"]).unwrap())
                .with_scheduler(YieldScheduler)
                .start(move |_text: &str| {
                    if returned.load(Ordering::SeqCst) {
                        late_calls.fetch_add(1, Ordering::SeqCst);
                    }
                })
                .unwrap()
        };

        for _ in 0..round % 7 {
            tokio::task::yield_now().await;
        }
        handle.stop();
        returned.store(true, Ordering::SeqCst);
        handle.shutdown().await;
        late += late_calls.load(Ordering::SeqCst);
    }
    assert_eq!(late, 0, "updates delivered after stop() returned");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_waits_for_running_callback() {
    let entered = Arc::new(AtomicBool::new(false));
    let finished = Arc::new(AtomicBool::new(false));
    let handle = {
        let entered = Arc::clone(&entered);
        let finished = Arc::clone(&finished);
        TextRotator::new(PhraseList::new(["abc"]).unwrap())
            .with_scheduler(YieldScheduler)
            .start(move |_text: &str| {
                if !entered.swap(true, Ordering::SeqCst) {
                    std::thread::sleep(ms(100));
                    finished.store(true, Ordering::SeqCst);
                }
            })
            .unwrap()
    };

    while !entered.load(Ordering::SeqCst) {
        tokio::task::yield_now().await;
    }
    handle.stop();
    assert!(finished.load(Ordering::SeqCst));
    assert!(handle.shutdown().await.emissions >= 1);
}
