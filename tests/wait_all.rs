// tests/wait_all.rs

mod common;
use crate::common::builders::{
    cancellable_sleep, failing_task, ok_task, panicking_task, Counter, Recorder, TestError,
};
use crate::common::{init_tracing, with_timeout};

use std::time::Duration;

use taskpool::{CancellationToken, PoolConfig, RunError, TaskPool};

#[tokio::test]
async fn collects_every_error() {
    init_tracing();

    let task1 = failing_task("err1", Duration::ZERO, []);
    let task2 = failing_task("err2", Duration::ZERO, []);

    let res = with_timeout(TaskPool::new().wait_all(
        &CancellationToken::new(),
        &[task1.clone(), task2.clone()],
    ))
    .await
    .expect("both tasks fail");

    assert!(matches!(res.combined(), RunError::Joined(errs) if errs.len() == 2));
    assert!(res.contains(|e| e.find::<TestError>() == Some(&TestError("err1"))));
    assert!(res.contains(|e| e.find::<TestError>() == Some(&TestError("err2"))));

    let err1 = res.get_result(&task1).and_then(|e| e.find::<TestError>());
    let err2 = res.get_result(&task2).and_then(|e| e.find::<TestError>());
    assert_eq!(err1, Some(&TestError("err1")));
    assert_eq!(err2, Some(&TestError("err2")));
}

#[tokio::test]
async fn no_errors_returns_none() {
    init_tracing();

    let res = TaskPool::new()
        .wait_all(&CancellationToken::new(), &[ok_task([]), ok_task([])])
        .await;

    assert!(res.is_none());
}

#[tokio::test]
async fn no_tasks_returns_none() {
    let res = TaskPool::new().wait_all(&CancellationToken::new(), &[]).await;
    assert!(res.is_none());
}

#[tokio::test]
async fn timeout_sets_sentinel() {
    init_tracing();

    let recorder = Recorder::new();
    let fast = recorder.task(1, []);
    let slow = recorder.sleeping_task(2, Duration::from_millis(500), []);

    let pool = TaskPool::with_config(
        PoolConfig::builder()
            .timeout(Duration::from_millis(20))
            .build(),
    );
    let res = with_timeout(pool.wait_all(&CancellationToken::new(), &[fast, slow]))
        .await
        .expect("run timed out");

    assert!(res.is_timeout());
    assert_eq!(res.to_string(), "timeout");
}

#[tokio::test]
async fn max_concurrency_serialises_independent_tasks() {
    init_tracing();

    let recorder = Recorder::new();
    let task1 = recorder.sleeping_task(1, Duration::from_millis(50), []);
    let task2 = recorder.task(2, []);

    let pool = TaskPool::with_config(PoolConfig::builder().max_concurrency(1).build());
    let res = with_timeout(pool.wait_all(&CancellationToken::new(), &[task1, task2])).await;

    assert!(res.is_none());
    assert_eq!(recorder.events(), vec![1, 2]);
}

#[tokio::test]
async fn prerequisites_run_first_regardless_of_submission_order() {
    init_tracing();

    let recorder = Recorder::new();
    let task1 = recorder.task(1, []);
    let task2 = recorder.task(2, [task1.clone()]);

    let res = with_timeout(TaskPool::new().wait_all(&CancellationToken::new(), &[task2, task1])).await;

    assert!(res.is_none());
    assert_eq!(recorder.events(), vec![1, 2]);
}

#[tokio::test]
async fn diamond_runs_join_after_both_branches() {
    init_tracing();

    let recorder = Recorder::new();
    let root = recorder.task(0, []);
    let left = recorder.sleeping_task(1, Duration::from_millis(20), [root.clone()]);
    let right = recorder.task(2, [root.clone()]);
    let join = recorder.task(3, [left.clone(), right.clone()]);

    let res = with_timeout(
        TaskPool::new().wait_all(&CancellationToken::new(), &[join, right, left, root]),
    )
    .await;

    assert!(res.is_none());
    let events = recorder.events();
    assert_eq!(events.len(), 4);
    assert_eq!(events.first(), Some(&0));
    assert_eq!(events.last(), Some(&3));
}

#[tokio::test]
async fn failure_does_not_stop_siblings_or_dependents() {
    init_tracing();

    let recorder = Recorder::new();
    let failing = failing_task("boom", Duration::ZERO, []);
    let sibling = recorder.sleeping_task(1, Duration::from_millis(20), []);
    let dependent = recorder.task(2, [failing.clone()]);

    let res = with_timeout(TaskPool::new().wait_all(
        &CancellationToken::new(),
        &[failing.clone(), sibling, dependent.clone()],
    ))
    .await
    .expect("one task fails");

    assert_eq!(res.causes().len(), 1);
    assert!(res.get_result(&dependent).is_none());
    assert_eq!(recorder.events().len(), 2);
}

#[tokio::test]
async fn panic_is_reported_as_panic_error() {
    init_tracing();

    let task1 = panicking_task(42_i32, []);
    let task2 = ok_task([]);

    let res = with_timeout(TaskPool::new().wait_all(&CancellationToken::new(), &[task1, task2]))
        .await
        .expect("panic is an error");

    let panic = res.find::<taskpool::PanicError>().expect("panic error in result");
    assert_eq!(panic.payload::<i32>(), Some(42));
    assert!(!panic.trace().is_empty());
}

#[tokio::test]
async fn duplicate_submission_runs_once() {
    init_tracing();

    let counter = Counter::new();
    let task = counter.task([]);

    let res = with_timeout(
        TaskPool::new().wait_all(&CancellationToken::new(), &[task.clone(), task.clone()]),
    )
    .await;

    assert!(res.is_none());
    assert_eq!(counter.get(), 1);
}

#[tokio::test]
async fn duplicate_prerequisite_releases_after_one_completion() {
    init_tracing();

    let recorder = Recorder::new();
    let parent = recorder.task(1, []);
    let child = recorder.task(2, [parent.clone(), parent.clone()]);

    let res = with_timeout(TaskPool::new().wait_all(&CancellationToken::new(), &[parent, child])).await;

    assert!(res.is_none());
    assert_eq!(recorder.events(), vec![1, 2]);
}

#[tokio::test]
async fn tasks_are_reusable_across_runs() {
    init_tracing();

    let counter = Counter::new();
    let first = counter.task([]);
    let second = counter.task([first.clone()]);
    let tasks = [first, second];
    let pool = TaskPool::new();

    for _ in 0..3 {
        let res = with_timeout(pool.wait_all(&CancellationToken::new(), &tasks)).await;
        assert!(res.is_none());
    }

    assert_eq!(counter.get(), 6);
}

#[tokio::test]
async fn default_pool_shim_behaves_like_new_pool() {
    let recorder = Recorder::new();
    let task1 = recorder.task(1, []);
    let task2 = recorder.task(2, [task1.clone()]);

    let res = with_timeout(taskpool::wait_all(&CancellationToken::new(), &[task2, task1])).await;

    assert!(res.is_none());
    assert_eq!(recorder.events(), vec![1, 2]);
}

#[tokio::test]
async fn caller_cancellation_reaches_running_work() {
    init_tracing();

    let cancel = CancellationToken::new();
    let sleeper = cancellable_sleep(Duration::from_secs(2));
    let after = ok_task([sleeper.clone()]);

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let res = with_timeout(TaskPool::new().wait_all(&cancel, &[sleeper.clone(), after.clone()]))
        .await
        .expect("sleeper was cancelled");

    let sleeper_err = res.get_result(&sleeper).expect("sleeper error recorded");
    assert_eq!(sleeper_err.to_string(), "cancelled while sleeping");
    // The dependent is released but never started.
    assert!(res.get_result(&after).is_some_and(|e| e.is_cancelled()));
    assert!(matches!(res.combined(), RunError::Joined(errs) if errs.len() == 2));
}

#[tokio::test]
async fn zero_timeout_set_directly_means_no_timeout() {
    init_tracing();

    let recorder = Recorder::new();
    let task = recorder.sleeping_task(1, Duration::from_millis(30), []);

    let pool = TaskPool::with_config(PoolConfig {
        timeout: Some(Duration::ZERO),
        ..PoolConfig::default()
    });
    let res = with_timeout(pool.wait_all(&CancellationToken::new(), &[task])).await;

    assert!(res.is_none());
    assert_eq!(recorder.events(), vec![1]);
}

const STRESS_RUNS: usize = 300;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn chain_with_duplicate_prerequisites_on_worker_threads() {
    init_tracing();

    let pool = TaskPool::with_config(PoolConfig::builder().max_concurrency(2).build());

    for run in 0..STRESS_RUNS {
        let recorder = Recorder::new();
        let a = recorder.task(1, []);
        let b = recorder.task(2, [a.clone(), a.clone()]);
        let c = recorder.task(3, [b.clone(), a.clone()]);

        let res = with_timeout(pool.wait_all(&CancellationToken::new(), &[c, b, a])).await;

        assert!(res.is_none(), "run {run}: unexpected errors");
        assert_eq!(recorder.events(), vec![1, 2, 3], "run {run}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn diamond_with_duplicate_prerequisites_on_worker_threads() {
    init_tracing();

    let pool = TaskPool::with_config(PoolConfig::builder().max_concurrency(2).build());

    for run in 0..STRESS_RUNS {
        let recorder = Recorder::new();
        let top = recorder.task(1, []);
        let left = recorder.task(2, [top.clone()]);
        let right = recorder.task(3, [top.clone(), top.clone()]);
        let join = recorder.task(4, [left.clone(), right.clone(), left.clone()]);

        let res = with_timeout(pool.wait_all(
            &CancellationToken::new(),
            &[join, right, left, top],
        ))
        .await;

        assert!(res.is_none(), "run {run}: unexpected errors");

        let events = recorder.events();
        assert_eq!(events.len(), 4, "run {run}: {events:?}");
        assert_eq!(events[0], 1, "run {run}: {events:?}");
        assert_eq!(events[3], 4, "run {run}: {events:?}");
        let mut middle = events[1..3].to_vec();
        middle.sort_unstable();
        assert_eq!(middle, vec![2, 3], "run {run}: {events:?}");
    }
}
