//! Bounded fan-out executor. A fixed pool of workers pulls task indices from
//! a shared claim counter, so at most `limit` tasks are in flight and no
//! worker idles while unclaimed work remains. Results land at their task's
//! index: output order always equals input order, whatever the completion
//! order.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use futures::future;

/// Run `tasks` with at most `limit` in flight (a limit of zero is treated as
/// one). The runner never retries or suppresses failures; a task that must
/// not abort the batch catches its own errors and returns a degraded value.
pub async fn run_bounded<F, T>(tasks: Vec<F>, limit: usize) -> Vec<T>
where
    F: Future<Output = T>,
{
    let total = tasks.len();
    let next = AtomicUsize::new(0);
    let slots: Vec<Mutex<Option<F>>> = tasks.into_iter().map(|t| Mutex::new(Some(t))).collect();

    let worker_count = limit.max(1).min(total);
    let workers: Vec<_> = (0..worker_count)
        .map(|_| {
            let next = &next;
            let slots = &slots;
            async move {
                let mut completed = Vec::new();
                loop {
                    // fetch_add hands out each index exactly once, so no two
                    // workers can claim the same task.
                    let index = next.fetch_add(1, Ordering::SeqCst);
                    if index >= total {
                        break;
                    }
                    let task = slots[index]
                        .lock()
                        .expect("slot lock poisoned")
                        .take()
                        .expect("task index claimed twice");
                    completed.push((index, task.await));
                }
                completed
            }
        })
        .collect();

    let mut results: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    for batch in future::join_all(workers).await {
        for (index, value) in batch {
            results[index] = Some(value);
        }
    }
    results
        .into_iter()
        .map(|slot| slot.expect("every task index produces a result"))
        .collect()
}
