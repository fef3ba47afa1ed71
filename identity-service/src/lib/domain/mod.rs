use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

pub mod access;
pub mod errors;
pub mod identity;
pub mod pagination;
pub mod provider;

static LAST_TIMESTAMP_ID: AtomicI64 = AtomicI64::new(0);

/// Identifier derived from the current time in milliseconds.
///
/// Strictly increasing within the process: two calls in the same millisecond
/// get consecutive values.
pub(crate) fn timestamp_id() -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_TIMESTAMP_ID.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_TIMESTAMP_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(current) => last = current,
        }
    }
}
