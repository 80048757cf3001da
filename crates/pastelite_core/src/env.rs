//! Scoped environment overrides for configuration tests.

use std::sync::{Mutex, MutexGuard, OnceLock};

fn lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    // A test that panicked inside `with_env` still restored its variables.
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[allow(unused_unsafe)]
fn apply(key: &str, value: Option<&str>) {
    // SAFETY: every mutation happens while `lock()` is held.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

struct Restore(Vec<(String, Option<String>)>);

impl Drop for Restore {
    fn drop(&mut self) {
        for (key, previous) in self.0.drain(..).rev() {
            apply(&key, previous.as_deref());
        }
    }
}

/// Run `body` with each `(key, value)` applied (`None` unsets the key).
///
/// Calls are serialized process-wide and every variable is put back
/// afterwards, including when `body` panics.
pub(crate) fn with_env<T>(vars: &[(&str, Option<&str>)], body: impl FnOnce() -> T) -> T {
    let _guard = lock();
    let mut restore = Restore(Vec::with_capacity(vars.len()));
    for (key, value) in vars {
        restore.0.push((key.to_string(), std::env::var(key).ok()));
        apply(key, *value);
    }
    body()
}

#[test]
fn with_env_restores_set_and_unset_variables() {
    let set_key = "PASTELITE_WITH_ENV_SET";
    let unset_key = "PASTELITE_WITH_ENV_UNSET";
    let seen = with_env(&[(set_key, Some("inside")), (unset_key, Some("x"))], || {
        (std::env::var(set_key).ok(), std::env::var(unset_key).ok())
    });
    assert_eq!(seen, (Some("inside".to_string()), Some("x".to_string())));
    assert!(std::env::var(set_key).is_err());
    assert!(std::env::var(unset_key).is_err());
}
