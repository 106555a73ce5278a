//! Environment helpers shared by the repository and config integration tests.
//!
//! Repository selection (`REPOSITORY_TYPE`, `DATABASE_URL`) and Postgres URL
//! resolution (`PG_*`) read process-global env vars, so every test that
//! touches them goes through [`with_scoped_env`] or [`with_clean_db_env`].

use std::collections::BTreeMap;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Every variable that influences repository selection or the Postgres URL.
pub const DB_ENV_KEYS: &[&str] = &[
    "REPOSITORY_TYPE",
    "DATABASE_URL",
    "PG_DATABASE_URL",
    "PG_USER",
    "PG_PASSWORD",
    "PG_HOST",
    "PG_PORT",
    "PG_DBNAME",
];

/// Runs `f` with `changes` applied to the environment, restoring it afterwards.
///
/// `Some(v)` sets a variable and `None` removes it. Calls are serialized, and
/// the previous values come back even if `f` panics.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // A failed assertion in another test must not poison the rest
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::apply(changes);
    f()
}

/// Like [`with_scoped_env`], but first removes every [`DB_ENV_KEYS`] entry so
/// the developer's shell cannot leak a database into the test.
pub fn with_clean_db_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let mut merged: BTreeMap<&str, Option<&str>> =
        DB_ENV_KEYS.iter().map(|key| (*key, None)).collect();
    merged.extend(changes.iter().copied());
    let merged: Vec<(&str, Option<&str>)> = merged.into_iter().collect();
    with_scoped_env(&merged, f)
}

struct ScopedEnv {
    previous: BTreeMap<String, Option<String>>,
}

impl ScopedEnv {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let previous = changes
            .iter()
            .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
            .collect();

        for (key, value) in changes {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }

        Self { previous }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in std::mem::take(&mut self.previous) {
            match value {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}
