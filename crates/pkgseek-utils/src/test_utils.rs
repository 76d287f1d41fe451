//! Environment helpers for tests that touch process-wide variables.
//!
//! Callers must be `#[serial]`, the environment is shared by every test thread.

fn restore(old_vars: Vec<(&str, Option<String>)>) {
    for (key, old_value) in old_vars {
        match old_value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
}

/// Runs `f` with `vars` set, then puts the previous values back.
pub fn with_env<F>(vars: Vec<(&str, &str)>, f: F)
where
    F: FnOnce(),
{
    let old_vars: Vec<_> = vars
        .iter()
        .map(|(k, _)| (*k, std::env::var(k).ok()))
        .collect();

    for (key, value) in &vars {
        std::env::set_var(key, value);
    }

    f();

    restore(old_vars);
}

/// Runs `f` with `keys` unset, then puts the previous values back.
pub fn without_env<F>(keys: &[&str], f: F)
where
    F: FnOnce(),
{
    let old_vars: Vec<_> = keys
        .iter()
        .map(|k| (*k, std::env::var(k).ok()))
        .collect();

    for key in keys {
        std::env::remove_var(key);
    }

    f();

    restore(old_vars);
}
