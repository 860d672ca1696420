/*!
 * Named Test-Injection Points
 *
 * A global hook table keyed by name. Production code exposes a named point
 * plus a mutable payload; a test harness registers a callback for that name
 * to observe or rewrite the payload before the guarded operation proceeds.
 *
 * The whole module is compiled only under `cfg(test)` or the `test-hooks`
 * feature; in production builds the [`sync_point!`] macro expands to
 * nothing.
 */

use ahash::RandomState;
use dashmap::DashMap;
use std::any::Any;
use std::sync::OnceLock;

type Callback = Box<dyn Fn(&mut dyn Any) + Send + Sync>;

fn registry() -> &'static DashMap<&'static str, Callback, RandomState> {
    static REGISTRY: OnceLock<DashMap<&'static str, Callback, RandomState>> = OnceLock::new();
    REGISTRY.get_or_init(|| DashMap::with_hasher(RandomState::new()))
}

/// Register a callback for a named point, replacing any previous one.
pub fn register<F>(name: &'static str, callback: F)
where
    F: Fn(&mut dyn Any) + Send + Sync + 'static,
{
    registry().insert(name, Box::new(callback));
}

/// Remove the callback for a named point.
pub fn clear(name: &str) {
    registry().remove(name);
}

/// Remove every registered callback.
pub fn clear_all() {
    registry().clear();
}

/// Invoke the callback registered for `name`, if any, with the payload.
pub fn fire(name: &str, payload: &mut dyn Any) {
    if let Some(callback) = registry().get(name) {
        (callback.value())(payload);
    }
}
