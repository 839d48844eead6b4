//! Utility helpers shared across client UI modules.

pub mod format;
pub mod progress;

/// Local wall clock in unix seconds. Zero outside a browser environment.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn local_now() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        (js_sys::Date::now() / 1000.0).floor() as i64
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0
    }
}
