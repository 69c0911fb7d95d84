//! WASM bindings for slot-engine.
//!
//! The patient booking page and the provider schedule page both call these
//! exports, so slot expansion lives in exactly one place. All complex types
//! cross the boundary as JSON strings, matching `api`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

pub mod api;

use wasm_bindgen::prelude::*;

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Dates a patient can pick, as a JSON array of `YYYY-MM-DD` strings.
///
/// # Arguments
/// - `schedule_json` -- `{providerId, timezone, rules}` document or a bare array of rule rows
/// - `now` -- Optional pinned "now" (RFC 3339, local `YYYY-MM-DDTHH:MM`, or `YYYY-MM-DD`)
/// - `horizon_days` -- Optional horizon for recurring rules (default 14)
#[wasm_bindgen(js_name = "offerableDates")]
pub fn offerable_dates(
    schedule_json: &str,
    now: Option<String>,
    horizon_days: Option<u32>,
) -> Result<String, JsValue> {
    api::offerable_dates(schedule_json, now.as_deref(), horizon_days).map_err(js_error)
}

/// Start times on `date` (`YYYY-MM-DD`), as a JSON array of `HH:MM` strings.
#[wasm_bindgen(js_name = "offerableTimes")]
pub fn offerable_times(
    schedule_json: &str,
    date: &str,
    granularity_minutes: Option<u32>,
) -> Result<String, JsValue> {
    api::offerable_times(schedule_json, date, granularity_minutes).map_err(js_error)
}

/// Slots still open for booking, as a JSON array of `{date, time}` objects.
///
/// `bookings_json` is an array of `{date, time, durationMinutes?, status?}`
/// rows; `config_json` an optional resolver config document.
#[wasm_bindgen(js_name = "bookableSlots")]
pub fn bookable_slots(
    schedule_json: &str,
    bookings_json: &str,
    now: Option<String>,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    api::bookable_slots(
        schedule_json,
        bookings_json,
        now.as_deref(),
        config_json.as_deref(),
    )
    .map_err(js_error)
}

/// Validate a schedule and report rejected or flagged rules.
#[wasm_bindgen(js_name = "validateSchedule")]
pub fn validate_schedule(
    schedule_json: &str,
    granularity_minutes: Option<u32>,
) -> Result<String, JsValue> {
    api::validate_schedule(schedule_json, granularity_minutes).map_err(js_error)
}
