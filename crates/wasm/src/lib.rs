use std::sync::{Mutex, MutexGuard};

use lanemark_core::{Catalog, LaneKey, LayoutEngine, YearScale, parse_catalog};
use lanemark_protocol::{Breakpoint, Entry};
use serde::Serialize;
use wasm_bindgen::prelude::*;

static CATALOGS: Mutex<Vec<Catalog>> = Mutex::new(Vec::new());

fn catalogs() -> Result<MutexGuard<'static, Vec<Catalog>>, JsError> {
    CATALOGS
        .lock()
        .map_err(|_| JsError::new("catalog registry poisoned"))
}

fn to_json(value: &impl Serialize) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

/// Lay out one lane with the default constants.
///
/// `entries_json` is an array of `{id, year, title, authors}`;
/// `breakpoints_json` an array of `{year, pos}`. Returns the lane layout as JSON.
#[wasm_bindgen]
pub fn compute_layout(entries_json: &str, breakpoints_json: &str) -> Result<String, JsError> {
    let entries: Vec<Entry> =
        serde_json::from_str(entries_json).map_err(|e| JsError::new(&e.to_string()))?;
    let breakpoints: Vec<Breakpoint> =
        serde_json::from_str(breakpoints_json).map_err(|e| JsError::new(&e.to_string()))?;
    let scale = YearScale::new(breakpoints).map_err(|e| JsError::new(&e.to_string()))?;

    to_json(&LayoutEngine::default().layout(&entries, &scale))
}

/// Parse a catalog from bytes (JSON). Returns a handle (index) for later use.
#[wasm_bindgen]
pub fn load_catalog(data: &[u8]) -> Result<usize, JsError> {
    let catalog = parse_catalog(data).map_err(|e| JsError::new(&e.to_string()))?;
    let mut catalogs = catalogs()?;
    let idx = catalogs.len();
    catalogs.push(catalog);
    Ok(idx)
}

/// Lane keys of a loaded catalog in display order, as a JSON array of `"Track::Sub"`.
#[wasm_bindgen]
pub fn lane_keys(handle: usize) -> Result<String, JsError> {
    let catalogs = catalogs()?;
    let catalog = catalogs
        .get(handle)
        .ok_or_else(|| JsError::new("invalid catalog handle"))?;
    let keys: Vec<String> = catalog.lane_keys().map(ToString::to_string).collect();
    to_json(&keys)
}

/// Layout for one lane of a loaded catalog, as JSON.
#[wasm_bindgen]
pub fn lane_layout(handle: usize, key: &str) -> Result<String, JsError> {
    let key = LaneKey::parse(key)
        .ok_or_else(|| JsError::new(&format!("malformed lane key: {key}")))?;
    let catalogs = catalogs()?;
    let catalog = catalogs
        .get(handle)
        .ok_or_else(|| JsError::new("invalid catalog handle"))?;
    let lane = catalog
        .lane(&key)
        .ok_or_else(|| JsError::new(&format!("unknown lane: {key}")))?;

    to_json(&LayoutEngine::default().layout(&lane.entries, &catalog.scale))
}

/// Full record behind an entry (titles, authors, venue, url), as JSON.
#[wasm_bindgen]
pub fn entry_detail(handle: usize, work_id: &str) -> Result<String, JsError> {
    let catalogs = catalogs()?;
    let catalog = catalogs
        .get(handle)
        .ok_or_else(|| JsError::new("invalid catalog handle"))?;
    let record = catalog
        .record(work_id)
        .ok_or_else(|| JsError::new(&format!("unknown entry: {work_id}")))?;
    to_json(record)
}

/// Year-axis breakpoints of a loaded catalog, as a JSON array of `{year, pos, label}`.
#[wasm_bindgen]
pub fn year_axis(handle: usize) -> Result<String, JsError> {
    let catalogs = catalogs()?;
    let catalog = catalogs
        .get(handle)
        .ok_or_else(|| JsError::new("invalid catalog handle"))?;
    to_json(&catalog.scale.breakpoints())
}
