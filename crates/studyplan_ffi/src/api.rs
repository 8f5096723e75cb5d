//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the "generate", "redistribute" and manual-edit triggers to Dart.
//! - Keep error semantics simple: response envelopes, never panics.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Item ids cross the boundary as UTF-8 UUID strings, dates as `YYYY-MM-DD`.

use chrono::NaiveDate;
use studyplan_core::db::open_db;
use studyplan_core::{
    core_version as core_version_inner, distribute, init_logging as init_logging_inner,
    ping as ping_inner, ItemId, PlanService, PlanSettings, SqlitePlanRepository, StudyItem,
};
use log::warn;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const PLAN_DB_FILE_NAME: &str = "studyplan.sqlite3";
const DATE_FORMAT: &str = "%Y-%m-%d";
static PLAN_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
/// Repeating the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Study item as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItemDto {
    /// Stable item id; empty for items the UI has not saved yet.
    pub id: String,
    pub subject: String,
    pub topic: String,
    /// Zero-based plan day, `None` when unassigned.
    pub day_index: Option<u32>,
    pub is_completed: bool,
    pub color: Option<String>,
}

/// Response envelope for plan-wide calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Items in day-ascending order after generate/redistribute, stored list
    /// order otherwise. Empty on failure.
    pub items: Vec<PlanItemDto>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl PlanResponse {
    fn success(message: impl Into<String>, items: Vec<StudyItem>) -> Self {
        Self {
            ok: true,
            items: items.into_iter().map(to_dto).collect(),
            message: message.into(),
        }
    }

    fn failure(op: &str, err: impl Display) -> Self {
        warn!("event=ffi_call module=ffi status=error op={op} error={err}");
        Self {
            ok: false,
            items: Vec::new(),
            message: format!("{op} failed: {err}"),
        }
    }
}

/// Response envelope for single-item edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemActionResponse {
    pub ok: bool,
    /// Affected item after the edit, when it still exists.
    pub item: Option<PlanItemDto>,
    pub message: String,
}

impl ItemActionResponse {
    fn success(message: impl Into<String>, item: Option<StudyItem>) -> Self {
        Self {
            ok: true,
            item: item.map(to_dto),
            message: message.into(),
        }
    }

    fn failure(op: &str, err: impl Display) -> Self {
        warn!("event=ffi_call module=ffi status=error op={op} error={err}");
        Self {
            ok: false,
            item: None,
            message: format!("{op} failed: {err}"),
        }
    }
}

/// Distributes items in memory without touching storage.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_preview(items: Vec<PlanItemDto>, total_days: i64) -> PlanResponse {
    let result = from_dtos(items)
        .and_then(|items| distribute(items, total_days).map_err(|err| err.to_string()));
    match result {
        Ok(items) => PlanResponse::success(format!("Previewed {} item(s).", items.len()), items),
        Err(err) => PlanResponse::failure("plan_preview", err),
    }
}

/// Generates a fresh plan from `items` and stores it.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_generate(items: Vec<PlanItemDto>, total_days: i64, start_date: String) -> PlanResponse {
    let result = parse_settings(total_days, &start_date).and_then(|settings| {
        let items = from_dtos(items)?;
        with_plan_service(|service| service.generate(items, settings))
    });
    match result {
        Ok(items) => PlanResponse::success(format!("Planned {} item(s).", items.len()), items),
        Err(err) => PlanResponse::failure("plan_generate", err),
    }
}

/// Rebalances the stored plan over its stored day count.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_redistribute() -> PlanResponse {
    match with_plan_service(|service| service.redistribute()) {
        Ok(items) => {
            PlanResponse::success(format!("Redistributed {} item(s).", items.len()), items)
        }
        Err(err) => PlanResponse::failure("plan_redistribute", err),
    }
}

/// Loads the stored plan in list order.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_load() -> PlanResponse {
    match with_plan_service(|service| service.items()) {
        Ok(items) => PlanResponse::success(format!("Loaded {} item(s).", items.len()), items),
        Err(err) => PlanResponse::failure("plan_load", err),
    }
}

/// Appends one item; `day_index = None` leaves it unassigned.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_add_item(subject: String, topic: String, day_index: Option<u32>) -> ItemActionResponse {
    match with_plan_service(|service| service.add_item(subject, topic, day_index)) {
        Ok(item) => ItemActionResponse::success("Item added.", Some(item)),
        Err(err) => ItemActionResponse::failure("plan_add_item", err),
    }
}

/// Replaces subject and topic of one item.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_edit_item(id: String, subject: String, topic: String) -> ItemActionResponse {
    let result = parse_item_id(&id)
        .and_then(|id| with_plan_service(|service| service.edit_item(id, subject, topic)));
    match result {
        Ok(item) => ItemActionResponse::success("Item updated.", Some(item)),
        Err(err) => ItemActionResponse::failure("plan_edit_item", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn plan_delete_item(id: String) -> ItemActionResponse {
    let result = parse_item_id(&id).and_then(|id| with_plan_service(|service| service.delete_item(id)));
    match result {
        Ok(()) => ItemActionResponse::success("Item deleted.", None),
        Err(err) => ItemActionResponse::failure("plan_delete_item", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn plan_set_completed(id: String, completed: bool) -> ItemActionResponse {
    let result = parse_item_id(&id)
        .and_then(|id| with_plan_service(|service| service.set_completed(id, completed)));
    match result {
        Ok(item) => ItemActionResponse::success("Item updated.", Some(item)),
        Err(err) => ItemActionResponse::failure("plan_set_completed", err),
    }
}

/// Moves one item to another day without re-running distribution.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_move_item(id: String, day_index: u32) -> ItemActionResponse {
    let result = parse_item_id(&id)
        .and_then(|id| with_plan_service(|service| service.move_item(id, day_index)));
    match result {
        Ok(item) => ItemActionResponse::success("Item moved.", Some(item)),
        Err(err) => ItemActionResponse::failure("plan_move_item", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn plan_swap_items(first_id: String, second_id: String) -> ItemActionResponse {
    let result = parse_item_id(&first_id).and_then(|first| {
        let second = parse_item_id(&second_id)?;
        with_plan_service(|service| service.swap_items(first, second))
    });
    match result {
        Ok(()) => ItemActionResponse::success("Items swapped.", None),
        Err(err) => ItemActionResponse::failure("plan_swap_items", err),
    }
}

/// Stores a new list order; takes effect on the next redistribute.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_reorder(ids: Vec<String>) -> PlanResponse {
    let result = ids
        .iter()
        .map(|id| parse_item_id(id))
        .collect::<Result<Vec<_>, _>>()
        .and_then(|ids| {
            with_plan_service(|service| {
                service.reorder(&ids)?;
                service.items()
            })
        });
    match result {
        Ok(items) => PlanResponse::success("Order saved.", items),
        Err(err) => PlanResponse::failure("plan_reorder", err),
    }
}

/// Calendar date (`YYYY-MM-DD`) of `day_index`, or empty string on bad input.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_date_for_day(start_date: String, day_index: u32) -> String {
    NaiveDate::parse_from_str(start_date.trim(), DATE_FORMAT)
        .ok()
        .and_then(|start| studyplan_core::date_for_day(start, day_index))
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_settings(total_days: i64, start_date: &str) -> Result<PlanSettings, String> {
    let total_days = u32::try_from(total_days)
        .ok()
        .filter(|days| *days > 0)
        .ok_or_else(|| format!("total_days must be positive, got {total_days}"))?;
    let start_date = NaiveDate::parse_from_str(start_date.trim(), DATE_FORMAT)
        .map_err(|err| format!("invalid start_date `{start_date}`: {err}"))?;
    Ok(PlanSettings::new(total_days, start_date))
}

fn parse_item_id(raw: &str) -> Result<ItemId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid item id `{raw}`"))
}

fn from_dtos(items: Vec<PlanItemDto>) -> Result<Vec<StudyItem>, String> {
    items
        .into_iter()
        .map(|dto| {
            let mut item = if dto.id.trim().is_empty() {
                let item = StudyItem::new(dto.subject, dto.topic);
                item.validate().map_err(|err| err.to_string())?;
                item
            } else {
                StudyItem::with_id(parse_item_id(&dto.id)?, dto.subject, dto.topic)
                    .map_err(|err| err.to_string())?
            };
            item.day_index = dto.day_index;
            item.is_completed = dto.is_completed;
            item.color = dto.color;
            Ok(item)
        })
        .collect()
}

fn to_dto(item: StudyItem) -> PlanItemDto {
    PlanItemDto {
        id: item.id.to_string(),
        subject: item.subject,
        topic: item.topic,
        day_index: item.day_index,
        is_completed: item.is_completed,
        color: item.color,
    }
}

fn resolve_plan_db_path() -> PathBuf {
    PLAN_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("STUDYPLAN_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PLAN_DB_FILE_NAME)
        })
        .clone()
}

fn with_plan_service<T, E: Display>(
    f: impl FnOnce(&PlanService<SqlitePlanRepository<'_>>) -> Result<T, E>,
) -> Result<T, String> {
    let db_path = resolve_plan_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("plan DB open failed: {err}"))?;
    let service = PlanService::new(SqlitePlanRepository::new(&conn));
    f(&service).map_err(|err| err.to_string())
}
