//! Study plan repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the ordered study item list and plan settings.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `load_items` returns items in stored list order (`position ASC`).

use crate::db::DbError;
use crate::model::item::{ItemId, ItemValidationError, StudyItem};
use crate::model::plan::{PlanSettings, PlanValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    uuid,
    subject,
    topic,
    day_index,
    is_completed,
    color
FROM study_items";

const START_DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for plan persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    InvalidSettings(PlanValidationError),
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidSettings(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "study item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted plan data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidSettings(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PlanValidationError> for RepoError {
    fn from(value: PlanValidationError) -> Self {
        Self::InvalidSettings(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the persisted study plan.
pub trait PlanRepository {
    fn load_items(&self) -> RepoResult<Vec<StudyItem>>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<StudyItem>>;
    /// Replaces the whole item list; positions follow slice order.
    fn replace_items(&self, items: &[StudyItem]) -> RepoResult<()>;
    /// Saves settings and replaces the item list in one transaction.
    fn save_plan(&self, settings: &PlanSettings, items: &[StudyItem]) -> RepoResult<()>;
    /// Appends one item at the end of the list.
    fn insert_item(&self, item: &StudyItem) -> RepoResult<ItemId>;
    /// Updates item fields in place; list position is unchanged.
    fn update_item(&self, item: &StudyItem) -> RepoResult<()>;
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
    /// Rewrites list positions so `ids` become the stored order.
    fn set_order(&self, ids: &[ItemId]) -> RepoResult<()>;
    fn load_settings(&self) -> RepoResult<Option<PlanSettings>>;
    fn save_settings(&self, settings: &PlanSettings) -> RepoResult<()>;
    /// Exchanges day assignment and list position of two items atomically.
    fn swap_items(&self, first: ItemId, second: ItemId) -> RepoResult<()>;
}

/// SQLite-backed plan repository.
pub struct SqlitePlanRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlanRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PlanRepository for SqlitePlanRepository<'_> {
    fn load_items(&self) -> RepoResult<Vec<StudyItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY position ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<StudyItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn replace_items(&self, items: &[StudyItem]) -> RepoResult<()> {
        for item in items {
            item.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        write_items(&tx, items)?;
        tx.commit()?;

        Ok(())
    }

    fn save_plan(&self, settings: &PlanSettings, items: &[StudyItem]) -> RepoResult<()> {
        settings.validate()?;
        for item in items {
            item.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        write_settings(&tx, settings)?;
        write_items(&tx, items)?;
        tx.commit()?;

        Ok(())
    }

    fn insert_item(&self, item: &StudyItem) -> RepoResult<ItemId> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO study_items (
                uuid,
                position,
                subject,
                topic,
                day_index,
                is_completed,
                color
            ) VALUES (
                ?1,
                (SELECT COALESCE(MAX(position), -1) + 1 FROM study_items),
                ?2, ?3, ?4, ?5, ?6
            );",
            params![
                item.id.to_string(),
                item.subject.as_str(),
                item.topic.as_str(),
                item.day_index,
                bool_to_int(item.is_completed),
                item.color.as_deref(),
            ],
        )?;

        Ok(item.id)
    }

    fn update_item(&self, item: &StudyItem) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE study_items
             SET
                subject = ?1,
                topic = ?2,
                day_index = ?3,
                is_completed = ?4,
                color = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                item.subject.as_str(),
                item.topic.as_str(),
                item.day_index,
                bool_to_int(item.is_completed),
                item.color.as_deref(),
                item.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }

        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM study_items WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_order(&self, ids: &[ItemId]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "UPDATE study_items
                 SET position = ?1, updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?2;",
            )?;
            for (position, id) in ids.iter().enumerate() {
                if stmt.execute(params![position as i64, id.to_string()])? == 0 {
                    return Err(RepoError::NotFound(*id));
                }
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn load_settings(&self) -> RepoResult<Option<PlanSettings>> {
        let row = self
            .conn
            .query_row(
                "SELECT total_days, start_date FROM plan_settings WHERE id = 1;",
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((total_days, start_date)) = row else {
            return Ok(None);
        };

        let total_days = u32::try_from(total_days).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid total_days `{total_days}` in plan_settings.total_days"
            ))
        })?;
        let start_date = NaiveDate::parse_from_str(&start_date, START_DATE_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid start_date `{start_date}` in plan_settings.start_date"
            ))
        })?;

        let settings = PlanSettings::new(total_days, start_date);
        settings.validate()?;
        Ok(Some(settings))
    }

    fn save_settings(&self, settings: &PlanSettings) -> RepoResult<()> {
        settings.validate()?;
        write_settings(self.conn, settings)
    }

    fn swap_items(&self, first: ItemId, second: ItemId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let (first_day, first_position) = load_placement(&tx, first)?;
        let (second_day, second_position) = load_placement(&tx, second)?;
        {
            let mut stmt = tx.prepare(
                "UPDATE study_items
                 SET
                    day_index = ?1,
                    position = ?2,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?3;",
            )?;
            stmt.execute(params![second_day, second_position, first.to_string()])?;
            stmt.execute(params![first_day, first_position, second.to_string()])?;
        }
        tx.commit()?;

        Ok(())
    }
}

/// Rewrites the whole item list inside the caller's transaction.
fn write_items(conn: &Connection, items: &[StudyItem]) -> RepoResult<()> {
    conn.execute("DELETE FROM study_items;", [])?;
    let mut stmt = conn.prepare(
        "INSERT INTO study_items (
            uuid,
            position,
            subject,
            topic,
            day_index,
            is_completed,
            color
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
    )?;
    for (position, item) in items.iter().enumerate() {
        stmt.execute(params![
            item.id.to_string(),
            position as i64,
            item.subject.as_str(),
            item.topic.as_str(),
            item.day_index,
            bool_to_int(item.is_completed),
            item.color.as_deref(),
        ])?;
    }
    Ok(())
}

fn write_settings(conn: &Connection, settings: &PlanSettings) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO plan_settings (id, total_days, start_date)
         VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET
            total_days = excluded.total_days,
            start_date = excluded.start_date,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![
            settings.total_days,
            settings.start_date.format(START_DATE_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

/// Raw `(day_index, position)` of one item.
fn load_placement(conn: &Connection, id: ItemId) -> RepoResult<(Option<i64>, i64)> {
    conn.query_row(
        "SELECT day_index, position FROM study_items WHERE uuid = ?1;",
        [id.to_string()],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()?
    .ok_or(RepoError::NotFound(id))
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<StudyItem> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{uuid_text}` in study_items.uuid"
        ))
    })?;

    let day_index = match row.get::<_, Option<i64>>("day_index")? {
        Some(value) => Some(u32::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid day_index `{value}` in study_items.day_index"
            ))
        })?),
        None => None,
    };

    let is_completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_completed value `{other}` in study_items.is_completed"
            )));
        }
    };

    let item = StudyItem {
        id,
        subject: row.get("subject")?,
        topic: row.get("topic")?,
        day_index,
        is_completed,
        color: row.get("color")?,
    };
    item.validate()?;
    Ok(item)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
