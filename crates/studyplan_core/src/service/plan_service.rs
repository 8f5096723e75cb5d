//! Study plan use-case service.
//!
//! # Responsibility
//! - Run "generate" and "redistribute" through the distribution core.
//! - Provide the manual edit path (add/edit/delete/complete/move/swap/reorder),
//!   which writes `day_index` directly and never re-runs distribution.
//!
//! # Invariants
//! - Generate and redistribute save the distributed list verbatim.
//! - Manual day assignments stay inside `[0, total_days)`.
//! - Redistribute works over the stored list order, so a manual reorder
//!   changes its result.

use crate::distribute::{distribute, DistributeError};
use crate::model::item::{ItemId, ItemValidationError, StudyItem};
use crate::model::plan::PlanSettings;
use crate::repo::plan_repo::{PlanRepository, RepoError};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for plan use-cases.
#[derive(Debug)]
pub enum PlanServiceError {
    /// Distribution input rejected before allocation.
    Distribute(DistributeError),
    /// Caller-supplied item fails model validation.
    Validation(ItemValidationError),
    /// Same item id supplied more than once.
    DuplicateItem(ItemId),
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// Manual day assignment outside the plan.
    DayOutOfRange { day_index: u32, total_days: u32 },
    /// No plan settings have been saved yet.
    PlanNotConfigured,
    /// Reorder input is not a permutation of stored item ids.
    InvalidOrder(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for PlanServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Distribute(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateItem(id) => write!(f, "duplicate study item id: {id}"),
            Self::ItemNotFound(id) => write!(f, "study item not found: {id}"),
            Self::DayOutOfRange {
                day_index,
                total_days,
            } => write!(
                f,
                "day_index {day_index} is outside plan of {total_days} day(s)"
            ),
            Self::PlanNotConfigured => write!(f, "plan settings are not configured"),
            Self::InvalidOrder(details) => write!(f, "invalid item order: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlanServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Distribute(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DistributeError> for PlanServiceError {
    fn from(value: DistributeError) -> Self {
        Self::Distribute(value)
    }
}

impl From<ItemValidationError> for PlanServiceError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for PlanServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ItemNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type PlanServiceResult<T> = Result<T, PlanServiceError>;

/// Plan service facade over repository implementations.
pub struct PlanService<R: PlanRepository> {
    repo: R,
}

impl<R: PlanRepository> PlanService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns saved plan settings.
    pub fn settings(&self) -> PlanServiceResult<PlanSettings> {
        self.repo
            .load_settings()?
            .ok_or(PlanServiceError::PlanNotConfigured)
    }

    /// Returns the stored item list in list order.
    pub fn items(&self) -> PlanServiceResult<Vec<StudyItem>> {
        Ok(self.repo.load_items()?)
    }

    /// Distributes a fresh item list and stores it with `settings`.
    ///
    /// Settings and items are written in one transaction; on any error the
    /// stored plan is unchanged.
    ///
    /// # Errors
    /// - `Validation` or `DuplicateItem` for bad input items.
    /// - `Distribute` when `settings.total_days` is zero.
    /// - `Repo` when persistence fails.
    pub fn generate(
        &self,
        items: Vec<StudyItem>,
        settings: PlanSettings,
    ) -> PlanServiceResult<Vec<StudyItem>> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            item.validate()?;
            if !seen.insert(item.id) {
                return Err(PlanServiceError::DuplicateItem(item.id));
            }
        }

        let distributed = distribute(items, i64::from(settings.total_days))?;
        self.repo.save_plan(&settings, &distributed)?;

        info!(
            "event=plan_generate module=service status=ok items={} days={}",
            distributed.len(),
            settings.total_days
        );
        Ok(distributed)
    }

    /// Re-runs distribution over the stored list and saves the result.
    ///
    /// Completed items are redistributed like any other item.
    pub fn redistribute(&self) -> PlanServiceResult<Vec<StudyItem>> {
        let settings = self.settings()?;
        let items = self.repo.load_items()?;
        let distributed = distribute(items, i64::from(settings.total_days))?;
        self.repo.replace_items(&distributed)?;

        info!(
            "event=plan_redistribute module=service status=ok items={} days={}",
            distributed.len(),
            settings.total_days
        );
        Ok(distributed)
    }

    /// Saves new settings without touching item assignments.
    ///
    /// Items assigned past a shrunken `total_days` stay as-is until the next
    /// redistribute.
    pub fn update_settings(&self, settings: PlanSettings) -> PlanServiceResult<()> {
        self.repo.save_settings(&settings)?;
        let items = self.repo.load_items()?;
        let stranded = items
            .iter()
            .filter(|item| item.day_index.is_some_and(|day| !settings.contains_day(day)))
            .count();
        if stranded > 0 {
            warn!(
                "event=plan_settings_update module=service status=ok days={} stranded_items={}",
                settings.total_days, stranded
            );
        }
        Ok(())
    }

    /// Appends one item, optionally pinned to a day.
    pub fn add_item(
        &self,
        subject: impl Into<String>,
        topic: impl Into<String>,
        day_index: Option<u32>,
    ) -> PlanServiceResult<StudyItem> {
        if let Some(day) = day_index {
            self.ensure_day_in_plan(day)?;
        }
        let mut item = StudyItem::new(subject, topic);
        item.day_index = day_index;
        self.repo.insert_item(&item)?;
        Ok(item)
    }

    /// Replaces subject and topic of one item.
    pub fn edit_item(
        &self,
        id: ItemId,
        subject: impl Into<String>,
        topic: impl Into<String>,
    ) -> PlanServiceResult<StudyItem> {
        let mut item = self.require_item(id)?;
        item.subject = subject.into().trim().to_string();
        item.topic = topic.into();
        self.repo.update_item(&item)?;
        Ok(item)
    }

    pub fn delete_item(&self, id: ItemId) -> PlanServiceResult<()> {
        self.repo.delete_item(id)?;
        Ok(())
    }

    pub fn set_completed(&self, id: ItemId, completed: bool) -> PlanServiceResult<StudyItem> {
        let mut item = self.require_item(id)?;
        item.is_completed = completed;
        self.repo.update_item(&item)?;
        Ok(item)
    }

    /// Moves one item to `day_index`; list position is unchanged.
    pub fn move_item(&self, id: ItemId, day_index: u32) -> PlanServiceResult<StudyItem> {
        self.ensure_day_in_plan(day_index)?;
        let mut item = self.require_item(id)?;
        item.day_index = Some(day_index);
        self.repo.update_item(&item)?;
        Ok(item)
    }

    /// Exchanges day assignments and list positions of two items.
    pub fn swap_items(&self, first: ItemId, second: ItemId) -> PlanServiceResult<()> {
        self.repo.swap_items(first, second)?;
        Ok(())
    }

    /// Stores a new list order used by the next redistribute.
    ///
    /// `ids` must name every stored item exactly once.
    pub fn reorder(&self, ids: &[ItemId]) -> PlanServiceResult<()> {
        let stored = self
            .repo
            .load_items()?
            .into_iter()
            .map(|item| item.id)
            .collect::<HashSet<_>>();

        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(*id) {
                return Err(PlanServiceError::InvalidOrder(format!("duplicate id {id}")));
            }
            if !stored.contains(id) {
                return Err(PlanServiceError::ItemNotFound(*id));
            }
        }
        if seen.len() != stored.len() {
            return Err(PlanServiceError::InvalidOrder(format!(
                "expected {} ids, got {}",
                stored.len(),
                seen.len()
            )));
        }

        self.repo.set_order(ids)?;
        Ok(())
    }

    fn require_item(&self, id: ItemId) -> PlanServiceResult<StudyItem> {
        self.repo
            .get_item(id)?
            .ok_or(PlanServiceError::ItemNotFound(id))
    }

    fn ensure_day_in_plan(&self, day_index: u32) -> PlanServiceResult<()> {
        let settings = self.settings()?;
        if !settings.contains_day(day_index) {
            return Err(PlanServiceError::DayOutOfRange {
                day_index,
                total_days: settings.total_days,
            });
        }
        Ok(())
    }
}
