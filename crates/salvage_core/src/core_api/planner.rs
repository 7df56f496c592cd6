use crate::efficiency::ReprocessingEfficiency;
use crate::item::SalvageItem;
use crate::list::SalvageList;
use crate::paste::{SUPPORTED_FORMATS_HELP, parse_inventory_text};

use super::error::{CoreError, CoreErrorCode};
use super::types::{AnalysisRequest, AnalysisResponse};

pub const EMPTY_LIST_MESSAGE: &str = "Please add at least one salvage item";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Pending,
    Ready(Box<AnalysisResponse>),
    Failed(String),
}

/// Everything a front end needs to drive one planning session: the queued
/// items, the chosen efficiency and the outcome of the latest analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerState {
    items: SalvageList,
    efficiency: ReprocessingEfficiency,
    status: AnalysisStatus,
}

impl PlannerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &SalvageList {
        &self.items
    }

    pub fn efficiency(&self) -> ReprocessingEfficiency {
        self.efficiency
    }

    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    pub fn add_item(&mut self, item: SalvageItem) {
        self.items = self.items.with_item(item);
    }

    pub fn add_items(&mut self, items: Vec<SalvageItem>) {
        self.items = self.items.with_items(items);
    }

    /// Parses `text` and appends whatever was recognised. Returns how many
    /// entries were added; finding nothing is reported as an error so the
    /// caller can show the accepted layouts.
    pub fn add_pasted(&mut self, text: &str) -> Result<usize, CoreError> {
        let parsed = parse_inventory_text(text);
        if parsed.is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::NothingParsed,
                SUPPORTED_FORMATS_HELP,
            ));
        }
        let count = parsed.len();
        self.add_items(parsed);
        Ok(count)
    }

    pub fn remove_item(&mut self, index: usize) {
        self.items = self.items.without(index);
    }

    /// Empties the list and forgets the last result or error.
    pub fn clear(&mut self) {
        self.items = self.items.cleared();
        self.status = AnalysisStatus::Idle;
    }

    pub fn set_efficiency(&mut self, efficiency: ReprocessingEfficiency) {
        self.efficiency = efficiency;
    }

    /// Snapshots the request to send and marks the analysis as pending.
    /// Any earlier result is superseded.
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, CoreError> {
        if self.items.is_empty() {
            self.status = AnalysisStatus::Failed(EMPTY_LIST_MESSAGE.to_string());
            return Err(CoreError::new(
                CoreErrorCode::EmptyItemList,
                EMPTY_LIST_MESSAGE,
            ));
        }

        self.status = AnalysisStatus::Pending;
        Ok(AnalysisRequest {
            salvage_items: self.items.items().to_vec(),
            reprocessing_efficiency: self.efficiency,
        })
    }

    pub fn finish_analysis(&mut self, outcome: Result<AnalysisResponse, String>) {
        self.status = match outcome {
            Ok(response) => AnalysisStatus::Ready(Box::new(response)),
            Err(message) => AnalysisStatus::Failed(message),
        };
    }

    pub fn result(&self) -> Option<&AnalysisResponse> {
        match &self.status {
            AnalysisStatus::Ready(response) => Some(response),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            AnalysisStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, AnalysisStatus::Pending)
    }
}
