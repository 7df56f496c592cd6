use serde::{Deserialize, Serialize};

use crate::efficiency::ReprocessingEfficiency;
use crate::item::SalvageItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub salvage_items: Vec<SalvageItem>,
    pub reprocessing_efficiency: ReprocessingEfficiency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub materials: Vec<Material>,
    pub total_material_value: f64,
    pub buildable_items: Vec<BuildableItem>,
    pub reprocessing_efficiency_used: f64,
    #[serde(default)]
    pub unknown_items: Vec<UnknownItem>,
}

impl AnalysisResponse {
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty() && self.buildable_items.is_empty() && self.unknown_items.is_empty()
    }

    pub fn buildable_now(&self) -> impl Iterator<Item = &BuildableItem> {
        self.buildable_items.iter().filter(|item| item.can_build)
    }

    /// Highest estimated profit first; ties keep service order.
    pub fn by_profit(&self) -> Vec<&BuildableItem> {
        let mut items: Vec<&BuildableItem> = self.buildable_items.iter().collect();
        items.sort_by(|a, b| b.estimated_profit.total_cmp(&a.estimated_profit));
        items
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub type_id: i32,
    pub name: String,
    pub quantity: i64,
    /// `None` when the service has no market price for the material.
    #[serde(default)]
    pub unit_price: Option<f64>,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildableItem {
    pub product_type_id: i32,
    pub product_name: String,
    /// 0 to 100.
    pub match_percentage: f64,
    pub can_build: bool,
    pub estimated_profit: f64,
    /// Percent of product price.
    pub profit_margin: f64,
    pub product_price: f64,
    pub material_cost: f64,
    #[serde(default)]
    pub missing_materials: Vec<MissingMaterial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingMaterial {
    pub type_id: i32,
    pub name: String,
    pub needed: i64,
    pub available: i64,
    pub missing: i64,
    pub cost_to_buy: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownItem {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMarketPricesRequest {
    /// Empty asks the service to refresh every known type.
    pub type_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMarketPricesResponse {
    pub updated_count: usize,
    #[serde(default)]
    pub prices: Vec<MarketPriceOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPriceOutput {
    pub type_id: i32,
    pub sell_price: Option<f64>,
    pub buy_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub type_id: i32,
    pub region_id: i32,
    pub sell_price: Option<f64>,
    pub buy_price: Option<f64>,
    pub daily_volume: Option<i32>,
    pub updated_at: String,
}

/// Error body returned by the service on non-success responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServiceErrorBody {
    pub fn message(&self) -> Option<&str> {
        non_blank(&self.message).or_else(|| non_blank(&self.error))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
}
