pub mod common_salvage;
mod error;
mod planner;
mod types;

pub use error::{CoreError, CoreErrorCode};
pub use planner::{AnalysisStatus, EMPTY_LIST_MESSAGE, PlannerState};
pub use types::{
    AnalysisRequest, AnalysisResponse, BuildableItem, MarketPrice, MarketPriceOutput, Material,
    MissingMaterial, ServiceErrorBody, UnknownItem, UpdateMarketPricesRequest,
    UpdateMarketPricesResponse,
};
