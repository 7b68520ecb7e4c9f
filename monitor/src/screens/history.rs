//! Rainfall history screen: per-year monthly totals.

use floodnet::models::YearlyRainfall;
use floodnet::{ApiError, Client};

use super::Screen;
use crate::render;

pub struct HistoryScreen;

impl Screen for HistoryScreen {
    type Data = Vec<YearlyRainfall>;

    fn title(&self) -> &'static str {
        "Rainfall History"
    }

    async fn fetch(&mut self, api: &Client) -> Result<Self::Data, ApiError> {
        api.historical_rainfall().await
    }

    fn present(&self, data: &Self::Data) -> String {
        render::history(data)
    }
}
