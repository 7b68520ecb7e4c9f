//! Zone map screen: every city zone with its flow and weather readings,
//! bucketed for the marker legend.

use floodnet::models::ZoneReading;
use floodnet::{ApiError, Client};

use super::Screen;
use crate::render;

pub struct ZonesScreen;

impl Screen for ZonesScreen {
    type Data = Vec<ZoneReading>;

    fn title(&self) -> &'static str {
        "Flood Zones"
    }

    async fn fetch(&mut self, api: &Client) -> Result<Self::Data, ApiError> {
        api.zone_flow_weather().await
    }

    fn present(&self, data: &Self::Data) -> String {
        render::zones(data)
    }
}
