//! Sensor screen: recent water-level samples, newest first.

use floodnet::models::SensorReading;
use floodnet::{ApiError, Client};

use super::Screen;
use crate::render;

pub struct SensorsScreen;

impl Screen for SensorsScreen {
    type Data = Vec<SensorReading>;

    fn title(&self) -> &'static str {
        "Water Sensors"
    }

    async fn fetch(&mut self, api: &Client) -> Result<Self::Data, ApiError> {
        api.sensor_readings().await
    }

    fn present(&self, data: &Self::Data) -> String {
        render::sensors(data)
    }
}
