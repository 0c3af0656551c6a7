#![cfg_attr(not(test), no_std)]
//! Payloads exchanged between the air-quality firmware and its consumers.
extern crate alloc;

use alloc::string::String;
use ccs811::Reading;
use serde::{Deserialize, Serialize};

/// Upper bound on an encoded [`AirQualityFrame`], both readings at `u16::MAX`.
pub const MAX_PAYLOAD_LEN: usize = 64;

/// Category label carried in every frame.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorType {
    #[serde(rename = "air_quality")]
    AirQuality,
}

/// One reading as delivered downstream, encoded as compact JSON:
/// `{"sensor_type":"air_quality","eCO2":300,"TVOC":80}`.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AirQualityFrame {
    pub sensor_type: SensorType,
    #[serde(rename = "eCO2")]
    pub eco2: u16,
    #[serde(rename = "TVOC")]
    pub tvoc: u16,
}

impl AirQualityFrame {
    pub const fn new(eco2: u16, tvoc: u16) -> Self {
        Self { sensor_type: SensorType::AirQuality, eco2, tvoc }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

impl From<Reading> for AirQualityFrame {
    fn from(reading: Reading) -> Self {
        Self::new(reading.eco2, reading.tvoc)
    }
}
