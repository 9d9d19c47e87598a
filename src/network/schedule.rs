use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;

use crate::network::vehicle::VehicleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    Arrival,
    Departure,
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Padding is forwarded so station listings line up.
        f.pad(match self {
            Movement::Arrival => "Arrival",
            Movement::Departure => "Departure",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    vehicle: Option<VehicleId>,
    time: String,
    movement: Movement,
}

impl Schedule {
    pub fn new(vehicle: Option<VehicleId>, time: &str, movement: Movement) -> Self {
        Self {
            vehicle,
            time: time.to_owned(),
            movement,
        }
    }

    pub fn vehicle(&self) -> Option<&VehicleId> {
        self.vehicle.as_ref()
    }

    /// Raw time string as given; never validated.
    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn movement(&self) -> Movement {
        self.movement
    }

    pub fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M").ok()
    }
}
