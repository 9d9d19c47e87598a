use std::{collections::BTreeMap, fmt, str::FromStr};

use anyhow::anyhow;
use log::{info, warn};
use serde::Serialize;

use crate::network::{
    schedule::{Movement, Schedule},
    vehicle::{Vehicle, VehicleId},
};

pub const MAX_SCHEDULES: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StationId(String);

impl StationId {
    pub fn new(str: &str) -> Self {
        Self(str.to_owned())
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    Bus,
    Train,
}

impl FromStr for StationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bus" => Ok(StationType::Bus),
            "train" => Ok(StationType::Train),
            _ => Err(anyhow!("Invalid station type: {s}")),
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StationType::Bus => "bus",
            StationType::Train => "train",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    LimitReached { station: StationId },
    NotFound { station: StationId, vehicle: VehicleId },
    UnknownStation(StationId),
    UnknownVehicle(VehicleId),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::LimitReached { station } => write!(
                f,
                "[Schedule limit reached] Station {station} cannot accept more schedules"
            ),
            ScheduleError::NotFound { station, vehicle } => {
                write!(f, "[Remove schedule] Vehicle {vehicle} not found at {station}")
            }
            ScheduleError::UnknownStation(id) => write!(f, "Unknown station {id}"),
            ScheduleError::UnknownVehicle(id) => write!(f, "Unknown vehicle {id}"),
        }
    }
}

impl std::error::Error for ScheduleError {}

#[derive(Debug, Serialize)]
pub struct Station {
    id: StationId,
    location: String,
    station_type: StationType,
    schedules: Vec<Schedule>,
}

impl Station {
    pub fn new(id: StationId, location: &str, station_type: StationType) -> Self {
        info!("[Station created] {id} ({station_type}) at {location}");
        Self {
            id,
            location: location.to_owned(),
            station_type,
            schedules: Vec::with_capacity(MAX_SCHEDULES),
        }
    }

    pub fn id(&self) -> &StationId {
        &self.id
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn station_type(&self) -> StationType {
        self.station_type
    }

    /// Schedules in insertion order.
    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Appends a schedule and points `vehicle` at this station, replacing any
    /// earlier assignment.
    pub fn add_schedule(
        &mut self,
        vehicle: Option<&mut Vehicle>,
        time: &str,
        movement: Movement,
    ) -> Result<(), ScheduleError> {
        if self.schedules().len() >= MAX_SCHEDULES {
            let e = ScheduleError::LimitReached {
                station: self.id.clone(),
            };
            warn!("{e}");
            return Err(e);
        }

        let vehicle_label = vehicle
            .as_ref()
            .map_or_else(|| "null".to_owned(), |v| v.id().to_string());

        let schedule = Schedule::new(vehicle.as_ref().map(|v| v.id().clone()), time, movement);
        if schedule.time_of_day().is_none() {
            warn!("Schedule time {time:?} at {} is not in HH:MM form", self.id);
        }
        self.schedules.push(schedule);

        if let Some(vehicle) = vehicle {
            vehicle.set_assigned_station(Some(self.id.clone()));
        }

        info!(
            "[Schedule added] {movement} | Vehicle: {vehicle_label} | Time: {time} at station {}",
            self.id
        );
        Ok(())
    }

    /// Removes the first schedule for `vehicle_id`. The vehicle keeps its
    /// assigned station.
    pub fn remove_schedule_by_vehicle_id(
        &mut self,
        vehicle_id: &VehicleId,
    ) -> Result<(), ScheduleError> {
        let Some(pos) = self
            .schedules
            .iter()
            .position(|s| s.vehicle() == Some(vehicle_id))
        else {
            let e = ScheduleError::NotFound {
                station: self.id.clone(),
                vehicle: vehicle_id.clone(),
            };
            warn!("{e}");
            return Err(e);
        };

        self.schedules.remove(pos);
        info!(
            "[Schedule removed] Vehicle {vehicle_id} removed from {}",
            self.id
        );
        Ok(())
    }

    /// Listing of the station with routes resolved through `vehicles`.
    pub fn display<'a>(&'a self, vehicles: &'a BTreeMap<VehicleId, Vehicle>) -> StationDisplay<'a> {
        StationDisplay {
            station: self,
            vehicles,
        }
    }
}

impl Drop for Station {
    fn drop(&mut self) {
        info!("[Station destroyed] {}", self.id);
    }
}

pub struct StationDisplay<'a> {
    station: &'a Station,
    vehicles: &'a BTreeMap<VehicleId, Vehicle>,
}

impl fmt::Display for StationDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let station = self.station;
        writeln!(
            f,
            "Station: {} | Location: {} | Type: {}",
            station.id(),
            station.location(),
            station.station_type()
        )?;

        let schedules = station.schedules();
        if schedules.is_empty() {
            return f.write_str("  No schedules.");
        }

        for (i, s) in schedules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }

            let vehicle = s.vehicle().map_or("null", VehicleId::as_str);
            let route = s
                .vehicle()
                .and_then(|id| self.vehicles.get(id))
                .map_or("N/A", Vehicle::route);

            write!(
                f,
                "  [{}] {:<9} | Vehicle: {} | Route: {} | Time: {}",
                i + 1,
                s.movement(),
                vehicle,
                route,
                s.time()
            )?;
        }
        Ok(())
    }
}
