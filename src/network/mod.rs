pub mod passenger;
pub mod schedule;
pub mod station;
pub mod vehicle;

#[cfg(test)]
pub(crate) mod test_log;

use std::collections::BTreeMap;

use anyhow::{bail, Context};
use log::{debug, warn};
use serde::Serialize;

use crate::network::{
    passenger::{Passenger, PassengerId},
    schedule::Movement,
    station::{ScheduleError, Station, StationDisplay, StationId},
    vehicle::{BookingError, Vehicle, VehicleId},
};

fn registry_miss(e: ScheduleError) -> ScheduleError {
    warn!("{e}");
    e
}

/// Owns every entity of the demo. Entities refer to each other by id only.
#[derive(Debug, Default, Serialize)]
pub struct Network {
    pub stations: BTreeMap<StationId, Station>,
    pub vehicles: BTreeMap<VehicleId, Vehicle>,
    pub passengers: BTreeMap<PassengerId, Passenger>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_station(&mut self, station: Station) -> anyhow::Result<StationId> {
        let id = station.id().clone();
        if self.stations.contains_key(&id) {
            bail!("Station {id} already exists");
        }
        self.stations.insert(id.clone(), station);
        Ok(id)
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> anyhow::Result<VehicleId> {
        let id = vehicle.id().clone();
        if self.vehicles.contains_key(&id) {
            bail!("Vehicle {id} already exists");
        }
        self.vehicles.insert(id.clone(), vehicle);
        Ok(id)
    }

    pub fn add_passenger(&mut self, passenger: Passenger) -> anyhow::Result<PassengerId> {
        let id = passenger.id().clone();
        if self.passengers.contains_key(&id) {
            bail!("Passenger {id} already exists");
        }
        self.passengers.insert(id.clone(), passenger);
        Ok(id)
    }

    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn vehicle(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn passenger(&self, id: &PassengerId) -> Option<&Passenger> {
        self.passengers.get(id)
    }

    pub fn book_ride(
        &mut self,
        passenger_id: &PassengerId,
        vehicle_id: &VehicleId,
    ) -> Result<(), BookingError> {
        let Some(passenger) = self.passengers.get_mut(passenger_id) else {
            warn!("Unknown passenger {passenger_id}");
            return Err(BookingError::UnknownPassenger(passenger_id.clone()));
        };
        let vehicle = self.vehicles.get_mut(vehicle_id);
        if vehicle.is_none() {
            debug!("Vehicle {vehicle_id} is not registered");
        }

        passenger.book_ride(vehicle)
    }

    pub fn cancel_ride(
        &mut self,
        passenger_id: &PassengerId,
        vehicle_id: &VehicleId,
    ) -> Result<(), BookingError> {
        let Some(passenger) = self.passengers.get_mut(passenger_id) else {
            warn!("Unknown passenger {passenger_id}");
            return Err(BookingError::UnknownPassenger(passenger_id.clone()));
        };
        let vehicle = self.vehicles.get_mut(vehicle_id);
        if vehicle.is_none() {
            debug!("Vehicle {vehicle_id} is not registered");
        }

        passenger.cancel_ride(vehicle)
    }

    /// Schedules `vehicle_id` (or no vehicle) at `station_id`.
    pub fn add_schedule(
        &mut self,
        station_id: &StationId,
        vehicle_id: Option<&VehicleId>,
        time: &str,
        movement: Movement,
    ) -> Result<(), ScheduleError> {
        let Some(station) = self.stations.get_mut(station_id) else {
            return Err(registry_miss(ScheduleError::UnknownStation(station_id.clone())));
        };

        let vehicle = match vehicle_id {
            Some(id) => match self.vehicles.get_mut(id) {
                Some(vehicle) => Some(vehicle),
                None => return Err(registry_miss(ScheduleError::UnknownVehicle(id.clone()))),
            },
            None => None,
        };

        station.add_schedule(vehicle, time, movement)
    }

    pub fn remove_schedule(
        &mut self,
        station_id: &StationId,
        vehicle_id: &VehicleId,
    ) -> Result<(), ScheduleError> {
        match self.stations.get_mut(station_id) {
            Some(station) => station.remove_schedule_by_vehicle_id(vehicle_id),
            None => Err(registry_miss(ScheduleError::UnknownStation(station_id.clone()))),
        }
    }

    pub fn station_info(&self, id: &StationId) -> Option<StationDisplay<'_>> {
        self.station(id).map(|s| s.display(&self.vehicles))
    }

    pub fn snapshot_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize network")
    }
}
