use std::fmt;

use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;

use crate::network::vehicle::{BookingError, Vehicle, VehicleId};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PassengerId(String);

impl PassengerId {
    pub fn new(str: &str) -> Self {
        Self(str.to_owned())
    }
}

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize)]
pub struct Passenger {
    id: PassengerId,
    name: String,
    booked: Vec<VehicleId>,
}

impl Passenger {
    pub fn new(id: PassengerId, name: &str) -> Self {
        info!("[Passenger created] {name} ({id})");
        Self {
            id,
            name: name.to_owned(),
            booked: vec![],
        }
    }

    pub fn id(&self) -> &PassengerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vehicle ids in booking order.
    pub fn booked(&self) -> &[VehicleId] {
        &self.booked
    }

    pub fn book_ride(&mut self, vehicle: Option<&mut Vehicle>) -> Result<(), BookingError> {
        let Some(vehicle) = vehicle else {
            warn!("[Booking failed] {} has no vehicle to book", self.name);
            return Err(BookingError::NoVehicle);
        };

        match vehicle.add_passenger(self) {
            Ok(()) => {
                self.booked.push(vehicle.id().clone());
                info!("[Booked] {} booked {}", self.name, vehicle.id());
                Ok(())
            }
            Err(e) => {
                warn!("[Booking failed] {} could not book {}", self.name, vehicle.id());
                Err(e)
            }
        }
    }

    pub fn cancel_ride(&mut self, vehicle: Option<&mut Vehicle>) -> Result<(), BookingError> {
        let Some(vehicle) = vehicle else {
            warn!("[Cancel failed] {} has no vehicle to cancel", self.name);
            return Err(BookingError::NoVehicle);
        };

        if let Err(e) = vehicle.remove_passenger(self) {
            warn!("[Cancel failed] {e}");
            return Err(e);
        }

        if let Some(pos) = self.booked.iter().position(|v| v == vehicle.id()) {
            self.booked.remove(pos);
        }
        info!("[Cancelled] {} cancelled {}", self.name, vehicle.id());
        Ok(())
    }
}

impl fmt::Display for Passenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Passenger: {} (ID: {}) | Booked: ", self.name, self.id)?;
        let booked = self.booked();
        if booked.is_empty() {
            f.write_str("none")
        } else {
            write!(f, "{}", booked.iter().join(", "))
        }
    }
}
