use std::fmt;

use log::{info, warn};
use serde::Serialize;

use crate::network::{
    passenger::{Passenger, PassengerId},
    station::StationId,
};

/// Express services skip stops and cover the same distance in 80% of the time.
const EXPRESS_TIME_FACTOR: f64 = 0.8;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn new(str: &str) -> Self {
        Self(str.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Standard,
    Express { stops: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    NoVehicle,
    UnknownPassenger(PassengerId),
    VehicleFull { vehicle: VehicleId, passenger: String },
    AlreadyBooked { vehicle: VehicleId, passenger: String },
    NotBooked { vehicle: VehicleId, passenger: String },
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::NoVehicle => write!(f, "No vehicle to book"),
            BookingError::UnknownPassenger(id) => write!(f, "Unknown passenger {id}"),
            BookingError::VehicleFull { vehicle, passenger } => {
                write!(f, "[Vehicle full] {vehicle} cannot accept passenger {passenger}")
            }
            BookingError::AlreadyBooked { vehicle, passenger } => {
                write!(f, "[Already booked] {passenger} already on {vehicle}")
            }
            BookingError::NotBooked { vehicle, passenger } => {
                write!(f, "{passenger} not on {vehicle}")
            }
        }
    }
}

impl std::error::Error for BookingError {}

#[derive(Debug, Serialize)]
pub struct Vehicle {
    id: VehicleId,
    route: String,
    capacity: usize,
    /// km/h
    speed: f64,
    on_time: bool,
    kind: VehicleKind,
    passengers: Vec<PassengerId>,
    assigned_station: Option<StationId>,
}

impl Vehicle {
    pub fn new(id: VehicleId, route: &str, capacity: usize, speed: f64, kind: VehicleKind) -> Self {
        info!("[Vehicle created] {id} | route: {route} | capacity: {capacity}");
        if let VehicleKind::Express { stops } = kind {
            info!("[Express vehicle created] {id} | stops: {stops}");
        }

        Self {
            id,
            route: route.to_owned(),
            capacity,
            speed,
            on_time: true,
            kind,
            passengers: vec![],
            assigned_station: None,
        }
    }

    pub fn standard(id: VehicleId, route: &str, capacity: usize, speed: f64) -> Self {
        Self::new(id, route, capacity, speed, VehicleKind::Standard)
    }

    pub fn express(id: VehicleId, route: &str, capacity: usize, speed: f64, stops: u32) -> Self {
        Self::new(id, route, capacity, speed, VehicleKind::Express { stops })
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// km/h
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_on_time(&self) -> bool {
        self.on_time
    }

    pub fn set_status(&mut self, on_time: bool) {
        self.on_time = on_time;
    }

    pub fn passengers(&self) -> &[PassengerId] {
        &self.passengers
    }

    pub fn booked_count(&self) -> usize {
        self.passengers().len()
    }

    pub fn assigned_station(&self) -> Option<&StationId> {
        self.assigned_station.as_ref()
    }

    pub fn set_assigned_station(&mut self, station: Option<StationId>) {
        self.assigned_station = station;
    }

    pub fn add_passenger(&mut self, passenger: &Passenger) -> Result<(), BookingError> {
        let result = if self.booked_count() >= self.capacity() {
            Err(BookingError::VehicleFull {
                vehicle: self.id.clone(),
                passenger: passenger.name().to_owned(),
            })
        } else if self.passengers.contains(passenger.id()) {
            Err(BookingError::AlreadyBooked {
                vehicle: self.id.clone(),
                passenger: passenger.name().to_owned(),
            })
        } else {
            self.passengers.push(passenger.id().clone());
            Ok(())
        };

        if let Err(e) = &result {
            warn!("{e}");
        }
        result
    }

    pub fn remove_passenger(&mut self, passenger: &Passenger) -> Result<(), BookingError> {
        let pos = self
            .passengers
            .iter()
            .position(|p| p == passenger.id())
            .ok_or_else(|| BookingError::NotBooked {
                vehicle: self.id.clone(),
                passenger: passenger.name().to_owned(),
            })?;

        self.passengers.remove(pos);
        Ok(())
    }

    /// Hours needed to cover `distance_km`, or `None` when the speed is not positive.
    pub fn travel_time(&self, distance_km: f64) -> Option<f64> {
        let base = self.base_travel_time(distance_km)?;
        match self.kind {
            VehicleKind::Standard => Some(base),
            VehicleKind::Express { .. } => Some(base * EXPRESS_TIME_FACTOR),
        }
    }

    fn base_travel_time(&self, distance_km: f64) -> Option<f64> {
        let speed = self.speed();
        (speed > 0.0).then(|| distance_km / speed)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let VehicleKind::Express { .. } = self.kind {
            f.write_str("Express ")?;
        }

        write!(
            f,
            "Vehicle ID: {} | Route: {} | Capacity: {} | Booked: {} | Speed: {} km/h | Status: {}",
            self.id(),
            self.route(),
            self.capacity(),
            self.booked_count(),
            self.speed(),
            if self.is_on_time() { "On-time" } else { "Delayed" }
        )?;

        if let VehicleKind::Express { stops } = self.kind {
            write!(f, "\n   (stops: {stops})")?;
        }
        Ok(())
    }
}

impl Drop for Vehicle {
    fn drop(&mut self) {
        if let VehicleKind::Express { .. } = self.kind {
            info!("[Express vehicle destroyed] {}", self.id);
        }
        info!("[Vehicle destroyed] {}", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passenger(id: &str, name: &str) -> Passenger {
        Passenger::new(PassengerId::new(id), name)
    }

    #[test]
    fn test_booking_beyond_capacity_fails() {
        let mut bus = Vehicle::standard(VehicleId::new("BUS1"), "A->B", 2, 45.0);
        let alice = passenger("P1", "Alice");
        let bob = passenger("P2", "Bob");
        let carol = passenger("P3", "Carol");

        assert!(bus.add_passenger(&alice).is_ok());
        assert!(bus.add_passenger(&bob).is_ok());
        assert_eq!(
            bus.add_passenger(&carol),
            Err(BookingError::VehicleFull {
                vehicle: VehicleId::new("BUS1"),
                passenger: "Carol".to_owned(),
            })
        );
        assert_eq!(bus.booked_count(), 2);
    }

    #[test]
    fn test_duplicate_booking_fails() {
        let mut bus = Vehicle::standard(VehicleId::new("BUS1"), "A->B", 3, 45.0);
        let alice = passenger("P1", "Alice");

        assert!(bus.add_passenger(&alice).is_ok());
        assert!(matches!(
            bus.add_passenger(&alice),
            Err(BookingError::AlreadyBooked { .. })
        ));
        assert_eq!(bus.booked_count(), 1);
    }

    #[test]
    fn test_full_vehicle_reports_full_before_duplicate() {
        let mut bus = Vehicle::standard(VehicleId::new("BUS1"), "A->B", 1, 45.0);
        let alice = passenger("P1", "Alice");

        assert!(bus.add_passenger(&alice).is_ok());
        assert!(matches!(
            bus.add_passenger(&alice),
            Err(BookingError::VehicleFull { .. })
        ));
    }

    #[test]
    fn test_remove_unbooked_passenger_fails() {
        let mut bus = Vehicle::standard(VehicleId::new("BUS1"), "A->B", 2, 45.0);
        let alice = passenger("P1", "Alice");
        let bob = passenger("P2", "Bob");
        bus.add_passenger(&alice).unwrap();

        assert!(matches!(
            bus.remove_passenger(&bob),
            Err(BookingError::NotBooked { .. })
        ));
        assert_eq!(bus.passengers(), &[PassengerId::new("P1")]);
    }

    #[test]
    fn test_cancel_frees_exactly_one_seat() {
        let mut bus = Vehicle::standard(VehicleId::new("BUS1"), "A->B", 2, 45.0);
        let alice = passenger("P1", "Alice");
        let bob = passenger("P2", "Bob");
        let carol = passenger("P3", "Carol");
        let dave = passenger("P4", "Dave");
        bus.add_passenger(&alice).unwrap();
        bus.add_passenger(&bob).unwrap();

        bus.remove_passenger(&bob).unwrap();
        assert!(bus.add_passenger(&carol).is_ok());
        assert!(bus.add_passenger(&dave).is_err());
        assert_eq!(
            bus.passengers(),
            &[PassengerId::new("P1"), PassengerId::new("P3")]
        );
    }

    #[test]
    fn test_travel_time() {
        let bus = Vehicle::standard(VehicleId::new("BUS1"), "A->B", 2, 45.0);
        assert_eq!(bus.travel_time(90.0), Some(2.0));
        assert_eq!(bus.travel_time(0.0), Some(0.0));
    }

    #[test]
    fn test_express_travel_time_is_scaled() {
        let bus = Vehicle::standard(VehicleId::new("BUS1"), "A->B", 2, 80.0);
        let express = Vehicle::express(VehicleId::new("EXP1"), "A->B", 2, 80.0, 3);

        let standard_time = bus.travel_time(120.0);
        assert_eq!(standard_time, Some(1.5));
        assert_eq!(express.travel_time(120.0), standard_time.map(|t| t * 0.8));
    }

    #[test]
    fn test_travel_time_undefined_for_non_positive_speed() {
        let stopped = Vehicle::standard(VehicleId::new("BUS1"), "A->B", 2, 0.0);
        let reversing = Vehicle::standard(VehicleId::new("BUS2"), "A->B", 2, -10.0);
        let express = Vehicle::express(VehicleId::new("EXP1"), "A->B", 2, 0.0, 3);

        assert_eq!(stopped.travel_time(100.0), None);
        assert_eq!(reversing.travel_time(100.0), None);
        assert_eq!(express.travel_time(100.0), None);
    }

    #[test]
    fn test_display_standard() {
        let mut bus = Vehicle::standard(VehicleId::new("BUS101"), "A->B", 2, 45.0);
        assert_eq!(
            bus.to_string(),
            "Vehicle ID: BUS101 | Route: A->B | Capacity: 2 | Booked: 0 | Speed: 45 km/h | Status: On-time"
        );

        bus.set_status(false);
        assert!(bus.to_string().ends_with("Status: Delayed"));
    }

    #[test]
    fn test_display_express() {
        let express = Vehicle::express(VehicleId::new("EXP301"), "X->Y Express", 4, 80.0, 3);
        let text = express.to_string();

        assert!(text.starts_with("Express Vehicle ID: EXP301"));
        assert!(text.ends_with("(stops: 3)"));
    }

    #[test]
    fn test_express_drop_mirrors_creation() {
        crate::network::test_log::install();
        drop(Vehicle::express(VehicleId::new("EXP-D1"), "X->Y", 4, 80.0, 3));

        assert_eq!(
            crate::network::test_log::lines_with("EXP-D1"),
            vec![
                "[Vehicle created] EXP-D1 | route: X->Y | capacity: 4",
                "[Express vehicle created] EXP-D1 | stops: 3",
                "[Express vehicle destroyed] EXP-D1",
                "[Vehicle destroyed] EXP-D1",
            ]
        );
    }

    #[test]
    fn test_accessors() {
        let mut bus = Vehicle::express(VehicleId::new("EXP301"), "X->Y Express", 4, 80.0, 3);

        assert_eq!(bus.id(), &VehicleId::new("EXP301"));
        assert_eq!(bus.route(), "X->Y Express");
        assert_eq!(bus.capacity(), 4);
        assert_eq!(bus.speed(), 80.0);
        assert!(bus.is_on_time());

        bus.set_status(false);
        assert!(!bus.is_on_time());
    }

    #[test]
    fn test_assigned_station_is_plain_setter() {
        let mut bus = Vehicle::standard(VehicleId::new("BUS1"), "A->B", 2, 45.0);
        assert_eq!(bus.assigned_station(), None);

        bus.set_assigned_station(Some(StationId::new("Hub")));
        assert_eq!(bus.assigned_station(), Some(&StationId::new("Hub")));

        bus.set_assigned_station(None);
        assert_eq!(bus.assigned_station(), None);
    }
}
