use anyhow::Context;
use chrono::{NaiveTime, TimeDelta};

use crate::network::{
    passenger::{Passenger, PassengerId},
    schedule::Movement,
    station::{Station, StationId, MAX_SCHEDULES},
    vehicle::{Vehicle, VehicleId},
    Network,
};

fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(h) => format!("{h:.2}"),
        None => "undefined".to_owned(),
    }
}

fn print_station(network: &Network, id: &StationId) {
    if let Some(info) = network.station_info(id) {
        println!("{info}");
    }
}

fn print_vehicle(network: &Network, id: &VehicleId) {
    if let Some(vehicle) = network.vehicle(id) {
        println!("{vehicle}");
    }
}

/// Builds the sample network and walks through every operation once.
/// Failed operations are reported and the walkthrough carries on.
pub fn run(network: &mut Network, distance_km: f64) -> anyhow::Result<()> {
    println!("=== Public Transportation Station Management System Demo ===\n");

    let bus_hub = network.add_station(Station::new(
        StationId::new("Downtown Bus Hub"),
        "12 Main St",
        "bus".parse()?,
    ))?;
    let central = network.add_station(Station::new(
        StationId::new("Central Train"),
        "1 Station Rd",
        "train".parse()?,
    ))?;

    let bus101 = network.add_vehicle(Vehicle::standard(VehicleId::new("BUS101"), "A->B", 2, 45.0))?;
    let bus202 = network.add_vehicle(Vehicle::standard(VehicleId::new("BUS202"), "C->D", 3, 50.0))?;
    let exp301 = network.add_vehicle(Vehicle::express(
        VehicleId::new("EXP301"),
        "X->Y Express",
        4,
        80.0,
        3,
    ))?;

    println!("\n-- Scheduling tests (max {MAX_SCHEDULES} per station) --");
    let first_departure = NaiveTime::from_hms_opt(8, 10, 0).context("Invalid first departure")?;
    for i in 0..MAX_SCHEDULES as i64 {
        let time = (first_departure + TimeDelta::minutes(i)).format("%H:%M").to_string();
        let _ = network.add_schedule(&bus_hub, Some(&bus101), &time, Movement::Departure);
    }
    // One over the limit
    let _ = network.add_schedule(&bus_hub, Some(&bus202), "11:30", Movement::Arrival);

    println!("\n-- Display schedules at {bus_hub} --");
    print_station(network, &bus_hub);

    println!("\n-- Booking tests (capacity checks) --");
    let alice = network.add_passenger(Passenger::new(PassengerId::new("P100"), "Alice"))?;
    let bob = network.add_passenger(Passenger::new(PassengerId::new("P101"), "Bob"))?;
    let carol = network.add_passenger(Passenger::new(PassengerId::new("P102"), "Carol"))?;

    let _ = network.book_ride(&alice, &bus101);
    let _ = network.book_ride(&bob, &bus101);
    let _ = network.book_ride(&carol, &bus101);

    println!("\n-- Vehicle info after attempted bookings --");
    print_vehicle(network, &bus101);

    println!("\n-- Cancel and retry booking --");
    let _ = network.cancel_ride(&bob, &bus101);
    let _ = network.cancel_ride(&bob, &bus101);
    let _ = network.book_ride(&carol, &bus101);
    print_vehicle(network, &bus101);

    println!("\n-- Status update --");
    if let Some(vehicle) = network.vehicles.get_mut(&bus202) {
        vehicle.set_status(false);
    }
    print_vehicle(network, &bus202);

    println!("\n-- Travel time comparison (distance {distance_km:.2} km) --");
    for (id, note) in [(&bus202, ""), (&exp301, " (20% faster)")] {
        if let Some(vehicle) = network.vehicle(id) {
            println!(
                "{id} time (hrs): {}{note}",
                format_hours(vehicle.travel_time(distance_km))
            );
        }
    }

    println!("\n-- Schedule express bus at {central} --");
    let _ = network.add_schedule(&central, Some(&exp301), "09:45", Movement::Arrival);
    print_station(network, &central);

    println!("\n-- Remove schedule example --");
    let _ = network.remove_schedule(&bus_hub, &bus101);
    let _ = network.remove_schedule(&bus_hub, &exp301);
    print_station(network, &bus_hub);
    if let Some(station) = network.vehicle(&bus101).and_then(Vehicle::assigned_station) {
        println!("{bus101} is still assigned to {station}");
    }

    println!("\n-- Passenger info --");
    for id in [&alice, &bob, &carol] {
        if let Some(passenger) = network.passenger(id) {
            println!("{passenger}");
        }
    }

    Ok(())
}
