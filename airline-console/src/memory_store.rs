use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::Mutex;
use shared::*;
use crate::store::{allocate_id, AirlineStore};

#[derive(Debug, Clone)]
pub struct StoredReservation {
    pub rnum: i32,
    pub customer_id: i32,
    pub flight_number: i32,
    pub status: ReservationStatus,
}

#[derive(Debug, Clone)]
struct Assignment {
    plane_id: i32,
}

#[derive(Debug, Clone)]
struct Repair {
    plane_id: i32,
    date: NaiveDate,
}

#[derive(Default)]
struct Tables {
    planes: BTreeMap<i32, PlaneData>,
    pilots: BTreeMap<i32, PilotData>,
    technicians: BTreeMap<i32, TechnicianData>,
    flights: BTreeMap<i32, FlightData>,
    flight_info: HashMap<i32, Assignment>,
    schedules: BTreeMap<i32, (i32, NaiveDateTime)>,
    customers: HashSet<i32>,
    reservations: Vec<StoredReservation>,
    repairs: Vec<Repair>,
    fail_writes: bool,
}

/// In-process store with the same key and foreign-key rules as the
/// Postgres schema. The mutex is held across each operation, standing in
/// for the transaction boundary.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_plane(&self, id: i32, seats: i32) {
        let mut tables = self.tables.lock().await;
        tables.planes.insert(
            id,
            PlaneData {
                make: "Boeing".to_string(),
                model: format!("7{}7", id),
                age: 5,
                seats,
            },
        );
    }

    pub async fn insert_customer(&self, id: i32) {
        self.tables.lock().await.customers.insert(id);
    }

    /// Registers `flight_number` flown by `plane_id`, with one schedule per
    /// departure given.
    pub async fn insert_flight(&self, flight_number: i32, plane_id: i32, departures: &[NaiveDateTime]) {
        let mut tables = self.tables.lock().await;
        let first = departures.first().copied().unwrap_or_default();
        tables.flights.insert(
            flight_number,
            FlightData {
                cost: 100,
                num_sold: 0,
                num_stops: 0,
                scheduled_departure: first,
                scheduled_arrival: first,
                actual_departure: first,
                actual_arrival: first,
                arrival_airport: "LAX".to_string(),
                departure_airport: "SFO".to_string(),
                pilot_id: 1,
                plane_id,
            },
        );
        tables.flight_info.insert(flight_number, Assignment { plane_id });
        for departure in departures {
            let id = next_id(tables.schedules.keys().next_back().copied()).expect("schedule id");
            tables.schedules.insert(id, (flight_number, *departure));
        }
    }

    pub async fn insert_reservation(&self, customer_id: i32, flight_number: i32, status: ReservationStatus) -> i32 {
        let mut tables = self.tables.lock().await;
        let rnum = next_id(tables.reservations.iter().map(|r| r.rnum).max()).expect("reservation number");
        tables.reservations.push(StoredReservation { rnum, customer_id, flight_number, status });
        rnum
    }

    pub async fn insert_repair(&self, plane_id: i32, date: NaiveDate) {
        self.tables.lock().await.repairs.push(Repair { plane_id, date });
    }

    /// Makes every subsequent write fail as a lost connection would.
    pub async fn fail_writes(&self) {
        self.tables.lock().await.fail_writes = true;
    }

    pub async fn reservations(&self) -> Vec<StoredReservation> {
        self.tables.lock().await.reservations.clone()
    }

    pub async fn pilot(&self, id: i32) -> Option<PilotData> {
        self.tables.lock().await.pilots.get(&id).cloned()
    }

    pub async fn technician(&self, id: i32) -> Option<TechnicianData> {
        self.tables.lock().await.technicians.get(&id).cloned()
    }

    pub async fn plane(&self, id: i32) -> Option<PlaneData> {
        self.tables.lock().await.planes.get(&id).cloned()
    }

    pub async fn flight_count(&self) -> usize {
        self.tables.lock().await.flights.len()
    }
}

impl Tables {
    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            bail!("connection to server was lost");
        }
        Ok(())
    }
}

#[async_trait]
impl AirlineStore for MemoryStore {
    async fn seat_capacity(&self, flight_number: i32, date: NaiveDate) -> Result<Option<i32>> {
        let tables = self.tables.lock().await;
        let scheduled = tables
            .schedules
            .values()
            .any(|(flight, departure)| *flight == flight_number && departure.date() == date);
        if !scheduled {
            return Ok(None);
        }
        Ok(tables
            .flight_info
            .get(&flight_number)
            .and_then(|info| tables.planes.get(&info.plane_id))
            .map(|plane| plane.seats))
    }

    async fn departures(&self, flight_number: i32) -> Result<Vec<ScheduleSlot>> {
        let tables = self.tables.lock().await;
        let mut slots: Vec<ScheduleSlot> = tables
            .schedules
            .iter()
            .filter(|(_, (flight, _))| *flight == flight_number)
            .map(|(_, (_, departure))| ScheduleSlot { departure: *departure })
            .collect();
        slots.sort_by_key(|slot| slot.departure);
        Ok(slots)
    }

    async fn status_counts(&self, flight_number: i32) -> Result<StatusCounts> {
        let tables = self.tables.lock().await;
        let mut counts = StatusCounts::default();
        for reservation in tables.reservations.iter().filter(|r| r.flight_number == flight_number) {
            counts.add(reservation.status, 1);
        }
        Ok(counts)
    }

    async fn reserve_seat(&self, request: &SeatRequest) -> Result<SeatDecision> {
        let mut tables = self.tables.lock().await;
        tables.check_writable()?;

        let reserved = tables
            .reservations
            .iter()
            .filter(|r| r.flight_number == request.flight_number && r.status == ReservationStatus::Reserved)
            .count() as i64;

        // Yield while holding the lock so concurrent callers really contend.
        tokio::task::yield_now().await;

        let Some(status) = request.decide(reserved) else {
            return Ok(SeatDecision::Full { capacity: request.capacity, reserved });
        };

        if !tables.customers.contains(&request.customer_id) {
            bail!("insert or update on table \"reservation\" violates foreign key constraint: customer {} does not exist", request.customer_id);
        }
        if !tables.flights.contains_key(&request.flight_number) {
            bail!("insert or update on table \"reservation\" violates foreign key constraint: flight {} does not exist", request.flight_number);
        }

        let rnum = allocate_id("reservation", tables.reservations.iter().map(|r| r.rnum).max())?;
        tables.reservations.push(StoredReservation {
            rnum,
            customer_id: request.customer_id,
            flight_number: request.flight_number,
            status,
        });
        Ok(SeatDecision::recorded(status, rnum))
    }

    async fn add_plane(&self, plane: &PlaneData) -> Result<i32> {
        let mut tables = self.tables.lock().await;
        tables.check_writable()?;
        let id = allocate_id("plane", tables.planes.keys().next_back().copied())?;
        tables.planes.insert(id, plane.clone());
        Ok(id)
    }

    async fn add_pilot(&self, pilot: &PilotData) -> Result<i32> {
        let mut tables = self.tables.lock().await;
        tables.check_writable()?;
        let id = allocate_id("pilot", tables.pilots.keys().next_back().copied())?;
        tables.pilots.insert(id, pilot.clone());
        Ok(id)
    }

    async fn add_technician(&self, technician: &TechnicianData) -> Result<i32> {
        let mut tables = self.tables.lock().await;
        tables.check_writable()?;
        let id = allocate_id("technician", tables.technicians.keys().next_back().copied())?;
        tables.technicians.insert(id, technician.clone());
        Ok(id)
    }

    async fn add_flight(&self, flight: &FlightData) -> Result<i32> {
        let mut tables = self.tables.lock().await;
        tables.check_writable()?;
        let fnum = allocate_id("flight", tables.flights.keys().next_back().copied())?;

        // All three rows or none.
        if !tables.pilots.contains_key(&flight.pilot_id) || !tables.planes.contains_key(&flight.plane_id) {
            bail!("Unable to assign pilot and plane; make sure both exist");
        }
        if tables.flight_info.contains_key(&fnum) || tables.schedules.contains_key(&fnum) {
            bail!("Flight has already been scheduled");
        }

        tables.flights.insert(fnum, flight.clone());
        tables.flight_info.insert(fnum, Assignment { plane_id: flight.plane_id });
        tables
            .schedules
            .insert(fnum, (fnum, flight.scheduled_departure));
        Ok(fnum)
    }

    async fn repairs_per_plane(&self) -> Result<Vec<PlaneRepairs>> {
        let tables = self.tables.lock().await;
        let mut counts: BTreeMap<i32, i64> = BTreeMap::new();
        for repair in &tables.repairs {
            *counts.entry(repair.plane_id).or_default() += 1;
        }
        let mut rows: Vec<PlaneRepairs> = counts
            .into_iter()
            .filter_map(|(plane_id, repairs)| {
                tables.planes.get(&plane_id).map(|plane| PlaneRepairs {
                    plane_id,
                    repairs,
                    model: plane.model.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.repairs.cmp(&a.repairs).then(a.plane_id.cmp(&b.plane_id)));
        Ok(rows)
    }

    async fn repairs_per_year(&self) -> Result<Vec<YearRepairs>> {
        let tables = self.tables.lock().await;
        let mut counts: BTreeMap<i32, i64> = BTreeMap::new();
        for repair in &tables.repairs {
            *counts.entry(repair.date.year()).or_default() += 1;
        }
        let mut rows: Vec<YearRepairs> = counts
            .into_iter()
            .map(|(year, repairs)| YearRepairs { year, repairs })
            .collect();
        rows.sort_by(|a, b| a.repairs.cmp(&b.repairs).then(a.year.cmp(&b.year)));
        Ok(rows)
    }
}
