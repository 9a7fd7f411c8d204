use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::*;

/// Data access used by the console. Every write that allocates an
/// identifier does so in the same transaction as its insert.
#[async_trait]
pub trait AirlineStore: Send + Sync {
    /// Seat count of the plane flying `flight_number` on `date`, if a
    /// schedule with a plane assignment exists for that day.
    async fn seat_capacity(&self, flight_number: i32, date: NaiveDate) -> Result<Option<i32>>;

    /// All schedules on record for the flight, earliest departure first.
    async fn departures(&self, flight_number: i32) -> Result<Vec<ScheduleSlot>>;

    async fn status_counts(&self, flight_number: i32) -> Result<StatusCounts>;

    /// Counts reserved seats, decides the status, allocates the reservation
    /// number and inserts, all atomically.
    async fn reserve_seat(&self, request: &SeatRequest) -> Result<SeatDecision>;

    async fn add_plane(&self, plane: &PlaneData) -> Result<i32>;

    async fn add_pilot(&self, pilot: &PilotData) -> Result<i32>;

    async fn add_technician(&self, technician: &TechnicianData) -> Result<i32>;

    /// Inserts the flight with its plane/pilot assignment and schedule.
    async fn add_flight(&self, flight: &FlightData) -> Result<i32>;

    async fn repairs_per_plane(&self) -> Result<Vec<PlaneRepairs>>;

    async fn repairs_per_year(&self) -> Result<Vec<YearRepairs>>;
}

/// `max + 1` for `table`, failing instead of wrapping once ids run out.
pub fn allocate_id(table: &str, current_max: Option<i32>) -> Result<i32> {
    next_id(current_max).with_context(|| format!("No identifiers left in table {}", table))
}
