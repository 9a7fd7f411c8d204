use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Reserved,
    Waitlisted,
    Completed,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 3] = [
        ReservationStatus::Reserved,
        ReservationStatus::Waitlisted,
        ReservationStatus::Completed,
    ];

    /// Single-character code stored in the `status` column.
    pub fn code(&self) -> &'static str {
        match self {
            ReservationStatus::Reserved => "R",
            ReservationStatus::Waitlisted => "W",
            ReservationStatus::Completed => "C",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "R" => Some(ReservationStatus::Reserved),
            "W" => Some(ReservationStatus::Waitlisted),
            "C" => Some(ReservationStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReservationStatus::Reserved => "Reserved",
            ReservationStatus::Waitlisted => "Waitlisted",
            ReservationStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Confirmed(i32),
    Waitlisted(i32),
    Declined,
    Aborted,
    Failed(String),
}

impl BookingOutcome {
    pub fn reservation_number(&self) -> Option<i32> {
        match self {
            BookingOutcome::Confirmed(rnum) | BookingOutcome::Waitlisted(rnum) => Some(*rnum),
            _ => None,
        }
    }
}

impl fmt::Display for BookingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingOutcome::Confirmed(rnum) => write!(f, "Reservation {} confirmed", rnum),
            BookingOutcome::Waitlisted(rnum) => write!(f, "Reservation {} placed on the waitlist", rnum),
            BookingOutcome::Declined => f.write_str("Flight is full, booking declined"),
            BookingOutcome::Aborted => f.write_str("Booking aborted"),
            BookingOutcome::Failed(reason) => write!(f, "Booking failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitlistPolicy {
    Refuse,
    Accept,
}

#[derive(Debug, Clone)]
pub struct SeatRequest {
    pub flight_number: i32,
    pub customer_id: i32,
    pub capacity: i32,
    pub waitlist: WaitlistPolicy,
}

impl SeatRequest {
    pub fn new(flight_number: i32, customer_id: i32, capacity: i32) -> Self {
        Self {
            flight_number,
            customer_id,
            capacity,
            waitlist: WaitlistPolicy::Refuse,
        }
    }

    pub fn accepting_waitlist(mut self) -> Self {
        self.waitlist = WaitlistPolicy::Accept;
        self
    }

    /// Status a new reservation gets given the current reserved count, or
    /// `None` when the flight is full and waitlisting was refused.
    pub fn decide(&self, reserved: i64) -> Option<ReservationStatus> {
        let available = i64::from(self.capacity) - reserved;
        if available > 0 {
            Some(ReservationStatus::Reserved)
        } else if self.waitlist == WaitlistPolicy::Accept {
            Some(ReservationStatus::Waitlisted)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatDecision {
    Reserved(i32),
    Waitlisted(i32),
    Full { capacity: i32, reserved: i64 },
}

impl SeatDecision {
    pub fn recorded(status: ReservationStatus, rnum: i32) -> Self {
        match status {
            ReservationStatus::Waitlisted => SeatDecision::Waitlisted(rnum),
            _ => SeatDecision::Reserved(rnum),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub reserved: i64,
    pub waitlisted: i64,
    pub completed: i64,
}

impl StatusCounts {
    pub fn add(&mut self, status: ReservationStatus, count: i64) {
        match status {
            ReservationStatus::Reserved => self.reserved += count,
            ReservationStatus::Waitlisted => self.waitlisted += count,
            ReservationStatus::Completed => self.completed += count,
        }
    }

    pub fn get(&self, status: ReservationStatus) -> i64 {
        match status {
            ReservationStatus::Reserved => self.reserved,
            ReservationStatus::Waitlisted => self.waitlisted,
            ReservationStatus::Completed => self.completed,
        }
    }

    /// Seats taken for availability reporting: reserved plus completed.
    pub fn occupied(&self) -> i64 {
        self.reserved + self.completed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub departure: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSchedule {
    pub flight_number: i32,
    pub departure_date: NaiveDate,
    pub capacity: i32,
}

#[derive(Debug, Clone)]
pub struct PlaneData {
    pub make: String,
    pub model: String,
    pub age: i32,
    pub seats: i32,
}

#[derive(Debug, Clone)]
pub struct PilotData {
    pub full_name: String,
    pub nationality: String,
}

#[derive(Debug, Clone)]
pub struct TechnicianData {
    pub full_name: String,
}

#[derive(Debug, Clone)]
pub struct FlightData {
    pub cost: i32,
    pub num_sold: i32,
    pub num_stops: i32,
    pub scheduled_departure: NaiveDateTime,
    pub scheduled_arrival: NaiveDateTime,
    pub actual_departure: NaiveDateTime,
    pub actual_arrival: NaiveDateTime,
    pub arrival_airport: String,
    pub departure_airport: String,
    pub pilot_id: i32,
    pub plane_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneRepairs {
    pub plane_id: i32,
    pub repairs: i64,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRepairs {
    pub year: i32,
    pub repairs: i64,
}

/// Next identifier after the current maximum, starting at 1 on an empty table.
/// `None` once the maximum is `i32::MAX`.
pub fn next_id(current_max: Option<i32>) -> Option<i32> {
    current_max.map_or(Some(1), |max| max.checked_add(1))
}
