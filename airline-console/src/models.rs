use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Varchar};
use chrono::NaiveDateTime;
use shared::*;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::plane)]
pub struct NewPlane {
    pub id: i32,
    pub make: String,
    pub model: String,
    pub age: i32,
    pub seats: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::pilot)]
pub struct NewPilot {
    pub id: i32,
    pub fullname: String,
    pub nationality: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::technician)]
pub struct NewTechnician {
    pub id: i32,
    pub full_name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::flight)]
pub struct NewFlight {
    pub fnum: i32,
    pub cost: i32,
    pub num_sold: i32,
    pub num_stops: i32,
    pub actual_departure_date: NaiveDateTime,
    pub actual_arrival_date: NaiveDateTime,
    pub arrival_airport: String,
    pub departure_airport: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::flightinfo)]
pub struct NewFlightInfo {
    pub fiid: i32,
    pub flight_id: i32,
    pub pilot_id: i32,
    pub plane_id: i32,
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::schedule)]
pub struct DbSchedule {
    pub id: i32,
    pub flightnum: i32,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::reservation)]
pub struct NewReservation {
    pub rnum: i32,
    pub cid: i32,
    pub fid: i32,
    pub status: String,
}

#[derive(Debug, QueryableByName)]
pub struct PlaneRepairsRow {
    #[diesel(sql_type = Integer)]
    pub plane_id: i32,
    #[diesel(sql_type = BigInt)]
    pub repairs: i64,
    #[diesel(sql_type = Varchar)]
    pub model: String,
}

#[derive(Debug, QueryableByName)]
pub struct YearRepairsRow {
    #[diesel(sql_type = Integer)]
    pub year: i32,
    #[diesel(sql_type = BigInt)]
    pub repairs: i64,
}

impl NewPlane {
    pub fn new(id: i32, data: &PlaneData) -> Self {
        Self {
            id,
            make: data.make.clone(),
            model: data.model.clone(),
            age: data.age,
            seats: data.seats,
        }
    }
}

impl NewPilot {
    pub fn new(id: i32, data: &PilotData) -> Self {
        Self {
            id,
            fullname: data.full_name.clone(),
            nationality: data.nationality.clone(),
        }
    }
}

impl NewTechnician {
    pub fn new(id: i32, data: &TechnicianData) -> Self {
        Self {
            id,
            full_name: data.full_name.clone(),
        }
    }
}

impl NewFlight {
    pub fn new(fnum: i32, data: &FlightData) -> Self {
        Self {
            fnum,
            cost: data.cost,
            num_sold: data.num_sold,
            num_stops: data.num_stops,
            actual_departure_date: data.actual_departure,
            actual_arrival_date: data.actual_arrival,
            arrival_airport: data.arrival_airport.clone(),
            departure_airport: data.departure_airport.clone(),
        }
    }
}

// Flight info and schedule rows reuse the flight number as their key.
impl NewFlightInfo {
    pub fn new(fnum: i32, data: &FlightData) -> Self {
        Self {
            fiid: fnum,
            flight_id: fnum,
            pilot_id: data.pilot_id,
            plane_id: data.plane_id,
        }
    }
}

impl DbSchedule {
    pub fn new(fnum: i32, data: &FlightData) -> Self {
        Self {
            id: fnum,
            flightnum: fnum,
            departure_time: data.scheduled_departure,
            arrival_time: data.scheduled_arrival,
        }
    }
}

impl NewReservation {
    pub fn new(rnum: i32, request: &SeatRequest, status: ReservationStatus) -> Self {
        Self {
            rnum,
            cid: request.customer_id,
            fid: request.flight_number,
            status: status.code().to_string(),
        }
    }
}

impl From<DbSchedule> for ScheduleSlot {
    fn from(row: DbSchedule) -> Self {
        Self {
            departure: row.departure_time,
        }
    }
}

impl From<PlaneRepairsRow> for PlaneRepairs {
    fn from(row: PlaneRepairsRow) -> Self {
        Self {
            plane_id: row.plane_id,
            repairs: row.repairs,
            model: row.model,
        }
    }
}

impl From<YearRepairsRow> for YearRepairs {
    fn from(row: YearRepairsRow) -> Self {
        Self {
            year: row.year,
            repairs: row.repairs,
        }
    }
}
