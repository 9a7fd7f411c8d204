use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{pooled_connection::bb8::Pool, AsyncConnection, AsyncPgConnection, RunQueryDsl};
use std::time::Duration;
use tracing::{debug, info, warn};
use shared::*;
use crate::models::*;
use crate::schema::*;
use crate::store::{allocate_id, AirlineStore};

type DbPool = Pool<AsyncPgConnection>;

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32, connect_timeout: Duration) -> Result<Self> {
        let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_connections)
            .connection_timeout(connect_timeout)
            .build(config)
            .await
            .context("Unable to connect to database")?;
        info!("Connection pool ready (max {} connections)", max_connections);
        Ok(Self { pool })
    }
}

// Serializes writers on `table` until the surrounding transaction ends,
// while still letting plain readers through.
async fn lock_table(conn: &mut AsyncPgConnection, table: &'static str) -> QueryResult<usize> {
    diesel::sql_query(format!("LOCK TABLE {} IN SHARE ROW EXCLUSIVE MODE", table))
        .execute(conn)
        .await
}

#[async_trait]
impl AirlineStore for PgStore {
    async fn seat_capacity(&self, flight_number: i32, day: NaiveDate) -> Result<Option<i32>> {
        let mut conn = self.pool.get().await?;
        let seats = schedule::table
            .inner_join(flightinfo::table.on(flightinfo::flight_id.eq(schedule::flightnum)))
            .inner_join(plane::table.on(plane::id.eq(flightinfo::plane_id)))
            .filter(schedule::flightnum.eq(flight_number))
            .filter(diesel::dsl::date(schedule::departure_time).eq(day))
            .order(schedule::departure_time.asc())
            .select(plane::seats)
            .first::<i32>(&mut conn)
            .await
            .optional()?;
        debug!("Capacity of flight {} on {}: {:?}", flight_number, day, seats);
        Ok(seats)
    }

    async fn departures(&self, flight_number: i32) -> Result<Vec<ScheduleSlot>> {
        let mut conn = self.pool.get().await?;
        let rows = schedule::table
            .filter(schedule::flightnum.eq(flight_number))
            .order(schedule::departure_time.asc())
            .load::<DbSchedule>(&mut conn)
            .await?;
        Ok(rows.into_iter().map(ScheduleSlot::from).collect())
    }

    async fn status_counts(&self, flight_number: i32) -> Result<StatusCounts> {
        let mut conn = self.pool.get().await?;
        let rows = reservation::table
            .filter(reservation::fid.eq(flight_number))
            .group_by(reservation::status)
            .select((reservation::status, diesel::dsl::count_star()))
            .load::<(String, i64)>(&mut conn)
            .await?;

        let mut counts = StatusCounts::default();
        for (code, count) in rows {
            match ReservationStatus::from_code(&code) {
                Some(status) => counts.add(status, count),
                None => warn!("Ignoring {} reservations with unknown status {:?}", count, code),
            }
        }
        Ok(counts)
    }

    async fn reserve_seat(&self, request: &SeatRequest) -> Result<SeatDecision> {
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let request = request.clone();

        let decision = conn.transaction::<_, anyhow::Error, _>(|conn| {
            Box::pin(async move {
                lock_table(conn, "reservation").await?;

                let reserved = reservation::table
                    .filter(reservation::fid.eq(request.flight_number))
                    .filter(reservation::status.eq(ReservationStatus::Reserved.code()))
                    .count()
                    .get_result::<i64>(conn)
                    .await?;

                let Some(status) = request.decide(reserved) else {
                    return Ok(SeatDecision::Full { capacity: request.capacity, reserved });
                };

                let current = reservation::table
                    .select(max(reservation::rnum))
                    .first::<Option<i32>>(conn)
                    .await?;
                let rnum = allocate_id("reservation", current)?;

                diesel::insert_into(reservation::table)
                    .values(&NewReservation::new(rnum, &request, status))
                    .execute(conn)
                    .await?;

                Ok(SeatDecision::recorded(status, rnum))
            })
        }).await?;

        Ok(decision)
    }

    async fn add_plane(&self, plane_data: &PlaneData) -> Result<i32> {
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let data = plane_data.clone();

        conn.transaction::<_, anyhow::Error, _>(|conn| {
            Box::pin(async move {
                lock_table(conn, "plane").await?;
                let id = allocate_id("plane", plane::table.select(max(plane::id)).first::<Option<i32>>(conn).await?)?;
                diesel::insert_into(plane::table)
                    .values(&NewPlane::new(id, &data))
                    .execute(conn)
                    .await?;
                Ok(id)
            })
        }).await
    }

    async fn add_pilot(&self, pilot_data: &PilotData) -> Result<i32> {
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let data = pilot_data.clone();

        conn.transaction::<_, anyhow::Error, _>(|conn| {
            Box::pin(async move {
                lock_table(conn, "pilot").await?;
                let id = allocate_id("pilot", pilot::table.select(max(pilot::id)).first::<Option<i32>>(conn).await?)?;
                diesel::insert_into(pilot::table)
                    .values(&NewPilot::new(id, &data))
                    .execute(conn)
                    .await?;
                Ok(id)
            })
        }).await
    }

    async fn add_technician(&self, technician_data: &TechnicianData) -> Result<i32> {
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let data = technician_data.clone();

        conn.transaction::<_, anyhow::Error, _>(|conn| {
            Box::pin(async move {
                lock_table(conn, "technician").await?;
                let id = allocate_id("technician", technician::table.select(max(technician::id)).first::<Option<i32>>(conn).await?)?;
                diesel::insert_into(technician::table)
                    .values(&NewTechnician::new(id, &data))
                    .execute(conn)
                    .await?;
                Ok(id)
            })
        }).await
    }

    async fn add_flight(&self, flight_data: &FlightData) -> Result<i32> {
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let data = flight_data.clone();

        conn.transaction::<_, anyhow::Error, _>(|conn| {
            Box::pin(async move {
                lock_table(conn, "flight").await?;
                let fnum = allocate_id("flight", flight::table.select(max(flight::fnum)).first::<Option<i32>>(conn).await?)?;

                diesel::insert_into(flight::table)
                    .values(&NewFlight::new(fnum, &data))
                    .execute(conn)
                    .await
                    .context("Flight already exists")?;

                diesel::insert_into(flightinfo::table)
                    .values(&NewFlightInfo::new(fnum, &data))
                    .execute(conn)
                    .await
                    .context("Unable to assign pilot and plane; make sure both exist")?;

                diesel::insert_into(schedule::table)
                    .values(&DbSchedule::new(fnum, &data))
                    .execute(conn)
                    .await
                    .context("Flight has already been scheduled")?;

                Ok(fnum)
            })
        }).await
    }

    async fn repairs_per_plane(&self) -> Result<Vec<PlaneRepairs>> {
        let mut conn = self.pool.get().await?;
        let rows = diesel::sql_query(
            "SELECT r.plane_id, COUNT(*) AS repairs, p.model \
             FROM repairs r JOIN plane p ON p.id = r.plane_id \
             GROUP BY r.plane_id, p.model \
             ORDER BY repairs DESC, r.plane_id ASC",
        )
        .load::<PlaneRepairsRow>(&mut conn)
        .await?;
        Ok(rows.into_iter().map(PlaneRepairs::from).collect())
    }

    async fn repairs_per_year(&self) -> Result<Vec<YearRepairs>> {
        let mut conn = self.pool.get().await?;
        let rows = diesel::sql_query(
            "SELECT EXTRACT(YEAR FROM repair_date)::int4 AS year, COUNT(*) AS repairs \
             FROM repairs \
             GROUP BY 1 \
             ORDER BY repairs ASC, year ASC",
        )
        .load::<YearRepairsRow>(&mut conn)
        .await?;
        Ok(rows.into_iter().map(YearRepairs::from).collect())
    }
}
