use anyhow::Result;
use chrono::NaiveDate;
use tracing::{error, info};
use shared::*;
use crate::console::Console;
use crate::prompt::{self, DATE_TIME_FORMAT};
use crate::store::AirlineStore;

/// Result of looking up the plane behind a flight on a given day.
#[derive(Debug)]
pub enum Resolution {
    Scheduled(ResolvedSchedule),
    Aborted,
    Failed(anyhow::Error),
}

/// Finds the seat capacity for `flight_number` on `date`. When the flight
/// does not fly that day the operator picks one of its scheduled departures
/// by position instead; position 0 or one past the list aborts.
///
/// Errors are console failures only. Store failures come back as
/// [`Resolution::Failed`].
pub async fn resolve_schedule<S, C>(
    store: &S,
    console: &mut C,
    flight_number: i32,
    date: NaiveDate,
) -> Result<Resolution>
where
    S: AirlineStore + ?Sized,
    C: Console + ?Sized,
{
    let mut day = date;

    loop {
        match store.seat_capacity(flight_number, day).await {
            Ok(Some(capacity)) => {
                return Ok(Resolution::Scheduled(ResolvedSchedule {
                    flight_number,
                    departure_date: day,
                    capacity,
                }));
            }
            Ok(None) => {}
            Err(e) => return Ok(Resolution::Failed(e)),
        }

        console.say(&format!("Flight {} is not scheduled on {}", flight_number, day));

        let slots = match store.departures(flight_number).await {
            Ok(slots) => slots,
            Err(e) => return Ok(Resolution::Failed(e)),
        };
        if slots.is_empty() {
            console.say("There are no schedules on record for this flight");
            return Ok(Resolution::Aborted);
        }

        console.say("Select one of its scheduled departures (0 to return to the main menu):");
        for (position, slot) in slots.iter().enumerate() {
            console.say(&format!("{}: {}", position + 1, slot.departure.format(DATE_TIME_FORMAT)));
        }

        let ordinal = prompt::choice(console, "Schedule number: ").await?;
        let chosen = usize::try_from(ordinal)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| slots.get(index));

        match chosen {
            Some(slot) => day = slot.departure.date(),
            None => {
                console.say("Returning to main menu");
                return Ok(Resolution::Aborted);
            }
        }
    }
}

fn failed(flight_number: i32, e: anyhow::Error) -> BookingOutcome {
    error!("Booking on flight {} failed: {:#}", flight_number, e);
    BookingOutcome::Failed(format!("{:#}", e))
}

/// Books `customer_id` on `flight_number` departing on `date`.
///
/// The seat decision and the reservation insert happen in one store call,
/// so two bookers never both get the last seat. If the flight is full the
/// operator decides whether to waitlist; the second store call re-checks,
/// so a seat freed in the meantime still confirms.
pub async fn book_flight<S, C>(
    store: &S,
    console: &mut C,
    flight_number: i32,
    date: NaiveDate,
    customer_id: i32,
) -> Result<BookingOutcome>
where
    S: AirlineStore + ?Sized,
    C: Console + ?Sized,
{
    let schedule = match resolve_schedule(store, console, flight_number, date).await? {
        Resolution::Scheduled(schedule) => schedule,
        Resolution::Aborted => return Ok(BookingOutcome::Aborted),
        Resolution::Failed(e) => return Ok(failed(flight_number, e)),
    };

    let request = SeatRequest::new(flight_number, customer_id, schedule.capacity);
    let decision = match store.reserve_seat(&request).await {
        Ok(decision) => decision,
        Err(e) => return Ok(failed(flight_number, e)),
    };

    let decision = match decision {
        SeatDecision::Full { capacity, reserved } => {
            info!("Flight {} is full ({} of {} seats reserved)", flight_number, reserved, capacity);
            let waitlist = prompt::yes_no(console, "The flight is full, would you like to be waitlisted? (y/n) ").await?;
            if !waitlist {
                info!("Customer {} declined the waitlist for flight {}", customer_id, flight_number);
                return Ok(BookingOutcome::Declined);
            }
            match store.reserve_seat(&request.accepting_waitlist()).await {
                Ok(decision) => decision,
                Err(e) => return Ok(failed(flight_number, e)),
            }
        }
        decision => decision,
    };

    let outcome = match decision {
        SeatDecision::Reserved(rnum) => BookingOutcome::Confirmed(rnum),
        SeatDecision::Waitlisted(rnum) => BookingOutcome::Waitlisted(rnum),
        SeatDecision::Full { .. } => BookingOutcome::Failed("flight is full".to_string()),
    };
    info!("Customer {} on flight {}: {}", customer_id, flight_number, outcome);
    Ok(outcome)
}
