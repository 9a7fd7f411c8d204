use anyhow::Result;
use tracing::{error, info};
use shared::*;
use crate::booking::{self, Resolution};
use crate::console::Console;
use crate::prompt::{self, DATE_TIME_FORMAT};
use crate::report::render_table;
use crate::store::AirlineStore;

const RULE: &str = "------------------------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AddPlane,
    AddPilot,
    AddFlight,
    AddTechnician,
    BookFlight,
    AvailableSeats,
    RepairsPerPlane,
    RepairsPerYear,
    PassengersByStatus,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 10] = [
        MenuAction::AddPlane,
        MenuAction::AddPilot,
        MenuAction::AddFlight,
        MenuAction::AddTechnician,
        MenuAction::BookFlight,
        MenuAction::AvailableSeats,
        MenuAction::RepairsPerPlane,
        MenuAction::RepairsPerYear,
        MenuAction::PassengersByStatus,
        MenuAction::Exit,
    ];

    pub fn from_choice(choice: i32) -> Option<Self> {
        let index = usize::try_from(choice).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::AddPlane => "Add Plane",
            MenuAction::AddPilot => "Add Pilot",
            MenuAction::AddFlight => "Add Flight",
            MenuAction::AddTechnician => "Add Technician",
            MenuAction::BookFlight => "Book Flight",
            MenuAction::AvailableSeats => "List number of available seats for a given flight",
            MenuAction::RepairsPerPlane => "List total number of repairs per plane in descending order",
            MenuAction::RepairsPerYear => "List total number of repairs per year in ascending order",
            MenuAction::PassengersByStatus => "Find total number of passengers with a given status",
            MenuAction::Exit => "< EXIT",
        }
    }
}

fn report_failure<C: Console + ?Sized>(console: &mut C, context: &str, e: anyhow::Error) {
    error!("{}: {:#}", context, e);
    console.say(context);
    console.say(&format!("Err: {:#}", e));
}

/// Drives the operator menu against one store handle.
pub struct MenuHandler<S, C> {
    store: S,
    console: C,
}

impl<S: AirlineStore, C: Console> MenuHandler<S, C> {
    pub fn new(store: S, console: C) -> Self {
        Self { store, console }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Runs until the operator exits or input ends. Errors are console
    /// failures in the middle of an action; store errors are reported to the
    /// operator and the menu continues.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.console.say("MAIN MENU");
            self.console.say("---------");
            for (position, action) in MenuAction::ALL.iter().enumerate() {
                self.console.say(&format!("{}. {}", position + 1, action.label()));
            }

            let choice = match prompt::choice(&mut self.console, "Please make your choice: ").await {
                Ok(choice) => choice,
                Err(e) => {
                    info!("Leaving menu: {:#}", e);
                    return Ok(());
                }
            };

            match MenuAction::from_choice(choice) {
                Some(MenuAction::Exit) => return Ok(()),
                Some(action) => self.dispatch(action).await?,
                None => {}
            }
        }
    }

    pub async fn dispatch(&mut self, action: MenuAction) -> Result<()> {
        match action {
            MenuAction::AddPlane => self.add_plane().await,
            MenuAction::AddPilot => self.add_pilot().await,
            MenuAction::AddFlight => self.add_flight().await,
            MenuAction::AddTechnician => self.add_technician().await,
            MenuAction::BookFlight => self.book_flight().await,
            MenuAction::AvailableSeats => self.available_seats().await,
            MenuAction::RepairsPerPlane => self.repairs_per_plane().await,
            MenuAction::RepairsPerYear => self.repairs_per_year().await,
            MenuAction::PassengersByStatus => self.passengers_by_status().await,
            MenuAction::Exit => Ok(()),
        }
    }

    async fn add_plane(&mut self) -> Result<()> {
        let console = &mut self.console;
        let plane = PlaneData {
            make: prompt::text(console, "Enter Make: ").await?,
            model: prompt::text(console, "Enter Model: ").await?,
            age: prompt::number(console, "Enter Age: ").await?,
            seats: prompt::number(console, "Enter the number of Seats: ").await?,
        };

        console.say(RULE);
        console.say(&format!("Make: {}", plane.make));
        console.say(&format!("Model: {}", plane.model));
        console.say(&format!("Age: {}", plane.age));
        console.say(&format!("Number of Seats: {}", plane.seats));

        match self.store.add_plane(&plane).await {
            Ok(id) => {
                info!("Added plane {}", id);
                console.say(&format!("Plane ID: {}", id));
            }
            Err(e) => report_failure(console, "Unable to add plane, please try again", e),
        }
        console.say(RULE);
        Ok(())
    }

    async fn add_pilot(&mut self) -> Result<()> {
        let console = &mut self.console;
        let pilot = PilotData {
            full_name: prompt::text_without_digits(console, "Enter Full Name of the Pilot (can be empty): ").await?,
            nationality: prompt::text_without_digits(console, "Enter the Nationality of the Pilot (can be empty): ").await?,
        };

        console.say(RULE);
        console.say(&format!("Full Name: {}", pilot.full_name));
        console.say(&format!("Nationality: {}", pilot.nationality));

        match self.store.add_pilot(&pilot).await {
            Ok(id) => {
                info!("Added pilot {}", id);
                console.say(&format!("Pilot ID: {}", id));
            }
            Err(e) => report_failure(console, "Unable to add pilot, please try again", e),
        }
        console.say(RULE);
        Ok(())
    }

    async fn add_technician(&mut self) -> Result<()> {
        let console = &mut self.console;
        let technician = TechnicianData {
            full_name: prompt::text_without_digits(console, "Enter Full Name of the Technician: ").await?,
        };

        console.say(RULE);
        console.say(&format!("Full Name: {}", technician.full_name));

        match self.store.add_technician(&technician).await {
            Ok(id) => {
                info!("Added technician {}", id);
                console.say(&format!("Technician ID: {}", id));
            }
            Err(e) => report_failure(console, "Unable to add technician, please try again", e),
        }
        console.say(RULE);
        Ok(())
    }

    async fn add_flight(&mut self) -> Result<()> {
        let console = &mut self.console;
        let flight = FlightData {
            cost: prompt::number(console, "Enter Cost: ").await?,
            num_sold: prompt::number(console, "Enter Number of Seats Sold: ").await?,
            num_stops: prompt::number(console, "Enter Number of Stops: ").await?,
            scheduled_departure: prompt::date_time(console, "Enter Scheduled Departure Date (yyyy-MM-dd HH:mm): ").await?,
            scheduled_arrival: prompt::date_time(console, "Enter Scheduled Arrival Date (yyyy-MM-dd HH:mm): ").await?,
            actual_departure: prompt::date_time(console, "Enter Actual Departure Date (yyyy-MM-dd HH:mm): ").await?,
            actual_arrival: prompt::date_time(console, "Enter Actual Arrival Date (yyyy-MM-dd HH:mm): ").await?,
            arrival_airport: prompt::text_without_digits(console, "Enter the Airport of Arrival: ").await?,
            departure_airport: prompt::text_without_digits(console, "Enter the Airport of Departure: ").await?,
            pilot_id: prompt::number(console, "Enter PilotID: ").await?,
            plane_id: prompt::number(console, "Enter PlaneID: ").await?,
        };

        console.say(RULE);
        console.say(&format!("Cost: {}", flight.cost));
        console.say(&format!("Number of Seats Sold: {}", flight.num_sold));
        console.say(&format!("Number of Stops: {}", flight.num_stops));
        console.say(&format!("Scheduled Departure: {}", flight.scheduled_departure.format(DATE_TIME_FORMAT)));
        console.say(&format!("Scheduled Arrival: {}", flight.scheduled_arrival.format(DATE_TIME_FORMAT)));
        console.say(&format!("Actual Departure: {}", flight.actual_departure.format(DATE_TIME_FORMAT)));
        console.say(&format!("Actual Arrival: {}", flight.actual_arrival.format(DATE_TIME_FORMAT)));
        console.say(&format!("Arrival Airport: {}", flight.arrival_airport));
        console.say(&format!("Departure Airport: {}", flight.departure_airport));
        console.say(&format!("PilotID: {}", flight.pilot_id));
        console.say(&format!("PlaneID: {}", flight.plane_id));

        match self.store.add_flight(&flight).await {
            Ok(fnum) => {
                info!("Added flight {} with plane {} and pilot {}", fnum, flight.plane_id, flight.pilot_id);
                console.say(&format!("Flight Number: {}", fnum));
            }
            Err(e) => report_failure(console, "Unable to add flight, please make sure the pilot and plane exist", e),
        }
        console.say(RULE);
        Ok(())
    }

    async fn book_flight(&mut self) -> Result<()> {
        let console = &mut self.console;
        let flight_number = prompt::number(console, "Enter Flight Number: ").await?;
        let date = prompt::date(console, "Enter Date (yyyy-MM-dd): ").await?;
        let customer_id = prompt::number(console, "Enter Customer ID: ").await?;

        console.say(RULE);
        console.say(&format!("Flight Number: {}", flight_number));
        console.say(&format!("Scheduled Date of Departure: {}", date));
        console.say(&format!("Customer ID: {}", customer_id));

        let outcome = booking::book_flight(&self.store, console, flight_number, date, customer_id).await?;
        match &outcome {
            BookingOutcome::Confirmed(_) => console.say(&format!(
                "Done: {} for flight {} with status {}",
                outcome,
                flight_number,
                ReservationStatus::Reserved.code()
            )),
            BookingOutcome::Waitlisted(_) => console.say(&format!(
                "Done: {} for flight {} with status {}",
                outcome,
                flight_number,
                ReservationStatus::Waitlisted.code()
            )),
            BookingOutcome::Failed(_) => {
                console.say("Error reserving a seat, please make sure the customer ID and flight number are valid");
                console.say(&outcome.to_string());
            }
            BookingOutcome::Declined | BookingOutcome::Aborted => console.say(&outcome.to_string()),
        }
        console.say(RULE);
        Ok(())
    }

    async fn available_seats(&mut self) -> Result<()> {
        let console = &mut self.console;
        let flight_number = prompt::number(console, "Enter Flight Number: ").await?;
        let date = prompt::date(console, "Enter Scheduled Date of Departure (yyyy-MM-dd): ").await?;

        console.say(RULE);
        console.say(&format!("Flight Number: {}", flight_number));
        console.say(&format!("Date: {}", date));

        let schedule = match booking::resolve_schedule(&self.store, console, flight_number, date).await? {
            Resolution::Scheduled(schedule) => schedule,
            Resolution::Aborted => {
                console.say(RULE);
                return Ok(());
            }
            Resolution::Failed(e) => {
                report_failure(console, "Unable to look up the flight schedule", e);
                console.say(RULE);
                return Ok(());
            }
        };

        match self.store.status_counts(flight_number).await {
            Ok(counts) => {
                let remaining = i64::from(schedule.capacity) - counts.occupied();
                console.say(&format!("Number of Remaining Seats: {}", remaining));
            }
            Err(e) => report_failure(console, "Unable to count reservations", e),
        }
        console.say(RULE);
        Ok(())
    }

    async fn passengers_by_status(&mut self) -> Result<()> {
        let console = &mut self.console;
        let flight_number = prompt::number(console, "Enter Flight Number: ").await?;
        let date = prompt::date(console, "Enter Date (yyyy-MM-dd): ").await?;

        console.say(RULE);
        console.say(&format!("Flight Number: {}", flight_number));
        console.say(&format!("Scheduled Date of Departure: {}", date));

        match booking::resolve_schedule(&self.store, console, flight_number, date).await? {
            Resolution::Scheduled(_) => {}
            Resolution::Aborted => {
                console.say(RULE);
                return Ok(());
            }
            Resolution::Failed(e) => {
                report_failure(console, "Unable to look up the flight schedule", e);
                console.say(RULE);
                return Ok(());
            }
        }

        match self.store.status_counts(flight_number).await {
            Ok(counts) => {
                for status in ReservationStatus::ALL {
                    console.say(&format!("Number of {} Seats: {}", status, counts.get(status)));
                }
            }
            Err(e) => report_failure(console, "Unable to count reservations", e),
        }
        console.say(RULE);
        Ok(())
    }

    async fn repairs_per_plane(&mut self) -> Result<()> {
        self.console.say("Number of Repairs per Plane:");
        match self.store.repairs_per_plane().await {
            Ok(rows) => {
                let rows: Vec<Vec<String>> = rows
                    .into_iter()
                    .map(|row| vec![row.plane_id.to_string(), row.repairs.to_string(), row.model])
                    .collect();
                for line in render_table(&["Plane ID", "Number of Repairs", "Model"], &rows) {
                    self.console.say(&line);
                }
            }
            Err(e) => report_failure(&mut self.console, "Unable to count repairs", e),
        }
        Ok(())
    }

    async fn repairs_per_year(&mut self) -> Result<()> {
        self.console.say("Number of Repairs per Year:");
        match self.store.repairs_per_year().await {
            Ok(rows) => {
                let rows: Vec<Vec<String>> = rows
                    .into_iter()
                    .map(|row| vec![row.year.to_string(), row.repairs.to_string()])
                    .collect();
                for line in render_table(&["Year", "Number of Repairs"], &rows) {
                    self.console.say(&line);
                }
            }
            Err(e) => report_failure(&mut self.console, "Unable to count repairs", e),
        }
        Ok(())
    }
}
