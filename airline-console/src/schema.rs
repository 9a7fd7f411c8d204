diesel::table! {
    plane (id) {
        id -> Int4,
        make -> Varchar,
        model -> Varchar,
        age -> Int4,
        seats -> Int4,
    }
}

diesel::table! {
    pilot (id) {
        id -> Int4,
        fullname -> Varchar,
        nationality -> Varchar,
    }
}

diesel::table! {
    flight (fnum) {
        fnum -> Int4,
        cost -> Int4,
        num_sold -> Int4,
        num_stops -> Int4,
        actual_departure_date -> Timestamp,
        actual_arrival_date -> Timestamp,
        arrival_airport -> Varchar,
        departure_airport -> Varchar,
    }
}

diesel::table! {
    flightinfo (fiid) {
        fiid -> Int4,
        flight_id -> Int4,
        pilot_id -> Int4,
        plane_id -> Int4,
    }
}

diesel::table! {
    schedule (id) {
        id -> Int4,
        flightnum -> Int4,
        departure_time -> Timestamp,
        arrival_time -> Timestamp,
    }
}

diesel::table! {
    technician (id) {
        id -> Int4,
        full_name -> Varchar,
    }
}

diesel::table! {
    reservation (rnum) {
        rnum -> Int4,
        cid -> Int4,
        fid -> Int4,
        status -> Bpchar,
    }
}

diesel::table! {
    repairs (rid) {
        rid -> Int4,
        repair_date -> Date,
        plane_id -> Int4,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    plane,
    pilot,
    flight,
    flightinfo,
    schedule,
    technician,
    reservation,
    repairs,
);
