//! Attendance day machine
//!
//! Each (employee, day) pair walks through at most two transitions:
//! no record, then an arrival, then a departure. A check-in call after the
//! departure is a warning no-op, never an error and never a mutation.

use chrono::NaiveTime;

/// State of one employee's attendance for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    NoRecord,
    Arrived,
    Departed,
}

impl DayState {
    /// Derive the day state from the stored record, if any
    pub fn from_record(record: Option<(NaiveTime, Option<NaiveTime>)>) -> Self {
        match record {
            None => DayState::NoRecord,
            Some((_, None)) => DayState::Arrived,
            Some((_, Some(_))) => DayState::Departed,
        }
    }
}

/// What a check-in call should do for the current day state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Create the record with the arrival timestamp
    RecordArrival,
    /// Set the departure timestamp
    RecordDeparture,
    /// The day is complete; report a warning and change nothing
    AlreadyDeparted,
}

/// Decide the effect of a check-in call given the current day state
pub fn check(state: DayState) -> CheckOutcome {
    match state {
        DayState::NoRecord => CheckOutcome::RecordArrival,
        DayState::Arrived => CheckOutcome::RecordDeparture,
        DayState::Departed => CheckOutcome::AlreadyDeparted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_first_call_records_arrival() {
        let state = DayState::from_record(None);
        assert_eq!(state, DayState::NoRecord);
        assert_eq!(check(state), CheckOutcome::RecordArrival);
    }

    #[test]
    fn test_second_call_records_departure() {
        let state = DayState::from_record(Some((at(8, 55), None)));
        assert_eq!(state, DayState::Arrived);
        assert_eq!(check(state), CheckOutcome::RecordDeparture);
    }

    #[test]
    fn test_third_call_is_a_warning_no_op() {
        let state = DayState::from_record(Some((at(8, 55), Some(at(17, 30)))));
        assert_eq!(state, DayState::Departed);
        assert_eq!(check(state), CheckOutcome::AlreadyDeparted);
    }
}
