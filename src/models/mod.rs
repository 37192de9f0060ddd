pub mod booking;
pub mod calendar;
pub mod ledger;
pub mod rules;
pub mod selection;

pub use booking::{Booking, BookingRequest, BookingStatus, RequesterDetails};
pub use calendar::{CalendarDate, ParseError, TimeOfDay};
pub use ledger::BookingLedger;
pub use rules::{RuleError, RuleSet, SlotRule, WeekdayRule};
pub use selection::{SelectionState, WizardStep};
