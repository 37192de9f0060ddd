use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::models::{
    BookingLedger, BookingRequest, CalendarDate, RequesterDetails, RuleSet, SelectionState,
    TimeOfDay, WizardStep,
};
use crate::services::navigator::{self, CalendarNavigator, MonthView};
use crate::services::slots::{self, DaySlots};
use crate::services::validation::RequesterValidator;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("please select both a date and a time")]
    IncompleteSelection,

    #[error("{0} is not an available date")]
    IneligibleDate(CalendarDate),

    #[error("invalid details: {}", .0.join(", "))]
    ValidationError(Vec<String>),

    #[error("{time} on {date} was booked in the meantime, please pick another slot")]
    StaleSelection { date: CalendarDate, time: TimeOfDay },

    #[error("cannot {action} while {current}", current = .step.as_str())]
    WrongStep {
        action: &'static str,
        step: WizardStep,
    },
}

/// One user's walk through the booking wizard.
///
/// Owns its navigator and selection, so any number of sessions can exist
/// side by side. Nothing here performs I/O: the ledger is passed in by the
/// caller and the finished [`BookingRequest`] is handed back out.
#[derive(Debug, Clone)]
pub struct BookingSession {
    rules: Arc<RuleSet>,
    navigator: CalendarNavigator,
    selection: SelectionState,
    day_slots: Option<DaySlots>,
    confirmed: Option<BookingRequest>,
    pub last_activity: NaiveDateTime,
}

/// Everything a presentation layer needs to draw the wizard.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub step: WizardStep,
    pub selected_date: Option<CalendarDate>,
    pub selected_time: Option<TimeOfDay>,
    pub month: MonthView,
    pub day_slots: Option<DaySlots>,
    pub confirmed: Option<BookingRequest>,
}

impl BookingSession {
    pub fn new(rules: Arc<RuleSet>, today: CalendarDate) -> Self {
        Self {
            rules,
            navigator: CalendarNavigator::starting_at(today),
            selection: SelectionState::new(),
            day_slots: None,
            confirmed: None,
            last_activity: Utc::now().naive_utc(),
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn step(&self) -> WizardStep {
        self.selection.step
    }

    pub fn day_slots(&self) -> Option<&DaySlots> {
        self.day_slots.as_ref()
    }

    pub fn navigator(&self) -> &CalendarNavigator {
        &self.navigator
    }

    pub fn month_view(&self, today: CalendarDate) -> MonthView {
        self.navigator.view(today, &self.rules)
    }

    pub fn snapshot(&self, today: CalendarDate) -> SessionSnapshot {
        SessionSnapshot {
            step: self.selection.step,
            selected_date: self.selection.selected_date,
            selected_time: self.selection.selected_time,
            month: self.month_view(today),
            day_slots: self.day_slots.clone(),
            confirmed: self.confirmed.clone(),
        }
    }

    fn require_step(
        &self,
        expected: WizardStep,
        action: &'static str,
    ) -> Result<(), SelectionError> {
        if self.selection.step != expected {
            return Err(SelectionError::WrongStep {
                action,
                step: self.selection.step,
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.last_activity = Utc::now().naive_utc();
    }

    pub fn next_month(&mut self) -> Result<(), SelectionError> {
        self.require_step(WizardStep::Choosing, "change month")?;
        self.navigator.advance_month();
        self.reset_selection();
        Ok(())
    }

    pub fn prev_month(&mut self) -> Result<(), SelectionError> {
        self.require_step(WizardStep::Choosing, "change month")?;
        self.navigator.retreat_month();
        self.reset_selection();
        Ok(())
    }

    fn reset_selection(&mut self) {
        self.selection.clear();
        self.day_slots = None;
        self.touch();
    }

    pub fn select_date(
        &mut self,
        date: CalendarDate,
        today: CalendarDate,
        ledger: &BookingLedger,
    ) -> Result<&DaySlots, SelectionError> {
        self.require_step(WizardStep::Choosing, "select a date")?;
        if !navigator::is_eligible(date, today, &self.rules) {
            return Err(SelectionError::IneligibleDate(date));
        }

        if self.selection.selected_date != Some(date) || self.day_slots.is_none() {
            self.selection.selected_date = Some(date);
            self.selection.selected_time = None;
            self.navigator.show(date);
            tracing::debug!(date = %date, "date selected");
        }
        self.touch();

        let day_slots: &DaySlots = self
            .day_slots
            .insert(slots::generate(date, &self.rules, ledger));
        // A kept time may have been taken since it was chosen.
        if let Some(time) = self.selection.selected_time {
            if day_slots.find(time).map_or(true, |slot| slot.is_booked) {
                self.selection.selected_time = None;
            }
        }
        Ok(day_slots)
    }

    pub fn select_time(
        &mut self,
        time: TimeOfDay,
        ledger: &BookingLedger,
    ) -> Result<(), SelectionError> {
        self.require_step(WizardStep::Choosing, "select a time")?;
        let (Some(date), Some(day_slots)) = (self.selection.selected_date, &self.day_slots) else {
            return Err(SelectionError::InvalidSelection(
                "select a date first".to_string(),
            ));
        };

        match day_slots.find(time) {
            None => {
                return Err(SelectionError::InvalidSelection(format!(
                    "{time} is not offered on {date}"
                )))
            }
            Some(slot) if slot.is_booked || ledger.is_booked(date, time) => {
                return Err(SelectionError::InvalidSelection(format!(
                    "{time} on {date} is already booked"
                )))
            }
            Some(_) => {}
        }

        self.selection.selected_time = Some(time);
        self.touch();
        tracing::debug!(date = %date, time = %time, "time selected");
        Ok(())
    }

    pub fn advance(&mut self) -> Result<(), SelectionError> {
        self.require_step(WizardStep::Choosing, "continue")?;
        let (Some(date), Some(time)) = (self.selection.selected_date, self.selection.selected_time)
        else {
            return Err(SelectionError::IncompleteSelection);
        };
        let booked = self
            .day_slots
            .as_ref()
            .and_then(|day| day.find(time))
            .map_or(true, |slot| slot.is_booked);
        if booked {
            return Err(SelectionError::InvalidSelection(format!(
                "{time} on {date} is already booked"
            )));
        }
        self.selection.step = WizardStep::Details;
        self.touch();
        Ok(())
    }

    /// Returns to an earlier step, keeping the chosen date and time.
    pub fn go_back(&mut self, target: WizardStep) -> Result<(), SelectionError> {
        let current = self.selection.step;
        if current == WizardStep::Confirmed || target >= current {
            return Err(SelectionError::WrongStep {
                action: "go back",
                step: current,
            });
        }
        self.selection.step = target;
        self.touch();
        Ok(())
    }

    /// Finalizes the booking after validating `details` and re-checking the
    /// slot against the latest `ledger`.
    pub fn submit(
        &mut self,
        details: RequesterDetails,
        validator: &dyn RequesterValidator,
        ledger: &BookingLedger,
    ) -> Result<BookingRequest, SelectionError> {
        self.require_step(WizardStep::Details, "submit")?;
        let (Some(date), Some(time)) = (self.selection.selected_date, self.selection.selected_time)
        else {
            return Err(SelectionError::IncompleteSelection);
        };

        validator
            .validate(&details)
            .map_err(SelectionError::ValidationError)?;

        if ledger.is_booked(date, time) {
            return Err(SelectionError::StaleSelection { date, time });
        }

        let request = BookingRequest {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            time,
            requester: RequesterDetails {
                name: details.name.trim().to_string(),
                email: details.email.trim().to_string(),
                role: details.role.trim().to_string(),
            },
            created_at: Utc::now().naive_utc(),
        };

        self.selection.step = WizardStep::Confirmed;
        self.confirmed = Some(request.clone());
        self.touch();
        Ok(request)
    }
}
