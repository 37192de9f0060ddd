use serde::{Deserialize, Serialize};

use crate::models::calendar::{CalendarDate, TimeOfDay};

/// Wizard position. Ordering follows the flow, so `Choosing < Details`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Choosing,
    Details,
    Confirmed,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Choosing => "choosing",
            WizardStep::Details => "details",
            WizardStep::Confirmed => "confirmed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub selected_date: Option<CalendarDate>,
    pub selected_time: Option<TimeOfDay>,
    pub step: WizardStep,
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            selected_date: None,
            selected_time: None,
            step: WizardStep::Choosing,
        }
    }

    pub fn clear(&mut self) {
        self.selected_date = None;
        self.selected_time = None;
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}
