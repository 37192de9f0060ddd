pub mod calendar;
pub mod navigator;
pub mod notify;
pub mod session;
pub mod slots;
pub mod validation;
