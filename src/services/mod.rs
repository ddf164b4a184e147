pub mod availability;
pub mod booking;
pub mod calendar;
pub mod events;
pub mod notify;
pub mod overlap;
