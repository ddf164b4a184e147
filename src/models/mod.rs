pub mod availability;
pub mod booking;
pub mod event;

pub use availability::{OverlapResult, UnavailableRange};
pub use booking::{Booking, BookingStatus, BookingSubmission};
pub use event::{BookingEvent, BookingEventKind};
