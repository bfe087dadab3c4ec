//! Vehicle controllers.

mod pid;

pub use pid::LongitudinalPid;
