pub mod clock;
pub mod event;
pub mod level;
pub mod session;
pub mod step;
