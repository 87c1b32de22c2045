pub mod dashboard;
pub mod setup;
pub mod status;
pub mod ui;
pub mod watch;
