// EMS dashboard service: history charts, live widgets and environment records
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
