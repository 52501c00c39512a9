// Domain layer - Core types with no I/O
pub mod channel;
pub mod chart;
pub mod environment;
pub mod error;
pub mod i18n;
pub mod number_format;
pub mod tariff;
pub mod timeseries;
pub mod widget;
