pub mod fill_ups;
pub mod odometer;
pub mod statistics;
pub mod vehicles;
