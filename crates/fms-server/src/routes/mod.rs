pub mod action;
pub mod checkin;
pub mod fields;
pub mod health;
pub mod tasks;
pub mod upload;
