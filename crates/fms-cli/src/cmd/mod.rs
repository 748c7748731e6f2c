pub mod login;
pub mod serve;
pub mod tasks;
