pub mod application;
pub mod internship;
pub mod user;
