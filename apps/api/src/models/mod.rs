pub mod admin;
pub mod application;
pub mod inquiry;
pub mod job;
