pub mod gate;
pub mod handlers;
