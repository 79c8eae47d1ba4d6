pub mod connection;
pub mod roster;
