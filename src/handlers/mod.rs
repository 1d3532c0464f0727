// src/handlers/mod.rs
pub mod lobby;
pub mod mutation;
pub mod servers;
pub mod status;
