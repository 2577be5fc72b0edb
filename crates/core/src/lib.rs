//! # Chairbook Core
//!
//! Domain logic for barbershop appointment booking: minute-granularity time
//! primitives, the pure availability engine, and the appointment lifecycle
//! manager. Persistence and the wall clock are reached only through the
//! traits in [`repository`] and [`clock`], so everything here can be tested
//! without a database.

pub mod agenda;
pub mod availability;
pub mod clock;
pub mod errors;
pub mod lifecycle;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod time;
