//! SeaORM entities backing the tickets domain.

pub mod event;
pub mod registration;
pub mod ticket;
