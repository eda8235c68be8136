//! Request and response types for the THORNode endpoints

pub mod inbound;
pub mod quote;
pub mod stages;
