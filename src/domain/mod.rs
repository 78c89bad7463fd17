//! Domain model: aggregates, value objects, pricing rules, and cart events.
pub mod aggregates;
pub mod events;
pub mod pricing;
pub mod value_objects;
