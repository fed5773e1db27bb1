//! Stored entities.

pub mod employee;
pub mod product;

pub use employee::Employee;
pub use product::Product;
