//! Interchangeable ways of computing `n!`.
//!
//! Every strategy takes the same input, returns the same exact
//! [`BigUint`](num_bigint::BigUint) and fails the same way on bad input.
//! Pick one through [`Strategy`] and [`factorial`], or call the per-strategy
//! functions directly.

pub mod check;
pub mod dispatch;
mod error;
pub mod hall_of_shame;
pub mod lazy;
pub mod parallel;
pub mod partition;
mod request;
pub mod sequential;
mod spawn;
mod strategy;
pub mod trampoline;

#[cfg(test)]
mod test;

pub use error::FactorialError;
pub use lazy::{lazy_sequence, Deferred, Factorial, FactorialBuilder, LazyFactorials, ValueComputer};
pub use partition::{partition, Partition};
pub use request::{FactorialRequest, ParallelConfig};
pub use strategy::{factorial, factorial_with, Strategy, UnknownStrategy};
