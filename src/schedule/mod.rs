//! Scheduling core: the validation rules, the mutation engine that
//! enforces the hard checks and the leave cascade, and the per-branch
//! locks that serialize writes.

mod bulk;
mod engine;
mod locks;
pub mod validator;

#[cfg(test)]
pub(crate) mod testutil;

pub use engine::ScheduleEngine;
