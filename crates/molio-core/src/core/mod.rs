//! # Core Module
//!
//! Stateless building blocks of molio: the error taxonomy shared by every
//! layer, the unit cell geometry and the minimal frame model that carries a
//! cell.
//!
//! - [`cell`] - Periodic simulation boxes, their parameterizations and the
//!   minimum image convention
//! - [`frame`] - Frames and the [`frame::CellProvider`] access trait
//! - [`error`] - The [`error::Error`] type and its [`error::ErrorKind`]
//!   classification
//! - [`utils`] - Small geometry helpers

pub mod cell;
pub mod error;
pub mod frame;
pub mod utils;
