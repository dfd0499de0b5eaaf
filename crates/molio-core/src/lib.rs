//! # molio Core Library
//!
//! The geometric core and logging sink of the molio molecular file library.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless value types: the periodic
//!   [`UnitCell`](core::cell::UnitCell) with its three shapes, the minimal
//!   [`Frame`](core::frame::Frame) carrying a cell, and the
//!   [`Error`](core::error::Error) taxonomy shared by every layer.
//!
//! - **[`logging`]: The Sink.** The single process-wide logger receiving every
//!   diagnostic, configurable at runtime or from a TOML document.
//!
//! The C interface lives in the separate `molio-ffi` crate, which turns the
//! errors of this crate into status codes.

pub mod core;
pub mod logging;

pub use crate::core::cell::{CellShape, UnitCell};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::frame::{CellProvider, Frame};
pub use logging::{LogLevel, LogTarget, LoggingConfig};
