#![no_std]

#[macro_use]
mod log;

mod error;

pub mod bridge;
pub mod bus;
pub mod config;
pub mod hal;
pub mod interface;
pub mod params;
pub mod registers;

#[cfg(test)]
mod sim;

pub use crate::bridge::SignalBridge;
pub use crate::bus::BusController;
pub use crate::error::{Error, Result};
