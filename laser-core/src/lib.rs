#![no_std]

// Portable control logic for the fibre-laser front-panel controller.
//
// This crate stays portable across MCU firmware and host tooling by avoiding
// the Rust standard library; the firmware and the emulator both drive the
// same mode state machine through the capability traits in [`port`].

pub mod controller;
pub mod encoders;
pub mod mode;
pub mod port;
pub mod pulse;
pub mod sequences;
pub mod signals;
pub mod status;
