//! sms-threads — SMS conversation list, threads and sending over a device
//! messaging backend.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod sms;
pub mod views;
