//! Yatra Booking - Pilgrimage tour registration service
//!
//! Prices travel packages, manages single-use membership codes and
//! reconciles gateway payments into booking rows.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
