//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-process storage for tests and local runs
//! - `postgres` - Bookings and membership codes in PostgreSQL
//! - `razorpay` - Payment gateway client
//! - `recovery` - Recovery log file
//! - `redis` - Registration drafts
//! - `email` - Receipt rendering and delivery
//! - `http` - REST API

pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod razorpay;
pub mod recovery;
pub mod redis;
