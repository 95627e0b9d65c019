//! Courseloom - Course Marketplace Backend
//!
//! This crate implements the enrollment, checkout, and payment
//! reconciliation core of a course marketplace.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
