//! Prediction Backend API

mod client;

pub use client::*;
