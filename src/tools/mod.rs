//! RxHub Tools module
//!
//! MCP tool implementations for the patient hub.

pub mod calculators;
pub mod contact;
pub mod pages;
pub mod status;
