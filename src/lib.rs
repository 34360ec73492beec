//! RxHub Library
//!
//! Patient hub calculators and the contact form workflow of the pharmacy
//! website, plus the MCP service that exposes them.

pub mod build_info;
pub mod calculators;
pub mod config;
pub mod contact;
pub mod mcp;
pub mod site;
pub mod tools;
