//! Bagy Bridge Core - payload models and catalog translation.
//!
//! This crate contains everything that does not touch the network:
//! - [`bagy`] - loosely-typed models for inbound Bagy webhook payloads
//! - [`shopify`] - Shopify Admin REST product bodies
//! - [`options`] - flattening of variation attributes into option axes
//! - [`variants`] - mapping of variations onto the flattened axes
//! - [`translate`] - assembly of the full Shopify product representation
//!
//! # Architecture
//!
//! Translation is pure: a [`bagy::SourceProduct`] goes in, a
//! [`shopify::Product`] comes out, and nothing here performs I/O. The server
//! crate owns the HTTP boundaries on both sides.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bagy;
pub mod options;
pub mod shopify;
pub mod translate;
pub mod variants;
