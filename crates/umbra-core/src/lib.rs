//! Umbra Core Types and Definitions
//!
//! This crate provides the in-memory model that Umbra persists. It includes:
//!
//! - **Identifiers**: Opaque element ids ([`identifier::Id`])
//! - **Geometry**: Points and affine matrices ([`geometry`] module)
//! - **Modeling**: Element class descriptors and modeling languages ([`modeling`] module)
//! - **Elements**: The element factory and its records ([`factory`], [`element`] modules)
//! - **Diagrams**: Presentation items, handles, ports ([`diagram`] module)
//! - **Connections**: Per-diagram handle connections ([`connections`] module)

pub mod connections;
pub mod diagram;
pub mod element;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod identifier;
pub mod modeling;
