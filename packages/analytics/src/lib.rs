#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data-preparation pipeline for the seizure dashboard.
//!
//! Loaded records are joined onto the unit reference table ([`join`]),
//! narrowed by a [`FilterState`](seizure_map_analytics_models::FilterState)
//! ([`filter`]) and reduced to chart series and map positions
//! ([`aggregate`]). [`dataset::Dataset`] ties the steps together and holds
//! the filter defaults computed at load time. Every function here is pure.

pub mod aggregate;
pub mod dataset;
pub mod filter;
pub mod join;
pub mod markers;

pub use dataset::Dataset;
