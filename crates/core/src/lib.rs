//! Core library: review queue, upload flow, gallery, map clusters, shell state.

pub mod api;
pub mod config;
pub mod debounce;
pub mod gallery;
pub mod images;
pub mod notice;
pub mod queue;
pub mod review;
pub mod session;
pub mod shell;
pub mod sightings;
pub mod upload;
