//! Site generation for vitae.
//!
//! This crate ties together content loading, bibliography selection,
//! templating, and output writing into the end-to-end [`pipeline::generate_site`].

pub mod content;
pub mod context;
pub mod pipeline;
pub mod publications;
pub mod render;
pub mod writer;
