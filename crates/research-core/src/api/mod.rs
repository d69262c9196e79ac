//! API implementation submodules.
//!
//! Each submodule contains `impl ResearchApi` blocks that extend the public
//! API with one source's queries. The struct definition remains in `lib.rs`.

mod builder;
mod cache;
mod devto;
mod google;
mod read_through;
mod reddit;
mod youtube;

pub use builder::ResearchApiBuilder;
