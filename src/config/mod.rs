//! JSON configuration for the demo tools.

pub mod refine_demo;
