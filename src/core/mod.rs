// src/core/mod.rs

pub mod fields;
pub mod html;
pub mod net;
pub mod sanitize;

pub use net::{Fetch, HttpClient, StaticFetch};
