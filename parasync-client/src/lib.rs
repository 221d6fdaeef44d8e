//! # parasync-client
//!
//! Blocking client for the Paratranz translation API.
//!
//! [`ParatranzClient`] lists a project's files and turns each file's
//! translation entries into the localized JSON document written to the
//! output directory (see [`render`]).

mod client;
mod http;
pub mod render;

pub use client::{FileInfo, ParatranzClient};
