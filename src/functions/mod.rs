mod build_plan;
mod download_file;
mod extract_file;
mod fetch_manifest;
mod flow;
mod get_hash;

pub(crate) use build_plan::build_plan;
pub(crate) use download_file::{download_file, user_agent};
pub(crate) use extract_file::extract_file;
pub(crate) use fetch_manifest::{fetch_manifest, parse_manifest};
pub(crate) use flow::flow;
pub(crate) use get_hash::get_hash;
