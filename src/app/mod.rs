mod banner;
mod progress;
mod runner;
pub(crate) mod summary;


pub(crate) use banner::print_banner;
pub(crate) use runner::{RunReport, run_load};
pub(crate) use summary::print_summary;

pub(crate) const SEPARATOR: &str = "══════════════════════════════════════════";
