pub mod alerts;
pub mod config;
pub mod enrichment;
pub mod geodesy;
pub mod history;
pub mod model;
pub mod monitor;
pub mod replay;
