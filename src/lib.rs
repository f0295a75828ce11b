//! Catalog Lens: load a video-catalog CSV, filter it, and summarise it for
//! the dashboard front-end.
//!
//! The data layer is UI-free: [`data::dashboard::compute`] turns an owned
//! [`Catalog`] and a [`FilterSelection`] into a [`DashboardResults`] bundle.

pub mod config;
pub mod data;

pub use config::DashboardConfig;
pub use data::dashboard::{
    compute, compute_with, CatalogTables, DashboardOptions, DashboardResults,
};
pub use data::error::{LoadError, ParseError};
pub use data::filter::{CountryMatch, FilterSelection};
pub use data::loader::load_source;
pub use data::model::{Catalog, CatalogRow, ContentType};
