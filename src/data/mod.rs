//! Data layer: core types, loading, filtering, aggregation and export.
//!
//! Architecture:
//! ```text
//!  surgeries.csv (Latin-1)
//!        │
//!        ▼
//!   ┌──────────┐     ┌───────┐
//!   │  loader   │ ◄── │ cache │  path + mtime → Arc<Dataset>
//!   └──────────┘     └───────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  Selection → FilteredView
//!   └──────────┘
//!        │
//!        ├──────────────┬──────────────┬────────────┐
//!        ▼              ▼              ▼            ▼
//!   ┌───────────┐  ┌─────────┐  ┌───────────┐  ┌────────┐
//!   │ aggregate  │  │  stats  │  │    geo    │  │ export │
//!   └───────────┘  └─────────┘  └───────────┘  └────────┘
//!   sums, ranks,    fences,      county join,    CSV bytes
//!   pivot           densities    hospital points
//! ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod model;
pub mod stats;

pub use error::DataError;
