pub mod builtin;
pub mod profile;
pub mod registry;

pub use profile::{DateStrategy, SelectorRules, SiteProfile, UrlStrategy};
pub use registry::SiteRegistry;
