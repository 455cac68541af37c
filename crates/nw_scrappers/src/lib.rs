pub mod profiles;
pub mod runner;

pub use profiles::{builtin_profiles, find_profile, SelectorProfile};
pub use runner::ScrapeRunner;

pub mod prelude {
    pub use super::profiles::{builtin_profiles, SelectorProfile};
    pub use super::runner::ScrapeRunner;
    pub use nw_core::{Article, Error, Result};
}
