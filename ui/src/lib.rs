//! Shared UI crate for normplot. Core plotting logic and the cross-platform
//! views live here; the `web` and `desktop` crates only add routing shells.

pub mod core;
pub mod i18n;
pub mod plotter;
pub mod views;

pub mod components {
    // Localized application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
