pub mod capability;
#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod constants;
pub mod controller;
#[cfg(feature = "desktop")]
mod desktop;
pub mod error;
pub mod events;
pub mod models;
pub mod monitor;
pub mod overlay;
pub mod platform;
pub mod sampler;
mod sync;
#[cfg(test)]
mod test_utils;
pub mod validation;

#[cfg(feature = "desktop")]
pub use desktop::run;
