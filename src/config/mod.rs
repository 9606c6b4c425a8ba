//! Configuration module for Kort.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    GeneralSettings, RateLimitSettings, ServerSettings, Settings, SummarySettings,
    YoutubeSettings,
};
