//! Test utilities for scene engine tests.
//!
//! Provides a scripted completion provider that can delay, fail or return
//! empty text for chosen scenes.

pub mod mock_provider;

#[allow(unused_imports)]
pub use mock_provider::ScriptedProvider;

/// The three-beat story used across the end-to-end tests.
#[allow(dead_code)]
pub const RAJU_STORY: &str = "Raju sits on the roof watching stars. A bright light descends. \
                              The light becomes a fairy who reaches out her hand.";
