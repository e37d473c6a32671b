// src/ui/widgets/mod.rs

pub mod analysis_view; // Report JSON, scrollable.
pub mod footer;
pub mod header;
pub mod input; // Popup used to edit the target and the API key.
pub mod menu;
pub mod summary; // Session state and raised flags.
