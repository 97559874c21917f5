//! adjust_moment — core library for the AdJustMoment playback experiment.
//!
//! Pre-scheduled ad clips cut into a main video, and the viewer picks one of
//! two ways to push back: snooze an ad's insertion point, or bank the ad as
//! debt and pay it off later. All decision logic lives here; the CLI and any
//! UI shell consume this crate and own the actual media playback.

pub mod app_core;
pub mod catalog;
pub mod debt;
pub mod error;
pub mod mode;
pub mod schedule;
pub mod session;
pub mod simulate;
pub mod snooze;
pub mod store;
