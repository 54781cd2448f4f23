//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces and the click pipeline,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_recorder`] - Non-blocking producer side of the click queue
//! - [`click_worker`] - Asynchronous click processing worker
//! - [`user_agent`] - Device, browser and OS classification
//! - [`analytics`] - Time-series and categorical click aggregation
//!
//! # Click Processing Flow
//!
//! 1. The resolver increments the link's click count
//! 2. A [`click_event::ClickEvent`] is queued via [`click_recorder::ClickRecorder`]
//! 3. The HTTP response is sent without waiting for the event
//! 4. [`click_worker::run_click_worker`] classifies and persists it via
//!    [`repositories::ClickRepository`]

pub mod analytics;
pub mod click_event;
pub mod click_recorder;
pub mod click_worker;
pub mod entities;
pub mod repositories;
pub mod user_agent;
