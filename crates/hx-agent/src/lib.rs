//! `hx-agent` — bot state and registry storage for the hexfront simulation.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`bot`]   | `Bot` struct, `AiState`, `DamageState`, fade + turret     |
//! | [`store`] | `BotStore` (id-indexed registry) and `BotRngs`            |
//!
//! # Design notes
//!
//! Bots are plain structs in an id-indexed `Vec` rather than SoA arrays:
//! the tick loop is single-threaded by contract, every subsystem touches a
//! different overlapping subset of fields, and the schema is closed.
//! Coordinators and population accounting reference bots only by [`BotId`];
//! slots are tombstoned (`removed = true`), never reused, so an id stays
//! valid for the simulation's lifetime.
//!
//! [`BotId`]: hx_core::BotId

pub mod bot;
pub mod store;


pub use bot::{AiState, Bot, DamageState, FadePhase, FadeState, FadeStep, TurretSpring};
pub use store::{BotRngs, BotStore};
