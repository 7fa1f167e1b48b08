//! Pure simulation logic for Pixel Legion.
//!
//! This crate holds everything about pixel groups that is independent of the
//! ECS world and of any random source: planar geometry, the convex hull
//! engine, faction rules, attack tracers and configuration. Functions take
//! plain data and return results, so they are unit-testable on their own.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`color`] | RGB colors and team palette |
//! | [`config`] | `SimConfig` sections, JSON loading, validation |
//! | [`constants`] | Default tuning values |
//! | [`faction`] | Owner → team mapping, hostility |
//! | [`geometry`] | `Vec2`, axis-aligned `Bounds` |
//! | [`hull`] | Monotone-chain hull, padded expansion, cached geometry |
//! | [`projectile`] | Attack tracer events |

pub mod color;
pub mod config;
pub mod constants;
pub mod faction;
pub mod geometry;
pub mod hull;
pub mod projectile;
