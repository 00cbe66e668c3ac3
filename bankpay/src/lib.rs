#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the Bankpay merchant API.
//!
//! This crate provides the typed data-model and caching layer used by the
//! Bankpay integration: validated, immutable domain models hydrated from
//! the gateway's loosely-typed JSON, homogeneous typed collections, a
//! TTL-based read-through cache, and the bearer-token lifecycle for the
//! gateway's JSON-token auth scheme. The HTTP transport lives in the
//! companion `bankpay-http` crate.
//!
//! # Overview
//!
//! A repository call first consults its cache; on a miss it fetches raw
//! structural data from the gateway, hydrates it into a typed model or
//! collection via [`convert`], writes the result back with the configured
//! TTL, and returns it. Authenticated calls go through
//! [`auth::ensure_token`], which exchanges credentials whenever the held
//! token is absent or expired.
//!
//! # Modules
//!
//! - [`auth`] - Bearer-token lifecycle and credential configuration
//! - [`cache`] - TTL-based, type-tagged cache wrapper and backends
//! - [`collection`] - Homogeneous ordered collections of models
//! - [`config`] - Merchant configuration with environment expansion
//! - [`convert`] - Hydration of untyped JSON into typed models
//! - [`error`] - The SDK's error taxonomy
//! - [`model`] - Base contract for immutable, validating records
//! - [`models`] - Domain models (stores, orders, customers, money)
//! - [`repository`] - Read-through repositories over the cache
//! - [`timestamp`] - Unix-second time base
//! - [`validate`] - Field-level validation predicates
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation at cache-miss and
//!   degraded-write sites

pub mod auth;
pub mod cache;
pub mod collection;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod models;
pub mod repository;
pub mod timestamp;
pub mod validate;
