#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP transport for the Bankpay merchant API.
//!
//! Two collaborators for the `bankpay` core: [`client::ApiClient`], a thin
//! reqwest wrapper that attaches bearer credentials and maps non-2xx
//! responses to the structured gateway error body, and
//! [`auth::AuthClient`], the credential-exchange implementation of
//! [`bankpay::auth::TokenExchanger`].
//!
//! The core treats both as synchronous-looking calls that either return
//! parsed JSON or fail with a typed error; retry and backoff policy is
//! deliberately not implemented here.

pub mod auth;
pub mod client;
