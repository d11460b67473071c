// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session lifecycle for the dashboard client.
//!
//! ## Auth Flow
//!
//! 1. The user signs in with email/password, or with a phone one-time code
//! 2. The identity service returns an access/refresh token pair
//! 3. The client:
//!    - Decodes the access token payload (no signature check; the backend
//!      verifies tokens on every request)
//!    - Extracts:
//!      - `user_id` → canonical user id
//!      - `client_ids` → tenant id
//!    - Persists the resulting [`SessionRecord`](crate::models::SessionRecord)
//!      under the `auth_data` key
//! 4. Protected screens consult the [`RouteGate`], which asks the
//!    [`SessionGuard`] whether the stored token's `exp` is still in the future
//!
//! Expired sessions are not cleared automatically and there is no refresh
//! flow. Logout removes the stored record.

pub mod claims;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod route_gate;

pub use claims::{decode_token, Claims, DecodeError};
pub use error::AuthError;
pub use gateway::{AuthGateway, OtpVerification};
pub use guard::SessionGuard;
pub use route_gate::{GateDecision, RouteGate};
