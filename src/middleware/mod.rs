// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules.

pub mod session;

pub use session::{require_session, UserSession, SESSION_HEADER};
