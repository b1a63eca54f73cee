// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod fantasy;
pub mod mapper;
pub mod nhl;
pub mod scoring;
pub mod search;
pub mod session;
pub mod tree;
pub mod upstream;
pub mod xml;

pub use fantasy::FantasyService;
pub use nhl::NhlService;
pub use search::SearchService;
pub use session::SessionService;
pub use upstream::{TokenResponse, UpstreamClient};
