// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Domain services.

pub mod lifecycle;
pub mod planner;

pub use lifecycle::SessionLifecycle;
pub use planner::PlanGenerator;
