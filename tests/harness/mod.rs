// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for crawler simulation.
//!
//! This module provides utilities for driving simulated crawlers through
//! the maze to validate throttling and maze stability end to end.

pub mod crawler;
pub mod generators;
pub mod metrics;
