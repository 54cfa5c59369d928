// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Shared utility functions.

pub mod color;
pub mod geometry;
