// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Pinpoly application.

pub mod canvas;
pub mod sidebar;
