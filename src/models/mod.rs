// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Core data model: annotations, labels, and the undo/redo history.

pub mod annotation;
pub mod history;
pub mod label;
