// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: image loading, annotation data files, raster export.

pub mod export;
pub mod media;
pub mod serialization;
