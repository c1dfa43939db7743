// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — boundary detection, perspective rectification, corner
// handle conversion, and post-rectification enhancement.

pub mod detect;
pub mod enhance;
pub mod points;
pub mod rectify;

pub use detect::GeometryDetector;
pub use enhance::ScanEnhancer;
pub use points::PointFormatConverter;
pub use rectify::{PerspectiveRectifier, RectifiedImage};
