// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — flowing-text and positioned-form report pages.

pub mod writer;

pub use writer::{FormText, PdfWriter};
