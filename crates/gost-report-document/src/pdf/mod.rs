// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — rasterized export of the rendered preview, plus read-back.

pub mod images;
pub mod offscreen;
pub mod projector;
pub mod raster;
pub mod reader;
pub mod surface;
pub mod writer;

pub use images::{HttpFetcher, ImageFetcher, LoadedImages, OfflineFetcher};
pub use projector::PdfProjector;
pub use reader::PdfReader;
pub use surface::{FontSurface, RenderSurface, WireframeSurface};
pub use writer::PdfWriter;
