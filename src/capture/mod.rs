//! Screen capture.
//!
//! This module provides:
//! - The `ScreenSource` seam the pipeline captures through
//! - Primary monitor capture (`PrimaryMonitor`)
//! - Replay of saved screenshots (`ImageFile`)

pub mod screenshot;

pub use screenshot::{ImageFile, PrimaryMonitor, ScreenSource};
