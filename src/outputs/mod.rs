//! Output generation for the published document.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`OutputDocument`](crate::models::OutputDocument) to `data.json`
//!
//! # Output Structure
//!
//! ```text
//! data.json
//! ├── updated       "2025-05-06 05:30 UTC"
//! ├── updated_kst   "2025-05-06 14:30 KST"
//! ├── stocks        { "TSLA": {price, change_pct, currency, name, flag}, ... }
//! └── news          { "unreal": [article, ...], ... }
//! ```

pub mod json;
