//! Convenience re-exports for building reports.
//!
//! ```ignore
//! use reportkit::prelude::*;
//! ```

pub use crate::error::ReportError;
pub use crate::html::{
    APPEND_METHOD, CONTENT_POPUP, ContentOptions, HtmlServerReport, InsertMethod, REPLACE_METHOD,
    ReportContent, ReportContentRecord,
};
pub use crate::markup::{MarkupDocument, MarkupNode};
pub use crate::report::{
    CONTENT_ACTION, CONTENT_DATA, CONTENT_HTML, CONTENT_JSON, JsonServerReport, ReportSink,
};
pub use crate::stack::{ReportKey, ReportStack};
