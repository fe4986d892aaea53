//! Asynchronous server reports for browser clients.
//!
//! A server answering an asynchronous request often wants to send several
//! independent pieces of content at once: a fragment of markup for one part
//! of the page, some data for a script, an action such as a redirect.
//! `reportkit` collects those pieces into a keyed, ordered **report stack**
//! and renders the whole stack as one JSON body.
//!
//! # Quick start
//!
//! ```
//! use reportkit::prelude::*;
//!
//! let doc = reportkit::markup::parse_fragment("<p>Saved <b>3</b> items</p>");
//! let status = doc.select_first("p").unwrap();
//!
//! let mut report: HtmlServerReport = HtmlServerReport::default();
//! report
//!     .add_report_content(
//!         Some(status.into()),
//!         &ContentOptions::new().with_holder("#status"),
//!     )?
//!     .add_report_content(
//!         Some("<li>new</li>".into()),
//!         &ContentOptions::new()
//!             .with_holder("ul.items")
//!             .with_method(InsertMethod::Append)
//!             .with_key("items"),
//!     )?;
//! report.sink_mut().add_report_action("reload", false, None)?;
//!
//! let body = report.sink().to_json_string()?;
//! assert!(body.contains(r#""content":"<p>Saved <b>3</b> items</p>""#));
//! # Ok::<(), reportkit::ReportError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`html`] | [`HtmlServerReport`](html::HtmlServerReport): holder/method records for markup content |
//! | [`report`] | [`ReportSink`](report::ReportSink) seam and the JSON base report |
//! | [`stack`] | Insertion-ordered keyed storage with associative-array keying |
//! | [`markup`] | Parsing and raw serialization of DOM nodes (`html5ever`) |

pub mod error;
pub mod html;
pub mod markup;
pub mod prelude;
pub mod report;
pub mod stack;

pub use error::ReportError;
