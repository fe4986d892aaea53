//! HTML content reports.
//!
//! [`HtmlServerReport`] turns a piece of content (a raw markup string or a
//! parsed [`MarkupNode`]) into a [`ReportContentRecord`] that tells the client
//! *where* to put it (the holder, a CSS selector) and *how* (replace or
//! append). The record is then forwarded to the wrapped [`ReportSink`], which
//! owns keying and ordering.
//!
//! ```
//! use reportkit::html::{ContentOptions, HtmlServerReport, InsertMethod};
//!
//! let mut report: HtmlServerReport = HtmlServerReport::default();
//! report
//!     .add_report_content(
//!         Some("<b>hi</b>".into()),
//!         &ContentOptions::new()
//!             .with_holder("#main")
//!             .with_method(InsertMethod::Append),
//!     )
//!     .unwrap();
//!
//! let body = report.sink().to_json_string().unwrap();
//! assert!(body.contains(r##""holder":"#main""##));
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::ReportError;
use crate::markup::{MarkupNode, serialize_to_string};
use crate::report::{CONTENT_HTML, JsonServerReport, ReportSink};

pub const REPLACE_METHOD: &str = "replace";
pub const APPEND_METHOD: &str = "append";

/// Content type for markup shown in a popup rather than a page holder.
pub const CONTENT_POPUP: &str = "popup";

/// How the client applies content to its holder.
///
/// Unknown method names are carried through as [`InsertMethod::Other`]
/// rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InsertMethod {
    /// Overwrite the holder's contents.
    #[default]
    Replace,
    /// Add after the holder's existing contents.
    Append,
    Other(String),
}

impl InsertMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Replace => REPLACE_METHOD,
            Self::Append => APPEND_METHOD,
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for InsertMethod {
    fn from(name: &str) -> Self {
        match name {
            REPLACE_METHOD => Self::Replace,
            APPEND_METHOD => Self::Append,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for InsertMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InsertMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InsertMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from(name.as_str()))
    }
}

/// Content accepted by [`HtmlServerReport::add_report_content`].
#[derive(Debug, Clone)]
pub enum ReportContent {
    /// Already-serialized markup, forwarded untouched.
    Raw(String),
    /// A DOM node, serialized at record-build time.
    Markup(MarkupNode),
}

impl From<&str> for ReportContent {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for ReportContent {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<MarkupNode> for ReportContent {
    fn from(node: MarkupNode) -> Self {
        Self::Markup(node)
    }
}

/// The payload stored for one piece of HTML content.
///
/// `content` is omitted from the JSON entirely when no content was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportContentRecord {
    pub holder: String,
    pub method: InsertMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Options for [`HtmlServerReport::add_report_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentOptions {
    /// Content-type tag forwarded to the sink. Default: [`CONTENT_HTML`].
    pub content_type: String,
    /// CSS selector of the target node. Default: `""` (no explicit target).
    pub holder: String,
    /// Default: [`InsertMethod::Replace`].
    pub method: InsertMethod,
    /// Stack key. `None` appends under the next numeric index.
    pub key: Option<String>,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            content_type: CONTENT_HTML.to_string(),
            holder: String::new(),
            method: InsertMethod::Replace,
            key: None,
        }
    }
}

impl ContentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_holder(mut self, holder: impl Into<String>) -> Self {
        self.holder = holder.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<InsertMethod>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Builds HTML content records and forwards them to a [`ReportSink`].
pub struct HtmlServerReport<S = JsonServerReport> {
    sink: S,
}

impl Default for HtmlServerReport<JsonServerReport> {
    fn default() -> Self {
        Self::new(JsonServerReport::new())
    }
}

impl<S: ReportSink> HtmlServerReport<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Build a record for `content` and add it to the sink.
    ///
    /// Returns `self` for chaining. Fails when a markup node is no longer
    /// attached to its document, or when the sink has no numeric index left
    /// for unkeyed content.
    pub fn add_report_content(
        &mut self,
        content: Option<ReportContent>,
        options: &ContentOptions,
    ) -> Result<&mut Self, ReportError> {
        let record =
            Self::build_content_record(content.as_ref(), &options.holder, &options.method)?;
        debug!(
            holder = %record.holder,
            method = %record.method,
            content_type = %options.content_type,
            key = ?options.key,
            has_content = record.content.is_some(),
            "adding html report content"
        );
        let payload = serde_json::to_value(&record)?;
        self.sink
            .add_report_content(payload, options.key.as_deref(), &options.content_type)?;
        Ok(self)
    }

    /// Add markup destined for a popup, typed [`CONTENT_POPUP`].
    pub fn add_popup_content(
        &mut self,
        content: ReportContent,
        holder: &str,
    ) -> Result<&mut Self, ReportError> {
        let options = ContentOptions::new()
            .with_type(CONTENT_POPUP)
            .with_holder(holder);
        self.add_report_content(Some(content), &options)
    }

    /// Build the record without touching the sink.
    pub fn build_content_record(
        content: Option<&ReportContent>,
        holder: &str,
        method: &InsertMethod,
    ) -> Result<ReportContentRecord, ReportError> {
        let mut record = ReportContentRecord {
            holder: holder.to_string(),
            method: method.clone(),
            content: None,
        };

        let Some(content) = content else {
            return Ok(record);
        };

        record.content = Some(match content {
            ReportContent::Raw(raw) => raw.clone(),
            ReportContent::Markup(node) => serialize_to_string(node)?,
        });
        Ok(record)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::markup::parse_fragment;
    use crate::stack::ReportKey;

    type Report = HtmlServerReport<JsonServerReport>;

    /// Records every forwarded call so the sink contract can be checked.
    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<(Value, Option<String>, String)>,
    }

    impl ReportSink for RecordingSink {
        fn add_report_content(
            &mut self,
            payload: Value,
            key: Option<&str>,
            content_type: &str,
        ) -> Result<&mut Self, ReportError> {
            self.calls
                .push((payload, key.map(str::to_string), content_type.to_string()));
            Ok(self)
        }
    }

    #[test]
    fn raw_content_is_copied_unchanged() {
        let raw = "  <div>\n\t<b>exact</b></div> ";
        let record = Report::build_content_record(
            Some(&ReportContent::from(raw)),
            "#x",
            &InsertMethod::Replace,
        )
        .unwrap();
        assert_eq!(record.content.as_deref(), Some(raw));
    }

    #[test]
    fn null_content_has_no_content_field() {
        for method in [InsertMethod::Replace, InsertMethod::Append, "odd".into()] {
            let record = Report::build_content_record(None, ".slot", &method).unwrap();
            assert!(record.content.is_none());
            let json = serde_json::to_value(&record).unwrap();
            assert!(json.get("content").is_none());
            assert_eq!(json["holder"], ".slot");
        }
    }

    #[test]
    fn markup_content_is_serialized_exactly() {
        let doc = parse_fragment("<section id=\"s\">\n  <p>one</p>\n</section>");
        let section = doc.select_first("section").unwrap();
        let record = Report::build_content_record(
            Some(&ReportContent::from(section)),
            "",
            &InsertMethod::Replace,
        )
        .unwrap();
        assert_eq!(
            record.content.as_deref(),
            Some("<section id=\"s\">\n  <p>one</p>\n</section>")
        );
    }

    #[test]
    fn detached_markup_fails() {
        let node = {
            let doc = parse_fragment("<i>x</i>");
            doc.select_first("i").unwrap()
        };
        let mut report = Report::default();
        let result = report.add_report_content(Some(node.into()), &ContentOptions::new());
        assert!(matches!(result, Err(ReportError::DetachedNode)));
        assert!(report.sink().stack().is_empty());
    }

    #[test]
    fn option_defaults() {
        let options = ContentOptions::default();
        assert_eq!(options.holder, "");
        assert_eq!(options.method, InsertMethod::Replace);
        assert_eq!(options.method.as_str(), "replace");
        assert_eq!(options.content_type, CONTENT_HTML);
        assert!(options.key.is_none());
    }

    #[test]
    fn add_returns_same_instance() {
        let mut report = Report::default();
        let before: *const Report = &report;
        let returned = report
            .add_report_content(Some("x".into()), &ContentOptions::new())
            .unwrap();
        assert!(std::ptr::eq(before, returned));
    }

    #[test]
    fn forwards_record_key_and_type_once() {
        let mut report = HtmlServerReport::new(RecordingSink::default());
        let options = ContentOptions::new()
            .with_type("html")
            .with_holder("#main")
            .with_method(APPEND_METHOD);
        report
            .add_report_content(Some("<b>hi</b>".into()), &options)
            .unwrap();

        let calls = &report.sink().calls;
        assert_eq!(calls.len(), 1);
        let (payload, key, content_type) = &calls[0];
        assert_eq!(
            payload,
            &json!({"holder": "#main", "method": "append", "content": "<b>hi</b>"})
        );
        assert_eq!(key, &None);
        assert_eq!(content_type, "html");
    }

    #[test]
    fn same_key_twice_keeps_one_entry() {
        let mut report = Report::default();
        let options = ContentOptions::new().with_key("foo");
        report
            .add_report_content(Some("first".into()), &options)
            .unwrap()
            .add_report_content(Some("second".into()), &options)
            .unwrap();

        let stack = report.sink().stack();
        assert_eq!(stack.len(), 1);
        let entry = stack.get(&ReportKey::Name("foo".into())).unwrap();
        assert_eq!(entry.payload["content"], "second");
    }

    #[test]
    fn unkeyed_content_goes_to_next_index() {
        let mut report = Report::default();
        report
            .add_report_content(Some("a".into()), &ContentOptions::new())
            .unwrap()
            .add_report_content(None, &ContentOptions::new().with_holder("#b"))
            .unwrap();

        let stack = report.sink().stack();
        assert_eq!(stack.get(&ReportKey::Index(0)).unwrap().payload["content"], "a");
        let second = stack.get(&ReportKey::Index(1)).unwrap();
        assert_eq!(second.content_type, CONTENT_HTML);
        assert!(second.payload.get("content").is_none());
    }

    #[test]
    fn unknown_method_and_type_pass_through() {
        let mut report = Report::default();
        let options = ContentOptions::new()
            .with_type("custom")
            .with_method("prepend");
        report
            .add_report_content(Some("x".into()), &options)
            .unwrap();

        let entry = report.sink().stack().get(&ReportKey::Index(0)).unwrap();
        assert_eq!(entry.content_type, "custom");
        assert_eq!(entry.payload["method"], "prepend");
    }

    #[test]
    fn popup_content_is_typed_popup() {
        let mut report = Report::default();
        report
            .add_popup_content("<dialog>hey</dialog>".into(), "body")
            .unwrap();
        let entry = report.sink().stack().get(&ReportKey::Index(0)).unwrap();
        assert_eq!(entry.content_type, CONTENT_POPUP);
        assert_eq!(entry.payload["holder"], "body");
    }

    #[test]
    fn method_deserializes_from_any_string() {
        let method: InsertMethod = serde_json::from_str("\"append\"").unwrap();
        assert_eq!(method, InsertMethod::Append);
        let method: InsertMethod = serde_json::from_str("\"swap\"").unwrap();
        assert_eq!(method, InsertMethod::Other("swap".into()));
    }
}
