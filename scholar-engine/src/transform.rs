//! Template transform
//!
//! Applies an XSLT stylesheet to a result document with xrust.
//! [`TemplateTransform::render`] always yields a displayable document: on
//! failure the error message is embedded in a minimal HTML page.

use std::panic::{catch_unwind, AssertUnwindSafe};

use xrust::item::{Item, Node, SequenceTrait};
use xrust::parser::xml::parse as parse_xml;
use xrust::transform::context::StaticContextBuilder;
use xrust::trees::smite::RNode;
use xrust::xdmerror::{Error as XrustError, ErrorKind};
use xrust::xslt::from_document;

use scholar_traits::{Error, Result};

/// Bundled stylesheet rendering a result document as an HTML table
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/Transform.xsl");

/// Stateless XSLT renderer
pub struct TemplateTransform;

impl TemplateTransform {
    /// Render `result` through `template`, falling back to an error page
    pub fn render(result: &str, template: &str) -> String {
        let outcome = catch_unwind(AssertUnwindSafe(|| Self::try_render(result, template)))
            .unwrap_or_else(|_| Err(Error::transform("transform engine panicked")));

        match outcome {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(error = %e, "template transform failed");
                error_page(&e.to_string())
            }
        }
    }

    /// Render with the bundled template
    pub fn render_default(result: &str) -> String {
        Self::render(result, DEFAULT_TEMPLATE)
    }

    /// Render `result` through `template`, reporting failures
    pub fn try_render(result: &str, template: &str) -> Result<String> {
        let source = RNode::new_document();
        parse_xml(source.clone(), result, None)
            .map_err(|e| Error::parse(format!("result document: {}", e)))?;

        let style = RNode::new_document();
        parse_xml(style.clone(), template, None)
            .map_err(|e| Error::transform(format!("Failed to parse stylesheet: {}", e)))?;

        let mut context = from_document(
            style,
            None,
            |s: &str| {
                let doc = RNode::new_document();
                parse_xml(doc.clone(), s, None)?;
                Ok(doc)
            },
            |_| Ok(String::new()),
        )
        .map_err(|e| Error::transform(e.to_string()))?;

        context.context(vec![Item::Node(source)], 0);
        context.result_document(RNode::new_document());

        let mut static_context = StaticContextBuilder::new()
            .message(|_| Ok(()))
            .fetcher(|_| Err(XrustError::new(ErrorKind::NotImplemented, "not implemented")))
            .parser(|_| Err(XrustError::new(ErrorKind::NotImplemented, "not implemented")))
            .build();

        let sequence = context
            .evaluate(&mut static_context)
            .map_err(|e| Error::transform(e.to_string()))?;

        let html = sequence.to_xml();
        tracing::debug!(bytes = html.len(), "template applied");
        Ok(html)
    }
}

/// Minimal page showing `message` as text
pub fn error_page(message: &str) -> String {
    format!(
        "<html><body><h1>Error</h1><pre>{}</pre></body></html>",
        quick_xml::escape::escape(message)
    )
}
