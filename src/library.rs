//! Markdown libraries under test.
//!
//! Each adapter turns markdown into HTML with the library's default
//! settings. The harness only relies on the [`MarkdownLibrary`] contract.

use pulldown_cmark::{Parser, html};

/// A markdown-to-HTML implementation the harness can time.
pub trait MarkdownLibrary {
    /// Stable identifier used on the command line and in results.
    fn name(&self) -> &'static str;

    fn parse(&self, markdown: &str) -> String;
}

/// [comrak](https://docs.rs/comrak), a GFM-compatible CommonMark parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct Comrak;

impl MarkdownLibrary for Comrak {
    fn name(&self) -> &'static str {
        "comrak"
    }

    fn parse(&self, markdown: &str) -> String {
        comrak::markdown_to_html(markdown, &comrak::Options::default())
    }
}

/// [pulldown-cmark](https://docs.rs/pulldown-cmark), a pull parser for CommonMark.
#[derive(Debug, Default, Clone, Copy)]
pub struct PulldownCmark;

impl MarkdownLibrary for PulldownCmark {
    fn name(&self) -> &'static str {
        "pulldown-cmark"
    }

    fn parse(&self, markdown: &str) -> String {
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, Parser::new(markdown));
        out
    }
}

/// Every bundled library, in reporting order.
pub fn all_libraries() -> Vec<Box<dyn MarkdownLibrary>> {
    vec![Box::new(Comrak), Box::new(PulldownCmark)]
}

/// Find a bundled library by name, ignoring ASCII case.
pub fn library_by_name(name: &str) -> Option<Box<dyn MarkdownLibrary>> {
    all_libraries()
        .into_iter()
        .find(|library| library.name().eq_ignore_ascii_case(name))
}
