use pulldown_cmark::html;
use pulldown_cmark::Parser;

use crate::error::ContentError;
use crate::uri::Uri;

/// Turns node source into markup, chosen by the URI extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plugin {
    Text,
    Html,
    Markdown,
}

impl Plugin {
    pub fn for_uri(uri: &Uri) -> Result<Self, ContentError> {
        match uri.ext.as_deref() {
            None | Some("txt") => Ok(Plugin::Text),
            Some("html") => Ok(Plugin::Html),
            Some("md") => Ok(Plugin::Markdown),
            Some(ext) => Err(ContentError::UnknownPlugin {
                ext: ext.to_string(),
                uri: uri.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn render(self, source: &str) -> String {
        match self {
            Plugin::Text => escape_html(source),
            Plugin::Html => source.to_string(),
            Plugin::Markdown => {
                let mut output = String::with_capacity(source.len() * 3 / 2);
                html::push_html(&mut output, Parser::new(source));
                output.truncate(output.trim_end_matches('\n').len());
                output
            }
        }
    }
}

pub(crate) fn escape_html(source: &str) -> String {
    let mut escaped = String::with_capacity(source.len());
    for ch in source.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
