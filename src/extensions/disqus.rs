//! The `disqus` comment-widget block macro.

use super::{create_pass_block, Block, BlockMacroProcessor};
use crate::ast::Attributes;
use crate::config::DisqusConfig;
use crate::error::Result;

/// Block macro `disqus::<page-id>[]`, emitting the Disqus embed.
#[derive(Debug, Clone)]
pub struct DisqusBlockMacro {
    config: DisqusConfig,
}

impl DisqusBlockMacro {
    pub fn new(config: DisqusConfig) -> Self {
        Self { config }
    }

    fn embed(&self, page_id: &str) -> String {
        let page_url = format!("{}{}/", self.config.base_url, form_urlencode(page_id));

        format!(
            r#"<div id='disqus_thread'></div>
<script>
  var disqus_config = function () {{
    this.page.url = '{url}';
    this.page.identifier = '{id}';
  }};

  (function() {{
    var d = document, s = d.createElement('script');
    s.src = '//{site}.disqus.com/embed.js';
    s.setAttribute('data-timestamp', +new Date());
    (d.head || d.body).appendChild(s);
  }})();
</script>
<noscript>Please enable JavaScript to view the <a href='https://disqus.com/?ref_noscript'>comments powered by Disqus.</a></noscript>"#,
            url = escape_js(&page_url),
            id = escape_js(page_id),
            site = escape_js(&self.config.site_id),
        )
    }
}

impl BlockMacroProcessor for DisqusBlockMacro {
    fn name(&self) -> &str {
        "disqus"
    }

    fn process(&self, target: &str, _attrs: Attributes) -> Result<Option<Block>> {
        if target.is_empty() {
            return Ok(None);
        }
        Ok(Some(create_pass_block(self.embed(target))))
    }
}

/// Form-encode a path segment: unreserved bytes as is, space as `+`,
/// everything else as `%XX`.
fn form_urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Escape text for a single-quoted JavaScript string inside `<script>`.
fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}
