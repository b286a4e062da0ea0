/// Central template renderer for the netdeck studio.
///
/// The studio uses a single HTML template (`studio/assets/studio.html`) with
/// placeholder tokens like `{{TOKEN}}`.  The template is embedded at compile
/// time; `render_page` resolves the global tokens and hands the rest to a
/// page-specific closure.

use crate::state::{FlashKind, FlashMessage};

const TEMPLATE: &str = include_str!("assets/studio.html");

/// Which page is rendered; sets the title and the active nav link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Page {
    Networks,
    Details,
}

impl Page {
    fn title(self) -> &'static str {
        match self {
            Page::Networks => "Networks",
            Page::Details  => "Network",
        }
    }
}

/// Renders the full studio page.
///
/// `fill` receives the template with global tokens resolved and should
/// replace `{{CONTENT}}` and optionally `{{MODAL}}`.
pub fn render_page<F>(page: Page, backend: &str, flash: Option<&FlashMessage>, fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    let mut html = TEMPLATE.to_owned();

    html = html.replace("{{TITLE}}", page.title());
    html = html.replace("{{BACKEND}}", &html_escape(backend));
    html = html.replace("{{FLASH}}", &render_flash_html(flash));
    html = html.replace(
        "{{NAV_NETWORKS}}",
        if page == Page::Networks { "active" } else { "" },
    );

    html = fill(html);

    blank_remaining(html)
}

/// Tokens the template defines; only these are ever substituted or blanked.
const TOKENS: [&str; 6] = ["{{TITLE}}", "{{BACKEND}}", "{{FLASH}}", "{{NAV_NETWORKS}}", "{{CONTENT}}", "{{MODAL}}"];

/// Blanks template tokens the page did not fill.
fn blank_remaining(mut html: String) -> String {
    for token in TOKENS {
        html = html.replace(token, "");
    }
    html
}

pub fn render_flash_html(flash: Option<&FlashMessage>) -> String {
    match flash {
        None => String::new(),
        Some(f) => {
            let class = match f.kind {
                FlashKind::Success => "flash-success",
                FlashKind::Error   => "flash-error",
            };
            format!(r#"<div class="flash {}">{}</div>"#, class, html_escape(&f.text))
        }
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
     .replace('<', "&lt;")
     .replace('>', "&gt;")
     .replace('"', "&quot;")
     .replace('\'', "&#39;")
     .replace('{', "&#123;")
     .replace('}', "&#125;")
}
