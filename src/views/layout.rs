//! Page shell shared by every view: document frame, navigation bar and
//! the small HTML helpers the views build on.

use reqwest::Url;

pub const APP_TITLE: &str = "Courses Management System";

const NAV_LINKS: [(&str, &str); 4] = [
    ("/", "Courses"),
    ("/courses/new", "Add Course"),
    ("/instances", "Instances"),
    ("/instances/new", "Add Instance"),
];

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
nav { background: #fff; border-bottom: 1px solid #e2e8f0; padding: 1rem; }
nav .container { display: flex; align-items: center; justify-content: space-between; }
nav a { margin-left: 1rem; color: inherit; text-decoration: none; }
main.container, nav .container { max-width: 64rem; margin: 0 auto; }
main.container { padding: 1.5rem; }
.card { background: #fff; border: 1px solid #e2e8f0; border-radius: .5rem; padding: 1rem 1.25rem; margin-bottom: 1rem; }
.card-header { display: flex; justify-content: space-between; align-items: flex-start; }
.badge { display: inline-flex; gap: .25rem; align-items: center; background: #e2e8f0; border-radius: 999px; padding: .1rem .6rem; margin: 0 .25rem .25rem 0; }
.error { border: 1px solid #dc2626; background: #fef2f2; color: #dc2626; padding: .75rem; border-radius: .25rem; }
.muted { color: #64748b; }
.field { display: flex; flex-direction: column; gap: .35rem; margin-bottom: 1rem; }
.suggestions { border: 1px solid #e2e8f0; border-radius: .375rem; max-height: 10rem; overflow-y: auto; }
.suggestions button { display: block; width: 100%; text-align: left; background: none; border: 0; padding: .5rem; }
.inline { display: inline; }
"#;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Builds an absolute in-app path from raw segments, percent-encoding each.
pub fn href(segments: &[&str]) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return "/".to_string();
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

pub fn page(title: &str, content: &str) -> String {
    let nav = NAV_LINKS
        .iter()
        .map(|(path, label)| format!(r#"<a href="{}">{}</a>"#, path, label))
        .collect::<Vec<_>>()
        .join("");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1.0"/>
<title>{title} - {app}</title>
<style>{style}</style>
</head>
<body>
<nav><div class="container"><h1>{app}</h1><div>{nav}</div></div></nav>
<main class="container">
{content}
</main>
</body>
</html>"#,
        title = escape(title),
        app = APP_TITLE,
        style = STYLE,
        nav = nav,
        content = content,
    )
}

pub fn error_block(message: &str) -> String {
    format!(r#"<div class="error">{}</div>"#, escape(message))
}

/// Banner plus a blocking browser alert, for failures of destructive actions.
pub fn alert(message: &str) -> String {
    let literal = serde_json::to_string(message)
        .unwrap_or_default()
        .replace("</", "<\\/");
    format!(
        r#"<div class="error" role="alert">{}</div><script>alert({});</script>"#,
        escape(message),
        literal
    )
}

/// `onsubmit` attribute asking the browser for confirmation first.
pub fn confirm_attr(question: &str) -> String {
    let literal = serde_json::to_string(question).unwrap_or_default();
    format!(r#"onsubmit="return confirm({});""#, escape(&literal))
}

/// `onsubmit` attribute locking the form's `button` submit buttons once the
/// browser sends it through one of them: they are disabled and relabelled
/// `label`. Other submit buttons stay usable. Disabling waits a tick so the
/// pressed button is still part of the posted fields.
pub fn pending_attr(button: &str, label: &str) -> String {
    let name = serde_json::to_string(button).unwrap_or_default();
    let label = serde_json::to_string(label).unwrap_or_default();
    let script = format!(
        "var b = event.submitter, f = this; if (b && b.name === {name}) {{ \
         setTimeout(function () {{ f.querySelectorAll('button[name=' + {name} + ']').forEach(function (x) {{ \
         x.disabled = true; x.textContent = {label}; }}); }}, 0); }}"
    );
    format!(r#"onsubmit="{}""#, escape(&script))
}
