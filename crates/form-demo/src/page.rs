//! HTML for the demo form.

use friendly_captcha::RESPONSE_FORM_FIELD_NAME;

const WIDGET_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/@friendlycaptcha/sdk@0.1.10/site.min.js";

/// Render the form page with an optional status message
pub fn render(message: &str, sitekey: &str, widget_endpoint: Option<&str>) -> String {
    let message = if message.is_empty() {
        String::new()
    } else {
        format!("<p class=\"message\">{}</p>\n", escape(message))
    };

    let endpoint_attr = widget_endpoint
        .map(|e| format!(" data-api-endpoint=\"{}\"", escape(e)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Friendly Captcha form demo</title>
<script type="module" src="{WIDGET_SCRIPT}" async defer></script>
</head>
<body>
<h1>Contact</h1>
{message}<form method="POST">
<input type="text" name="subject" placeholder="Subject">
<textarea name="message" placeholder="Message"></textarea>
<div class="frc-captcha" data-sitekey="{sitekey}" data-form-field-name="{field}"{endpoint_attr}></div>
<button type="submit">Send</button>
</form>
</body>
</html>
"#,
        sitekey = escape(sitekey),
        field = RESPONSE_FORM_FIELD_NAME,
    )
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
