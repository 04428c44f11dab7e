//! HTML for the single form page.

use std::fmt::Write;

use tubesort_core::HistoryEntry;

/// Everything the page can show; all fields are optional except history.
#[derive(Default)]
pub struct PageView<'a> {
    pub prediction: Option<&'a str>,
    pub probabilities: Option<&'a [f32]>,
    pub title: Option<&'a str>,
    pub history: &'a [HistoryEntry],
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>tubesort - Video Category Prediction</title>
    <style>
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }
        input[type=text] { width: 70%; padding: 8px; }
        button { padding: 8px 16px; background: #0066cc; color: white; border: 0; border-radius: 4px; }
        .result { background: #f4f8fc; padding: 12px 16px; border-radius: 4px; margin: 20px 0; }
        .history li { font-family: monospace; }
        .muted { color: #777; }
    </style>
</head>
<body>
    <h1>Video Category Prediction</h1>
    <form method="post" action="/">
        <input type="text" name="video_link" placeholder="https://www.youtube.com/watch?v=..." required>
        <button type="submit">Predict</button>
    </form>
"#;

const TAIL: &str = "</body>\n</html>\n";

pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::from(HEAD);

    if let Some(prediction) = view.prediction {
        html.push_str("    <div class=\"result\">\n");
        let _ = writeln!(
            html,
            "        <p><strong>Predicted category:</strong> <span id=\"prediction\">{}</span></p>",
            escape_html(prediction)
        );
        if let Some(probs) = view.probabilities {
            let _ = writeln!(
                html,
                "        <p><strong>Raw prediction:</strong> <code id=\"raw-prediction\">{}</code></p>",
                format_probabilities(probs)
            );
        }
        if let Some(title) = view.title {
            let _ = writeln!(
                html,
                "        <p><strong>Video title:</strong> <span id=\"video-title\">{}</span></p>",
                escape_html(title)
            );
        }
        html.push_str("    </div>\n");
    }

    html.push_str("    <h2>Submitted links</h2>\n");
    if view.history.is_empty() {
        html.push_str("    <p class=\"muted\">No links submitted yet.</p>\n");
    } else {
        html.push_str("    <ol class=\"history\">\n");
        for entry in view.history {
            let _ = writeln!(
                html,
                "        <li>{} <span class=\"muted\">{}</span></li>",
                escape_html(entry.link.as_str()),
                entry.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        html.push_str("    </ol>\n");
    }

    html.push_str(TAIL);
    html
}

/// `[0.9123, 0.0877]`
pub fn format_probabilities(probs: &[f32]) -> String {
    let parts: Vec<String> = probs.iter().map(|p| format!("{p:.4}")).collect();
    format!("[{}]", parts.join(", "))
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
