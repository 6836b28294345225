use actix_web::{HttpResponse, Responder, http::header::ContentType, web};
use serde::Deserialize;

use crate::AppState;

const PAGE_TITLE: &str = "AI Mental Health Assistant";
const HEADING: &str = "🧠 AI Mental Health Chatbot";
const SUBTITLE: &str =
    "Describe how you're feeling, and the AI will analyze and recommend self-care tips.";
const INPUT_LABEL: &str = "How are you feeling today?";
const INPUT_PLACEHOLDER: &str = "e.g., I’ve been feeling anxious and tired lately...";
const SUBMIT_LABEL: &str = "Analyze & Recommend";
const OUTPUT_LABEL: &str = "AI Response";

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    user_input: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(show_form))
            .route(web::post().to(submit)),
    );
}

async fn show_form() -> impl Responder {
    html(render_page("", ""))
}

/// Runs the whole group chat before responding
async fn submit(state: web::Data<AppState>, form: web::Form<SubmitForm>) -> impl Responder {
    log::info!("[CHAT] Submission received ({} chars)", form.user_input.chars().count());
    let output = state.pipeline.submit(&form.user_input).await;
    html(render_page(&form.user_input, &output))
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

fn render_page(input: &str, output: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; background: #f7f8fb; color: #1f2933; }}
.row {{ display: flex; gap: 1.5rem; flex-wrap: wrap; }}
.column {{ flex: 1 1 320px; display: flex; flex-direction: column; gap: 0.5rem; }}
textarea {{ width: 100%; box-sizing: border-box; padding: 0.6rem; border-radius: 8px; border: 1px solid #cbd2d9; font: inherit; }}
button {{ padding: 0.6rem 1rem; border: none; border-radius: 8px; background: #5c6ac4; color: white; font: inherit; cursor: pointer; }}
</style>
</head>
<body>
<h2>{heading}</h2>
<p>{subtitle}</p>
<form method="post" action="/">
<div class="row">
<div class="column">
<label for="user_input">{input_label}</label>
<textarea id="user_input" name="user_input" rows="3" placeholder="{placeholder}">{input}</textarea>
<button type="submit">{submit_label}</button>
</div>
<div class="column">
<label for="output">{output_label}</label>
<textarea id="output" rows="10" readonly>{output}</textarea>
</div>
</div>
</form>
</body>
</html>
"#,
        title = PAGE_TITLE,
        heading = escape_html(HEADING),
        subtitle = escape_html(SUBTITLE),
        input_label = escape_html(INPUT_LABEL),
        placeholder = escape_html(INPUT_PLACEHOLDER),
        input = escape_html(input),
        submit_label = escape_html(SUBMIT_LABEL),
        output_label = escape_html(OUTPUT_LABEL),
        output = escape_html(output),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
