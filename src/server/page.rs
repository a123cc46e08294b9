//! The single HTML page of the form.

pub const TITLE: &str = "FLUX图像生成器";
pub const DESCRIPTION: &str = "输入一段描述性的文字，将根据此描述生成相应的图像。支持中文输入。";
pub const ARTICLE: &str = "AI自动生成";
pub const NO_IMAGE: &str = "未生成图像";

/// What to show under the form.
pub enum Outcome<'a> {
    Blank,
    Image {
        data_uri: &'a str,
        translated: &'a str,
    },
    NoImage {
        reason: &'a str,
    },
}

pub fn escape_html(text: &str) -> String {
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

pub fn render(prompt: &str, outcome: Outcome<'_>) -> String {
    let result = match outcome {
        Outcome::Blank => String::new(),
        Outcome::Image {
            data_uri,
            translated,
        } => format!(
            r#"<figure class="result">
  <img src="{}" alt="{}">
  <figcaption>{}</figcaption>
</figure>"#,
            data_uri,
            escape_html(translated),
            escape_html(translated)
        ),
        Outcome::NoImage { reason } => format!(
            r#"<div class="result empty"><strong>{}</strong><p>{}</p></div>"#,
            NO_IMAGE,
            escape_html(reason)
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; }}
  textarea {{ width: 100%; min-height: 5rem; font-size: 1rem; }}
  .result {{ margin-top: 1.5rem; }}
  .result img {{ max-width: 100%; }}
  .empty {{ color: #a33; }}
  footer {{ text-align: center; margin-top: 2rem; color: #777; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{description}</p>
<form method="post" action="/generate">
  <textarea name="prompt">{prompt}</textarea>
  <button type="submit">生成</button>
</form>
{result}
<footer><p style="text-align: center">{article}</p></footer>
</body>
</html>
"#,
        title = TITLE,
        description = DESCRIPTION,
        prompt = escape_html(prompt),
        result = result,
        article = ARTICLE,
    )
}
