use html_escape::{encode_double_quoted_attribute, encode_text};

/// 고정 에러 페이지 템플릿. 제목과 메시지만 받습니다.
pub fn render_page(title: &str, message: &str, home_link: &str) -> String {
    let title = encode_text(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; background: #f5f5f5; color: #333; }}
.error {{ max-width: 32rem; margin: 4rem auto; padding: 2rem; background: #fff; border-radius: 4px; }}
</style>
</head>
<body>
<div class="error">
<h1>{title}</h1>
<p>{message}</p>
<p><a href="{home}">Return to the dashboard</a></p>
</div>
</body>
</html>
"#,
        title = title,
        message = encode_text(message),
        home = encode_double_quoted_attribute(home_link),
    )
}
