use std::fmt::Write;

use super::dto::{Rule, RuleSelection};
use crate::error::AppError;

const TITLE: &str = "大喜利ボケ生成";
const PASSWORD_WARNING: &str = "パスワードが必要です。";
const BUSY_LABEL: &str = "生成中...";
const RESULT_HEADING: &str = "🎯 生成されたボケ";

/// 폼 페이지에 그릴 값 모음
#[derive(Debug, Default)]
pub struct FormView<'a> {
    pub password: &'a str,
    pub topic: &'a str,
    pub selection: RuleSelection,
    /// 생성이 실행된 경우에만 Some
    pub punchlines: Option<&'a [String]>,
    pub error: Option<&'a AppError>,
    pub dataset_error: Option<&'a str>,
}

/// HTML 특수문자 이스케이프
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// 비밀번호 입력만 있는 게이트 페이지
pub fn render_gate() -> String {
    let mut body = String::new();
    body.push_str("<form method=\"post\" action=\"/\">\n");
    push_password_field(&mut body, "");
    let _ = writeln!(body, "<p class=\"warning\">{PASSWORD_WARNING}</p>");
    body.push_str("<button type=\"submit\">入室</button>\n</form>\n");
    layout(&body)
}

/// 게이트 통과 후의 전체 폼 페이지
pub fn render_form(view: &FormView<'_>) -> String {
    let mut body = String::new();

    if let Some(message) = view.dataset_error {
        let _ = writeln!(
            body,
            "<div class=\"banner error\" role=\"alert\">データセットの読み込みに失敗しました: {}</div>",
            escape_html(message)
        );
    }
    if let Some(error) = view.error {
        let _ = writeln!(
            body,
            "<div class=\"banner error\" role=\"alert\" data-status=\"{}\" data-code=\"{}\">{}</div>",
            error.status_code().as_u16(),
            error.error_code(),
            escape_html(&error.user_message())
        );
    }

    body.push_str("<form id=\"ogiri-form\" method=\"post\" action=\"/\">\n");
    push_password_field(&mut body, view.password);

    let _ = writeln!(
        body,
        "<label>お題 <input type=\"text\" name=\"topic\" value=\"{}\"></label>",
        escape_html(view.topic)
    );

    body.push_str("<fieldset>\n<legend>ルール</legend>\n");
    for rule in Rule::ALL {
        let checked = if view.selection.rules().contains(&rule) {
            " checked"
        } else {
            ""
        };
        let _ = writeln!(
            body,
            "<label><input type=\"checkbox\" name=\"rules\" value=\"{}\"{checked}> {}</label>",
            rule.code(),
            rule.phrase()
        );
    }
    body.push_str("</fieldset>\n");

    let _ = writeln!(
        body,
        "<label>自由ルール <input type=\"text\" name=\"custom_rule\" value=\"{}\"></label>",
        escape_html(view.selection.raw_custom_rule())
    );
    let _ = writeln!(
        body,
        "<button type=\"submit\" name=\"generate\" value=\"1\" id=\"generate\">ボケを生成</button>\n<p id=\"busy\" hidden>{BUSY_LABEL}</p>"
    );
    body.push_str("</form>\n");

    if let Some(punchlines) = view.punchlines {
        push_results(&mut body, punchlines);
    }

    body.push_str(BUSY_SCRIPT);
    layout(&body)
}

fn push_password_field(body: &mut String, password: &str) {
    let _ = writeln!(
        body,
        "<label>パスワード <input type=\"password\" name=\"password\" value=\"{}\"></label>",
        escape_html(password)
    );
}

fn push_results(body: &mut String, punchlines: &[String]) {
    let _ = writeln!(body, "<section id=\"results\">\n<h2>{RESULT_HEADING}</h2>\n<ol>");
    for (index, punchline) in punchlines.iter().enumerate() {
        let _ = writeln!(
            body,
            "<li><strong>{}.</strong> {}</li>",
            index + 1,
            escape_html(punchline)
        );
    }
    body.push_str("</ol>\n</section>\n");
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n<title>{TITLE}</title>\n</head>\n<body>\n<h1>{TITLE}</h1>\n{body}</body>\n</html>\n"
    )
}

// 제출 중에는 버튼을 잠그고 표시기를 띄움. 응답 페이지가 새로 그려지면 초기 상태로 돌아감.
const BUSY_SCRIPT: &str = r#"<script>
document.getElementById("ogiri-form").addEventListener("submit", function () {
  var button = document.getElementById("generate");
  document.getElementById("busy").hidden = false;
  setTimeout(function () { button.disabled = true; }, 0);
});
</script>
"#;
