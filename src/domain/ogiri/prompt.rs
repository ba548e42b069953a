//! 大喜利 프롬프트 템플릿
//!
//! 규칙, 자유 규칙, few-shot 예제, お題를 하나의 사용자 메시지로 조립합니다.
//! 같은 입력이면 항상 같은 프롬프트가 나옵니다.

use std::fmt::Write;

use super::dto::RuleSelection;
use super::examples::ExampleRecord;

/// 모든 프롬프트에 고정으로 들어가는 길이 제약
pub const LENGTH_CONSTRAINT: &str = "1ボケにつき1～2文以内";

const PREAMBLE: &str = "あなたは一流の大喜利芸人AIです。
以下のお題に対して、観客から高評価を得られそうなボケを5つ考えてください。";

const ANSWER_SCAFFOLD: &str = "【回答】
1.
2.
3.
4.
5.";

/// 생성 프롬프트 조립
pub fn build_prompt(topic: &str, selection: &RuleSelection, examples: &[ExampleRecord]) -> String {
    let mut prompt = String::new();

    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\n【ルール】\n");
    for rule in selection.rules() {
        push_bullet(&mut prompt, rule.phrase());
    }
    if let Some(custom) = selection.custom_rule() {
        push_bullet(&mut prompt, custom);
    }
    push_bullet(&mut prompt, LENGTH_CONSTRAINT);

    if !examples.is_empty() {
        prompt.push_str("\n【高評価のボケ例】\n");
        for example in examples {
            let _ = writeln!(
                prompt,
                "・お題「{}」→ ボケ「{}」",
                example.topic, example.punchline
            );
        }
    }

    let _ = write!(prompt, "\n【お題】\n{}\n\n{}\n", topic, ANSWER_SCAFFOLD);
    prompt
}

fn push_bullet(prompt: &mut String, text: &str) {
    prompt.push('・');
    prompt.push_str(text);
    prompt.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ogiri::dto::Rule;

    fn rule_section(prompt: &str) -> Vec<&str> {
        let start = prompt.find("【ルール】").unwrap();
        prompt[start..]
            .lines()
            .skip(1)
            .take_while(|line| !line.is_empty())
            .collect()
    }

    fn example(topic: &str, punchline: &str) -> ExampleRecord {
        ExampleRecord {
            topic: topic.to_string(),
            punchline: punchline.to_string(),
            rating: 90.0,
        }
    }

    #[test]
    fn empty_selection_should_leave_only_constraint_line() {
        let prompt = build_prompt("自由", &RuleSelection::default(), &[]);

        assert_eq!(rule_section(&prompt), vec!["・1ボケにつき1～2文以内"]);
    }

    #[test]
    fn rules_should_render_in_selection_order() {
        let selection = RuleSelection::new([Rule::Dark, Rule::Short], "");

        let prompt = build_prompt("自由", &selection, &[]);

        assert_eq!(
            rule_section(&prompt),
            vec!["・毒舌ブラックにする", "・短めの回答", "・1ボケにつき1～2文以内"]
        );
    }

    #[test]
    fn custom_rule_should_be_trimmed_and_rendered_once() {
        let selection = RuleSelection::new([Rule::Cute], "  関西弁で話す \n");

        let prompt = build_prompt("自由", &selection, &[]);

        assert_eq!(prompt.matches("関西弁で話す").count(), 1);
        assert!(prompt.contains("・関西弁で話す\n"));
        assert_eq!(
            rule_section(&prompt),
            vec!["・かわいさを加える", "・関西弁で話す", "・1ボケにつき1～2文以内"]
        );
    }

    #[test]
    fn prompt_should_end_with_answer_scaffold() {
        let prompt = build_prompt("自由", &RuleSelection::default(), &[]);

        assert!(prompt.ends_with("【回答】\n1.\n2.\n3.\n4.\n5.\n"));
    }

    #[test]
    fn prompt_should_contain_topic_section() {
        let prompt = build_prompt("こんな運動会は嫌だ", &RuleSelection::default(), &[]);

        assert!(prompt.contains("【お題】\nこんな運動会は嫌だ\n"));
        assert!(prompt.starts_with("あなたは一流の大喜利芸人AIです。"));
    }

    #[test]
    fn no_examples_should_omit_example_block() {
        let prompt = build_prompt("自由", &RuleSelection::default(), &[]);

        assert!(!prompt.contains("【高評価のボケ例】"));
    }

    #[test]
    fn examples_should_render_between_rules_and_topic() {
        let examples = vec![
            example("こんな先生は嫌だ", "出席を俳句で取る"),
            example("新しい祝日", "二度寝の日"),
        ];

        let prompt = build_prompt("自由", &RuleSelection::default(), &examples);

        let rules_at = prompt.find("【ルール】").unwrap();
        let examples_at = prompt.find("【高評価のボケ例】").unwrap();
        let topic_at = prompt.find("【お題】").unwrap();
        assert!(rules_at < examples_at && examples_at < topic_at);
        assert!(prompt.contains("・お題「こんな先生は嫌だ」→ ボケ「出席を俳句で取る」\n"));
        assert!(prompt.contains("・お題「新しい祝日」→ ボケ「二度寝の日」\n"));
    }

    #[test]
    fn prompt_should_be_deterministic() {
        let selection = RuleSelection::new([Rule::Surreal], "韻を踏む");
        let examples = vec![example("a", "b")];

        assert_eq!(
            build_prompt("自由", &selection, &examples),
            build_prompt("自由", &selection, &examples)
        );
    }
}
