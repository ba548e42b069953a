/// 行頭がこの数字の行だけを回答として扱う
const ANSWER_DIGITS: [char; 5] = ['1', '2', '3', '4', '5'];

/// 모델 응답에서 번호가 붙은 ボケ를 추출
///
/// 각 줄을 trim한 뒤 첫 글자가 1~5인 줄만 남기고, 첫 번째 `.` 뒤를 답으로 씁니다.
/// `.`이 없는 줄은 줄 전체를 씁니다. 개수 보정이나 중복 제거는 하지 않습니다.
pub fn parse_punchlines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with(ANSWER_DIGITS))
        .map(|line| match line.split_once('.') {
            Some((_, rest)) => rest.trim(),
            None => line,
        })
        .filter(|answer| !answer.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_five_numbered_lines() {
        let parsed = parse_punchlines("1. a\n2. b\n3. c\n4. d\n5. e");
        assert_eq!(parsed, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn should_skip_preamble_and_unnumbered_lines() {
        let parsed = parse_punchlines("Sure, here are some jokes:\n1. foo\nblah\n2. bar");
        assert_eq!(parsed, vec!["foo", "bar"]);
    }

    #[test]
    fn should_return_empty_without_numbered_lines() {
        assert!(parse_punchlines("no numbers here\n\n- bullet").is_empty());
        assert!(parse_punchlines("").is_empty());
    }

    #[test]
    fn should_ignore_lines_starting_with_other_digits() {
        let parsed = parse_punchlines("0. zero\n6. six\n9. nine\n3. three");
        assert_eq!(parsed, vec!["three"]);
    }

    #[test]
    fn should_drop_empty_answers() {
        let parsed = parse_punchlines("1.\n2.   \n3. real");
        assert_eq!(parsed, vec!["real"]);
    }

    #[test]
    fn should_trim_indentation_and_answer() {
        let parsed = parse_punchlines("   1.   先生が全員ロボット   \n\t2.\t給食が毎日カレー");
        assert_eq!(parsed, vec!["先生が全員ロボット", "給食が毎日カレー"]);
    }

    #[test]
    fn should_keep_duplicate_numbers() {
        let parsed = parse_punchlines("1. a\n1. b\n2. c");
        assert_eq!(parsed, vec!["a", "b", "c"]);
    }

    #[test]
    fn should_split_only_at_first_period() {
        let parsed = parse_punchlines("1. Mr. Tanaka said no.");
        assert_eq!(parsed, vec!["Mr. Tanaka said no."]);
    }

    #[test]
    fn line_without_period_should_be_kept_whole() {
        let parsed = parse_punchlines("1 運動会が雨天決行");
        assert_eq!(parsed, vec!["1 運動会が雨天決行"]);
    }

    #[test]
    fn two_digit_numbers_starting_with_one_should_be_kept() {
        let parsed = parse_punchlines("10. ten\n11. eleven");
        assert_eq!(parsed, vec!["ten", "eleven"]);
    }

    #[test]
    fn should_handle_windows_line_endings() {
        let parsed = parse_punchlines("1. a\r\n2. b\r\n");
        assert_eq!(parsed, vec!["a", "b"]);
    }

    #[test]
    fn should_preserve_order_with_trailing_commentary() {
        let parsed =
            parse_punchlines("1. first\n2. second\n\nいかがでしょうか？\n5. fifth\nNote: enjoy");
        assert_eq!(parsed, vec!["first", "second", "fifth"]);
    }
}
