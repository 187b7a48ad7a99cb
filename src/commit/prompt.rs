//! Prompt construction for model-generated commit message candidates.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::analysis::AnalysisSummary;
use crate::llm::TargetLanguage;

/// Maximum length for sanitized diff text, in bytes.
pub const MAX_DIFF_SANITIZED_LENGTH: usize = 30_000;

const COMMIT_TYPES: &str = "feat, fix, docs, style, refactor, test, chore";

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").unwrap());

/// Everything the suggestion prompt is built from.
#[derive(Debug, Clone)]
pub struct PromptInput<'a> {
    pub summary: &'a AnalysisSummary,
    pub diff: &'a str,
    pub files: &'a [String],
    pub max_suggestions: usize,
    pub language: TargetLanguage,
}

fn format_examples(language: TargetLanguage) -> [&'static str; 2] {
    match language {
        TargetLanguage::Korean => [
            "feat(core): 설정 자동 로딩 지원 추가",
            "fix(api): 잘못된 상태 코드 매핑 수정",
        ],
        TargetLanguage::English => [
            "feat(core): support automatic settings loading",
            "fix(api): correct wrong status code mapping",
        ],
    }
}

/// Build the instruction prompt asking for exactly `max_suggestions`
/// numbered conventional-commit lines.
pub fn build_suggestion_prompt(input: &PromptInput<'_>) -> String {
    let n = input.max_suggestions.max(1);
    let language = input.language.name();
    let [example_feat, example_fix] = format_examples(input.language);

    let key_changes = if input.summary.key_changes.is_empty() {
        "- (none)".to_string()
    } else {
        input
            .summary
            .key_changes
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let files_section = if input.files.is_empty() {
        "- (no file information)".to_string()
    } else {
        input
            .files
            .iter()
            .map(|f| format!("- {f}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let (sanitized_diff, truncated) = sanitize_diff(input.diff, MAX_DIFF_SANITIZED_LENGTH);
    let truncation_note = if truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    };

    let template = (1..=n)
        .map(|i| format!("{i}. [commit message]"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an excellent developer and a Git commit message expert. Analyze the git diff below and write commit message candidates that follow the Conventional Commits rules.

You must follow these instructions 100%.
### Rules (STRICT)
- Format: type(scope?): description
- type: choose only from {COMMIT_TYPES}
- description: 100% {language}, imperative mood, 12-60 characters, no trailing period
- Any output not written in {language} is invalid; rewrite it in {language} only
- Output exactly {n} lines as a numbered list and nothing else

### Output example (format only)
1. {example_feat}
2. {example_fix}

### Change analysis
- intent: {intent}
- scope: {scope}
- complexity: {complexity}/10
- key changes:
{key_changes}

### Changed files
{files_section}

### Git diff
```
{sanitized_diff}
```{truncation_note}

### Final output template (answer in exactly this form)
{template}"#,
        intent = input.summary.intent,
        scope = input.summary.scope,
        complexity = input.summary.complexity,
    )
}

/// Sanitize diff text for inclusion in a prompt.
///
/// Removes ANSI escape sequences and control characters other than newlines
/// and tabs, then truncates to `max_len` bytes on a char boundary. The flag
/// reports whether anything was cut.
pub fn sanitize_diff(text: &str, max_len: usize) -> (String, bool) {
    let without_ansi = ANSI_ESCAPE.replace_all(text, "");
    let mut result: String = without_ansi
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    if result.len() <= max_len {
        return (result, false);
    }

    let mut end = max_len;
    while end > 0 && !result.is_char_boundary(end) {
        end -= 1;
    }
    result.truncate(end);
    (result, true)
}
