//! Integration tests for the parse, analyze, and synthesize pipeline.

mod common;

use commitsmith::analysis::ChangePattern;
use commitsmith::commit::{PromptInput, build_suggestion_prompt, synthesize};
use commitsmith::llm::TargetLanguage;
use commitsmith::{ChangeKind, Intent, Scope, analyze, parse_diff};
use common::{diff_fixture, read_fixture};

const SERVICE_DIFF: &str = "\
diff --git a/Service.x b/Service.x
index 0000001..0000002 100644
--- a/Service.x
+++ b/Service.x
@@ -1,3 +1,5 @@
+import \"net/http\"
 service Service {
+    handleRequest()
 }
";

#[test]
fn test_added_method_and_import_end_to_end() {
    let records = parse_diff(SERVICE_DIFF);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind(), ChangeKind::ImportAdded);
    assert_eq!(records[0].target(), "\"net/http\"");
    assert_eq!(records[1].kind(), ChangeKind::MethodAdded);
    assert_eq!(records[1].target(), "handleRequest");
    assert!(records.iter().all(|r| r.file() == "Service.x"));

    let summary = analyze(&records);
    assert_eq!(summary.metadata.pattern, Some(ChangePattern::NewFunctionality));
    assert_eq!(summary.scope, Scope::Core);
    assert!(summary.complexity >= 3);
    assert_eq!(summary.key_changes, vec!["method added: handleRequest"]);

    let messages = synthesize(&summary, TargetLanguage::English);
    assert_eq!(messages[0], "feat(core): add method");
    assert!(messages.iter().all(|m| m.starts_with("feat(core): ")));
}

#[test]
fn test_provider_bean_diff_records() {
    let diff = read_fixture(diff_fixture("tool_provider_bean.diff"));
    let records = parse_diff(&diff);

    let kinds: Vec<ChangeKind> = records.iter().map(|r| r.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ChangeKind::ImportAdded,
            ChangeKind::AnnotationAdded,
            ChangeKind::MethodAdded,
            ChangeKind::ConfigurationAdded,
        ]
    );

    assert!(
        records
            .iter()
            .all(|r| r.file() == "src/main/java/com/example/ToolConfig.java")
    );
    assert_eq!(records[0].target(), "org.springframework.ai.tool.ToolCallbackProvider");
    assert_eq!(records[1].target(), "@Bean on method weatherTools");
    assert_eq!(records[2].target(), "weatherTools");
    assert!(
        records[2]
            .details()
            .contains(&"returns: ToolCallbackProvider".to_string())
    );
    assert_eq!(records[3].target(), "Provider Bean");
}

#[test]
fn test_provider_bean_diff_summary() {
    let diff = read_fixture(diff_fixture("tool_provider_bean.diff"));
    let summary = analyze(&parse_diff(&diff));

    assert_eq!(summary.intent, Intent::ProviderConfiguration);
    assert_eq!(summary.scope, Scope::Tool);
    assert_eq!(summary.complexity, 10);
    assert_eq!(summary.metadata.total_changes, 4);
    assert_eq!(summary.metadata.pattern, Some(ChangePattern::FeatureWithConfig));
    assert_eq!(
        summary.key_changes,
        vec![
            "annotation applied: @Bean on method weatherTools",
            "method added: weatherTools",
            "configuration added: Provider Bean",
        ]
    );
    assert!(summary.metadata.keywords.contains(&"provider".to_string()));
}

#[test]
fn test_provider_bean_diff_heuristic_messages() {
    let diff = read_fixture(diff_fixture("tool_provider_bean.diff"));
    let summary = analyze(&parse_diff(&diff));

    assert_eq!(
        synthesize(&summary, TargetLanguage::Korean),
        vec!["feat(tool): 코드 개선", "feat(tool): 프로바이더 설정"]
    );
    assert_eq!(
        synthesize(&summary, TargetLanguage::English),
        vec!["feat(tool): improve code", "feat(tool): configure providers"]
    );
}

#[test]
fn test_removed_fields_fall_back_to_intent_message() {
    let diff = read_fixture(diff_fixture("field_cleanup.diff"));
    let records = parse_diff(&diff);

    let targets: Vec<&str> = records.iter().map(|r| r.target()).collect();
    assert_eq!(targets, vec!["retries", "lastError"]);
    assert!(records.iter().all(|r| r.kind() == ChangeKind::FieldRemoved));

    let summary = analyze(&records);
    assert_eq!(summary.scope, Scope::Mcp);
    assert_eq!(summary.intent, Intent::GeneralImprovement);
    assert!(summary.key_changes.is_empty());
    assert_eq!(summary.complexity, 5);

    assert_eq!(
        synthesize(&summary, TargetLanguage::Korean),
        vec!["feat(mcp): 기능 개선"]
    );
}

#[test]
fn test_non_diff_input_yields_default_message() {
    let summary = analyze(&parse_diff("just some notes\nwith no diff markers"));

    assert!(summary.is_empty());
    assert_eq!(
        synthesize(&summary, TargetLanguage::Korean),
        vec!["feat(none): 코드 개선"]
    );
}

#[test]
fn test_prompt_carries_analysis_and_files() {
    let diff = read_fixture(diff_fixture("tool_provider_bean.diff"));
    let summary = analyze(&parse_diff(&diff));
    let files = vec!["src/main/java/com/example/ToolConfig.java".to_string()];

    let prompt = build_suggestion_prompt(&PromptInput {
        summary: &summary,
        diff: &diff,
        files: &files,
        max_suggestions: 3,
        language: TargetLanguage::Korean,
    });

    assert!(prompt.contains("- method added: weatherTools"));
    assert!(prompt.contains("- src/main/java/com/example/ToolConfig.java"));
    assert!(prompt.contains("+    @Bean"));
    assert!(prompt.contains("3. [commit message]"));
    assert!(!prompt.contains("4. [commit message]"));
}
