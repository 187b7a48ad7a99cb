//! Heuristic one-line messages built from an analysis summary alone.

use crate::analysis::{AnalysisSummary, Intent};
use crate::llm::TargetLanguage;

/// Maximum number of synthesized messages.
pub const MAX_SYNTHESIZED: usize = 3;

/// Complexity above which a change set reads as a feature.
const FEATURE_COMPLEXITY: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phrase {
    MethodAdded,
    ClassAdded,
    ConfigurationAdded,
    CodeModified,
    CodeImproved,
    ToolAutoDiscovery,
    ComponentAutoRegistration,
    ProviderConfiguration,
    AnnotationBasedFeature,
    FeatureImproved,
}

impl Phrase {
    fn render(self, language: TargetLanguage) -> &'static str {
        match language {
            TargetLanguage::Korean => match self {
                Phrase::MethodAdded => "메서드 추가",
                Phrase::ClassAdded => "클래스 추가",
                Phrase::ConfigurationAdded => "설정 추가",
                Phrase::CodeModified => "코드 수정",
                Phrase::CodeImproved => "코드 개선",
                Phrase::ToolAutoDiscovery => "도구 자동 검색 기능",
                Phrase::ComponentAutoRegistration => "컴포넌트 자동 등록",
                Phrase::ProviderConfiguration => "프로바이더 설정",
                Phrase::AnnotationBasedFeature => "어노테이션 기반 기능",
                Phrase::FeatureImproved => "기능 개선",
            },
            TargetLanguage::English => match self {
                Phrase::MethodAdded => "add method",
                Phrase::ClassAdded => "add class",
                Phrase::ConfigurationAdded => "add configuration",
                Phrase::CodeModified => "modify code",
                Phrase::CodeImproved => "improve code",
                Phrase::ToolAutoDiscovery => "add tool auto-discovery",
                Phrase::ComponentAutoRegistration => "register components automatically",
                Phrase::ProviderConfiguration => "configure providers",
                Phrase::AnnotationBasedFeature => "add annotation-based feature",
                Phrase::FeatureImproved => "improve functionality",
            },
        }
    }
}

/// Produce up to three distinct `type(scope): phrase` messages without
/// calling a model.
pub fn synthesize(summary: &AnalysisSummary, language: TargetLanguage) -> Vec<String> {
    let commit_type = guess_type(summary);
    let scope = summary.scope.as_str();
    let render = |phrase: Phrase| format!("{commit_type}({scope}): {}", phrase.render(language));

    let mut messages = Vec::new();

    if let Some(primary) = summary.key_changes.first() {
        messages.push(render(simplify_change(primary)));
    }

    if let Some(phrase) = simplify_intent(&summary.intent) {
        messages.push(render(phrase));
    }

    if messages.is_empty() {
        messages.push(render(Phrase::CodeImproved));
    }

    let mut unique: Vec<String> = Vec::new();
    for message in messages {
        if !unique.contains(&message) {
            unique.push(message);
        }
    }
    unique.truncate(MAX_SYNTHESIZED);
    unique
}

/// `fix` wins over the complexity check; everything else is a feature.
fn guess_type(summary: &AnalysisSummary) -> &'static str {
    if summary.intent.as_str().contains("fix") {
        return "fix";
    }
    if summary.complexity > FEATURE_COMPLEXITY {
        return "feat";
    }
    "feat"
}

fn simplify_change(change: &str) -> Phrase {
    if change.contains("method added") {
        Phrase::MethodAdded
    } else if change.contains("class added") {
        Phrase::ClassAdded
    } else if change.contains("configuration added") {
        Phrase::ConfigurationAdded
    } else if change.contains("modified") {
        Phrase::CodeModified
    } else {
        Phrase::CodeImproved
    }
}

/// `None` when there is no intent to describe.
fn simplify_intent(intent: &Intent) -> Option<Phrase> {
    match intent {
        Intent::NoChanges => None,
        Intent::Other(label) if label.trim().is_empty() => None,
        Intent::ToolAutoDiscovery => Some(Phrase::ToolAutoDiscovery),
        Intent::ComponentAutoRegistration => Some(Phrase::ComponentAutoRegistration),
        Intent::ProviderConfiguration => Some(Phrase::ProviderConfiguration),
        Intent::AnnotationBasedFeature => Some(Phrase::AnnotationBasedFeature),
        Intent::GeneralImprovement | Intent::Other(_) => Some(Phrase::FeatureImproved),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisMetadata, Scope};

    fn summary(intent: Intent, scope: Scope, key_changes: &[&str], complexity: u8) -> AnalysisSummary {
        AnalysisSummary {
            intent,
            scope,
            key_changes: key_changes.iter().map(|s| s.to_string()).collect(),
            complexity,
            metadata: AnalysisMetadata {
                total_changes: 1,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_key_change_and_intent_messages() {
        let s = summary(
            Intent::ToolAutoDiscovery,
            Scope::Tool,
            &["method added: registerTools"],
            5,
        );
        assert_eq!(
            synthesize(&s, TargetLanguage::Korean),
            vec!["feat(tool): 메서드 추가", "feat(tool): 도구 자동 검색 기능"]
        );
        assert_eq!(
            synthesize(&s, TargetLanguage::English),
            vec!["feat(tool): add method", "feat(tool): add tool auto-discovery"]
        );
    }

    #[test]
    fn test_fix_intent_wins_over_complexity() {
        let s = summary(Intent::Other("bugfix".into()), Scope::Core, &[], 9);
        assert_eq!(synthesize(&s, TargetLanguage::Korean), vec!["fix(core): 기능 개선"]);
    }

    #[test]
    fn test_messages_are_distinct() {
        let s = summary(Intent::GeneralImprovement, Scope::Core, &["import_added: x"], 2);
        let messages = synthesize(&s, TargetLanguage::English);
        assert_eq!(messages, vec!["feat(core): improve code", "feat(core): improve functionality"]);

        let s = summary(Intent::NoChanges, Scope::Core, &["field modified: x"], 2);
        assert_eq!(synthesize(&s, TargetLanguage::English), vec!["feat(core): modify code"]);
    }

    #[test]
    fn test_empty_summary_falls_back_to_code_improvement() {
        let messages = synthesize(&AnalysisSummary::empty(), TargetLanguage::Korean);
        assert_eq!(messages, vec!["feat(none): 코드 개선"]);
    }

    #[test]
    fn test_never_more_than_three() {
        let s = summary(
            Intent::ProviderConfiguration,
            Scope::App,
            &["configuration added: Provider Bean", "method added: a", "method added: b"],
            10,
        );
        let messages = synthesize(&s, TargetLanguage::Korean);
        assert!(messages.len() <= MAX_SYNTHESIZED);
        assert_eq!(messages[0], "feat(app): 설정 추가");
    }
}
