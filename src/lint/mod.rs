//! Static analysis of theme documents.
//!
//! Findings never abort compilation. They cover:
//! - `dead-rule`: an earlier token rule already selects an ancestor scope
//! - `duplicate-scope`: an earlier token rule has exactly the same scope set
//! - `malformed-selector`: a semantic token selector that does not parse
//!
//! [`lint`] works on an unresolved [`EffectiveDocument`]; [`lint_resolved`]
//! runs the same checks on a [`ResolvedDocument`] during compilation.

mod finding;
mod scope_trie;

pub use finding::{codes, Finding, LintReport, Severity};
pub use scope_trie::{Ancestor, ScopeTrie};

use std::collections::{BTreeSet, HashMap};

use crate::output::Printer;
use crate::resolve::{ResolvedDocument, ResolvedRule};
use crate::types::{describe_rule, EffectiveDocument, SemanticSelector, TokenColorRule};

/// A token rule as seen by the linter.
pub trait ScopedRule {
    fn name(&self) -> Option<&str>;
    fn scopes(&self) -> &[String];
}

impl ScopedRule for TokenColorRule {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

impl ScopedRule for ResolvedRule {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

/// Lint a merged document without resolving it.
pub fn lint(effective: &EffectiveDocument) -> LintReport {
    let doc = &effective.document;
    let mut report = check_rules(&doc.token_colors);
    report.merge(check_selectors(doc.semantic_token_colors.keys()));
    tracing::debug!(findings = report.len(), "linted effective document");
    report
}

/// Lint a resolved document.
pub fn lint_resolved(doc: &ResolvedDocument) -> LintReport {
    let mut report = check_rules(&doc.token_colors);
    report.merge(check_selectors(doc.semantic_token_colors.keys()));
    tracing::debug!(theme = %doc.name, findings = report.len(), "linted resolved document");
    report
}

/// Report rules shadowed by, or duplicating, an earlier rule.
pub fn check_rules<R: ScopedRule>(rules: &[R]) -> LintReport {
    let mut report = LintReport::new();
    let mut trie = ScopeTrie::new();
    let mut first_with_set: HashMap<BTreeSet<&str>, usize> = HashMap::new();

    for (i, rule) in rules.iter().enumerate() {
        let set: BTreeSet<&str> = rule.scopes().iter().map(|s| s.trim()).collect();
        let subject = format!("tokenColors[{}]", i);
        let this = describe_rule(i, rule.name());

        let duplicate_of = first_with_set.get(&set).copied();
        if let Some(j) = duplicate_of {
            let earlier = describe_rule(j, rules[j].name());
            report.push(
                Finding::warning(
                    codes::DUPLICATE_SCOPE,
                    &subject,
                    format!("rule {} repeats the scopes of earlier rule {}", this, earlier),
                )
                .with_help(format!("Merge the settings into rule {} or remove one", earlier)),
            );
        }

        // Shortest ancestor from the earliest covering rule, skipping the duplicate pair
        let shadow = rule
            .scopes()
            .iter()
            .flat_map(|scope| {
                trie.ancestors(scope)
                    .into_iter()
                    .map(move |ancestor| (ancestor, scope.trim()))
            })
            .filter(|(ancestor, _)| Some(ancestor.rule) != duplicate_of)
            .min_by_key(|(ancestor, _)| ancestor.rule);

        if let Some((ancestor, scope)) = shadow {
            let earlier = describe_rule(ancestor.rule, rules[ancestor.rule].name());
            report.push(
                Finding::warning(
                    codes::DEAD_RULE,
                    &subject,
                    format!(
                        "rule {} is shadowed by earlier rule {}: `{}` already covers `{}`",
                        this, earlier, ancestor.scope, scope
                    ),
                )
                .with_help(format!("Move rule {} before rule {}, or remove it", this, earlier)),
            );
        }

        for scope in rule.scopes() {
            trie.insert(scope, i);
        }
        first_with_set.entry(set).or_insert(i);
    }

    report
}

/// Report semantic selectors that do not parse.
pub fn check_selectors<'a>(selectors: impl IntoIterator<Item = &'a String>) -> LintReport {
    let mut report = LintReport::new();
    for selector in selectors {
        if let Err(e) = SemanticSelector::parse(selector) {
            report.push(
                Finding::error(
                    codes::MALFORMED_SELECTOR,
                    format!("semanticTokenColors.{}", selector),
                    e.to_string(),
                )
                .with_help("Selectors have the form type[.modifier]*[:language], e.g. variable.readonly:rust"),
            );
        }
    }
    report
}

/// Print findings to stderr.
pub fn print_findings(printer: &Printer, report: &LintReport) {
    for f in report.iter() {
        let label = printer.severity(&f.severity.to_string(), f.severity == Severity::Error);
        eprintln!("  {}[{}]: {} {}", label, f.code, printer.dim(&f.subject), f.message);
        if let Some(help) = &f.help {
            eprintln!("    help: {}", help);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_chain;
    use crate::parser::parse_document;
    use pretty_assertions::assert_eq;

    fn lint_source(body: &str) -> LintReport {
        let doc = parse_document(body, "lint.sassy.yml").unwrap();
        lint(&merge_chain(&[doc]).unwrap())
    }

    fn codes_of(report: &LintReport) -> Vec<(&'static str, String)> {
        report.iter().map(|f| (f.code, f.subject.clone())).collect()
    }

    #[test]
    fn test_clean_rules() {
        let report = lint_source(
            r#"
tokenColors:
  - scope: comment
    settings: { fontStyle: italic }
  - scope: string
    settings: { fontStyle: bold }
"#,
        );
        assert!(report.is_clean());
    }

    #[test]
    fn test_dead_rule_names_both_rules() {
        let report = lint_source(
            r#"
tokenColors:
  - name: Comments
    scope: comment
    settings: { fontStyle: italic }
  - name: Line comments
    scope: comment.line
    settings: { fontStyle: bold }
"#,
        );

        assert_eq!(codes_of(&report), vec![(codes::DEAD_RULE, "tokenColors[1]".to_string())]);
        let message = &report.iter().next().unwrap().message;
        assert!(message.contains("#1 \"Line comments\""));
        assert!(message.contains("#0 \"Comments\""));
    }

    #[test]
    fn test_later_broader_rule_is_not_dead() {
        let report = lint_source(
            r#"
tokenColors:
  - scope: comment.line
    settings: { fontStyle: bold }
  - scope: comment
    settings: { fontStyle: italic }
"#,
        );
        assert!(report.is_clean());
    }

    #[test]
    fn test_duplicate_scope_replaces_dead_rule() {
        let report = lint_source(
            r#"
tokenColors:
  - scope: [keyword, storage]
    settings: { fontStyle: bold }
  - scope: storage, keyword
    settings: { fontStyle: italic }
"#,
        );
        assert_eq!(
            codes_of(&report),
            vec![(codes::DUPLICATE_SCOPE, "tokenColors[1]".to_string())]
        );
    }

    #[test]
    fn test_duplicate_and_dead_from_different_rules() {
        let report = lint_source(
            r#"
tokenColors:
  - scope: keyword
    settings: { fontStyle: bold }
  - scope: keyword.control
    settings: { fontStyle: italic }
  - scope: keyword.control
    settings: { fontStyle: underline }
"#,
        );
        assert_eq!(
            codes_of(&report),
            vec![
                (codes::DEAD_RULE, "tokenColors[1]".to_string()),
                (codes::DUPLICATE_SCOPE, "tokenColors[2]".to_string()),
                (codes::DEAD_RULE, "tokenColors[2]".to_string()),
            ]
        );
    }

    #[test]
    fn test_malformed_selector_is_error() {
        let report = lint_source(
            r##"
semanticTokenColors:
  variable.readonly: "#ffffff"
  "function..static": "#ffffff"
"##,
        );
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            codes_of(&report),
            vec![(
                codes::MALFORMED_SELECTOR,
                "semanticTokenColors.function..static".to_string()
            )]
        );
    }
}
