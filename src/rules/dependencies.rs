//! Condition dependency rule.
//!
//! Walks every known condition (defined or referenced) and reports chains
//! that reach an undefined condition or variable, and chains that loop.

use std::collections::BTreeSet;

use crate::{
    core::{
        CheckContext, EntityKind,
        containers::{IzConditions, IzContainer},
        dependencies::{DependencyProblem, check_all_dependencies},
    },
    issues::{BrokenDependencyIssue, CyclicDependencyIssue, Issue},
};

pub fn check_dependency_issues(ctx: &CheckContext) -> Vec<Issue> {
    let containers = ctx.containers();
    let conditions = &containers.conditions;

    let mut roots: BTreeSet<&str> = conditions.definitions().keys().map(String::as_str).collect();
    roots.extend(ctx.references(EntityKind::Conditions).keys());

    check_dependencies(roots, conditions, &containers.variables)
}

pub fn check_dependencies<'a>(
    roots: impl IntoIterator<Item = &'a str>,
    conditions: &IzConditions,
    variables: &dyn IzContainer,
) -> Vec<Issue> {
    check_all_dependencies(roots, conditions, variables)
        .into_iter()
        .filter_map(|problem| {
            // The failing link lives in the definition of the node before it.
            let parent = problem.parent()?;
            let context = conditions.definition(&parent.id)?.context.clone();
            Some(match problem {
                DependencyProblem::Broken(path) => {
                    Issue::BrokenDependency(BrokenDependencyIssue { context, path })
                }
                DependencyProblem::Cycle(path) => {
                    Issue::CyclicDependency(CyclicDependencyIssue { context, path })
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::{containers::IzVariables, parsers::xml::XmlDocument};
    use crate::issues::{Report, ReportLocation, Rule, Severity};
    use crate::rules::dependencies::*;

    const CONDITIONS: &str = r#"<conditions>
  <condition type="variable" id="is.h2">
    <name>db.vendor</name>
  </condition>
  <condition type="and" id="full">
    <condition type="ref" refid="is.h2"/>
    <condition type="ref" refid="missing"/>
  </condition>
  <condition type="not" id="self.loop">
    <condition type="ref" refid="self.loop"/>
  </condition>
</conditions>"#;

    #[test]
    fn test_dependency_issues() {
        let doc = XmlDocument::parse_str("conditions.xml", CONDITIONS).unwrap();
        let conditions = IzConditions::from_document(Some(&doc), &[]);
        let variables = IzVariables::from_documents(&[], &[]);

        let roots: Vec<&str> = vec!["full", "is.h2", "self.loop"];
        let issues = check_dependencies(roots, &conditions, &variables);

        let summary: Vec<(Rule, Severity, String, usize)> = issues
            .iter()
            .map(|i| (i.rule(), i.severity(), i.message(), line(i)))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Rule::BrokenDependency, Severity::Error, "missing".to_string(), 5),
                (Rule::BrokenDependency, Severity::Warning, "db.vendor".to_string(), 2),
                (Rule::CyclicDependency, Severity::Error, "self.loop".to_string(), 9),
            ]
        );
    }

    fn line(issue: &Issue) -> usize {
        match issue.location() {
            ReportLocation::Source(ctx) => ctx.line(),
            ReportLocation::File { .. } => 0,
        }
    }
}
