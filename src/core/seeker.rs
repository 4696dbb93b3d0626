//! Finds references to container entities in spec files and Java sources.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::core::{
    Definition, Origin, Reference, SourceContext, SourceLocation, UnresolvedReason,
    UnresolvedReference,
    containers::IzContainer,
    parsers::{
        java::{Argument, JavaSource, classify_argument, is_comment_line},
        xml::XmlDocument,
    },
};

/// References found in source code.
#[derive(Debug, Default, Clone)]
pub struct SourceHits {
    pub references: Vec<Reference>,
    pub unresolved: Vec<UnresolvedReference>,
}

impl SourceHits {
    fn extend(&mut self, other: SourceHits) {
        self.references.extend(other.references);
        self.unresolved.extend(other.unresolved);
    }
}

/// Every key referenced by attributes of elements the container accepts.
pub fn search_specs_for_attributes(
    specs: &[&XmlDocument],
    container: &dyn IzContainer,
) -> Vec<Reference> {
    let mut references = Vec::new();
    for doc in specs {
        for element in doc.elements() {
            if !container.has_reference(element) {
                continue;
            }
            for attr in container.attributes() {
                let Some(value) = element.attr(attr) else {
                    continue;
                };
                for key in container.transform_reference(value) {
                    if key.is_empty() || container.is_white_listed(&key) {
                        continue;
                    }
                    references.push(Reference::new(key, doc.context(element)));
                }
            }
        }
    }
    references
}

/// Scan sources in parallel with the container's call patterns.
pub fn find_references_in_source(
    sources: &[JavaSource],
    container: &dyn IzContainer,
) -> SourceHits {
    if container.source_patterns().is_empty() {
        return SourceHits::default();
    }

    let per_file: Vec<SourceHits> = sources
        .par_iter()
        .map(|source| scan_source(source, container))
        .collect();

    let mut hits = SourceHits::default();
    for file_hits in per_file {
        hits.extend(file_hits);
    }
    hits
}

fn scan_source(source: &JavaSource, container: &dyn IzContainer) -> SourceHits {
    let mut hits = SourceHits::default();

    for (line_no, line) in source.lines() {
        if is_comment_line(line) || container.is_white_listed(line) {
            continue;
        }

        for pattern in container.source_patterns() {
            for caps in pattern.regex.captures_iter(line) {
                let Some(arg) = caps.get(1) else {
                    continue;
                };
                let col = line[..arg.start()].chars().count() + 1;
                let context = || {
                    SourceContext::new(
                        SourceLocation::new(&source.path, line_no, col),
                        line,
                        Origin::Code,
                    )
                };

                let reason = match classify_argument(arg.as_str()) {
                    Argument::Literal(key) => {
                        push_key(&mut hits, container, key, context());
                        continue;
                    }
                    Argument::Identifier(name) => match source.resolve(name) {
                        Some(key) => {
                            push_key(&mut hits, container, key, context());
                            continue;
                        }
                        None => UnresolvedReason::RuntimeVariable {
                            name: name.to_string(),
                        },
                    },
                    Argument::Compound => UnresolvedReason::CompoundExpression,
                    Argument::FieldAccess => UnresolvedReason::FieldAccess,
                    Argument::Other => continue,
                };

                if pattern.strict {
                    hits.unresolved.push(UnresolvedReference {
                        expression: arg.as_str().trim().to_string(),
                        reason,
                        context: context(),
                    });
                }
            }
        }
    }

    hits
}

fn push_key(hits: &mut SourceHits, container: &dyn IzContainer, key: &str, context: SourceContext) {
    if key.is_empty() || container.is_white_listed(key) {
        return;
    }
    hits.references.push(Reference::new(key, context));
}

/// Spec and source references whose key is exactly `id`.
pub fn find_id_references(
    id: &str,
    specs: &[&XmlDocument],
    sources: &[JavaSource],
    container: &dyn IzContainer,
) -> Vec<Reference> {
    let mut references: Vec<Reference> = search_specs_for_attributes(specs, container)
        .into_iter()
        .filter(|reference| reference.key == id)
        .collect();
    references.extend(
        find_references_in_source(sources, container)
            .references
            .into_iter()
            .filter(|reference| reference.key == id),
    );
    references
}

/// References whose key the container does not define.
pub fn undefined<'a>(container: &dyn IzContainer, references: &'a [Reference]) -> Vec<&'a Reference> {
    references
        .iter()
        .filter(|reference| !container.is_defined(&reference.key))
        .collect()
}

/// Definitions whose key is not referenced.
pub fn unused<'a>(
    definitions: &'a BTreeMap<String, Definition>,
    referenced: &BTreeSet<&str>,
) -> Vec<&'a Definition> {
    definitions
        .iter()
        .filter(|(key, _)| !referenced.contains(key.as_str()))
        .map(|(_, definition)| definition)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::containers::{IzConditions, IzStrings, IzVariables};

    fn installer_foo() -> JavaSource {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/sample_installer/src/com/sample/installer/Foo.java");
        JavaSource::read(&path, "src/com/sample/installer/Foo.java").unwrap()
    }

    fn keys(references: &[Reference]) -> Vec<&str> {
        references.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn test_string_references_in_source() {
        let hits = find_references_in_source(&[installer_foo()], &IzStrings::default());
        assert_eq!(
            keys(&hits.references),
            vec![
                "some.string.1",
                "my.error.message.id.test",
                "some.string.2",
                "some.string.4",
                "some.string.3",
                "some.string.5",
                "some.string.6",
            ]
        );
        assert!(hits.unresolved.is_empty());
    }

    #[test]
    fn test_source_reference_location() {
        let hits = find_references_in_source(&[installer_foo()], &IzStrings::default());
        let first = &hits.references[0];
        assert_eq!(first.context.file_path(), "src/com/sample/installer/Foo.java");
        assert_eq!(first.context.line(), 14);
        assert_eq!(first.context.col(), 47);
        assert_eq!(first.context.origin, Origin::Code);
    }

    #[test]
    fn test_condition_and_variable_references_in_source() {
        let sources = [installer_foo()];
        let conditions = find_references_in_source(&sources, &IzConditions::default());
        assert_eq!(keys(&conditions.references), vec!["some.condition.1"]);

        let variables = find_references_in_source(&sources, &IzVariables::default());
        assert_eq!(
            keys(&variables.references),
            vec!["some.undefined.var.1", "some.other.undefined.var"]
        );
    }

    #[test]
    fn test_condition_calls_with_extra_arguments() {
        let source = JavaSource::new(
            "Listener.java",
            "if (rules.isConditionTrue(\"missing.cond\", idata)) {}\n\
             Condition c = rules.getCondition(conditionId, false);\n",
        );
        let hits = find_references_in_source(&[source], &IzConditions::default());
        assert_eq!(keys(&hits.references), vec!["missing.cond"]);
        assert_eq!(hits.references[0].context.col(), 27);
        assert_eq!(
            hits.unresolved[0].reason,
            UnresolvedReason::RuntimeVariable {
                name: "conditionId".to_string()
            }
        );
    }

    #[test]
    fn test_unresolved_arguments() {
        let source = JavaSource::new(
            "Panel.java",
            "String a = idata.langpack.getString(prefix + \".title\");\n\
             String b = idata.langpack.getString(runtimeKey);\n\
             String c = idata.langpack.getString(Keys.TITLE);\n\
             System.out.println(message);\n",
        );
        let hits = find_references_in_source(&[source], &IzStrings::default());
        assert!(hits.references.is_empty());

        let reasons: Vec<&UnresolvedReason> = hits.unresolved.iter().map(|u| &u.reason).collect();
        assert_eq!(
            reasons,
            vec![
                &UnresolvedReason::CompoundExpression,
                &UnresolvedReason::RuntimeVariable {
                    name: "runtimeKey".to_string()
                },
                &UnresolvedReason::FieldAccess,
            ]
        );
        assert_eq!(hits.unresolved[1].expression, "runtimeKey");
    }

    #[test]
    fn test_comment_and_white_listed_lines_are_skipped() {
        let source = JavaSource::new(
            "Panel.java",
            "// idata.langpack.getString(\"commented\");\n\
             \x20* idata.langpack.getString(\"javadoc\");\n\
             UserInputPanel.langpack.getString(\"white.listed\");\n\
             idata.langpack.getString(\"kept\");\n",
        );
        let hits = find_references_in_source(&[source], &IzStrings::default());
        assert_eq!(keys(&hits.references), vec!["kept"]);
    }

    #[test]
    fn test_spec_attribute_references() {
        let doc = XmlDocument::parse_str(
            "panels.xml",
            r#"<panels>
  <panel id="a" condition="c1+!c2"/>
  <panel id="b" condition="izpack.windowsinstall"/>
  <field variable="v" conditionid="c3"/>
</panels>"#,
        )
        .unwrap();
        let references = search_specs_for_attributes(&[&doc], &IzConditions::default());
        assert_eq!(keys(&references), vec!["c1", "c2", "c3"]);
        assert_eq!(references[2].context.line(), 4);
        assert_eq!(references[2].context.origin, Origin::Spec);
    }

    #[test]
    fn test_find_id_references() {
        let doc = XmlDocument::parse_str(
            "panels.xml",
            r#"<panels><panel condition="some.condition.1"/><panel condition="other"/></panels>"#,
        )
        .unwrap();
        let references = find_id_references(
            "some.condition.1",
            &[&doc],
            &[installer_foo()],
            &IzConditions::default(),
        );
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].context.origin, Origin::Spec);
        assert_eq!(references[1].context.line(), 25);
    }

    #[test]
    fn test_undefined_and_unused() {
        let doc = XmlDocument::parse_str(
            "conditions.xml",
            r#"<conditions><condition type="java" id="used"/><condition type="java" id="idle"/></conditions>"#,
        )
        .unwrap();
        let conditions = IzConditions::from_document(Some(&doc), &[]);
        let ctx = doc.context(&doc.root);
        let references = vec![
            Reference::new("used", ctx.clone()),
            Reference::new("missing", ctx.clone()),
            Reference::new("izpack.linuxinstall", ctx),
        ];

        let missing = undefined(&conditions, &references);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].key, "missing");

        let referenced: BTreeSet<&str> = references.iter().map(|r| r.key.as_str()).collect();
        let idle = unused(conditions.definitions(), &referenced);
        assert_eq!(idle.len(), 1);
        assert_eq!(idle[0].key, "idle");
    }
}
