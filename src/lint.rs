//! Linter for parsed definitions: checks the parser deliberately leaves alone.
//!
//! ## Rules
//!
//! - **Duplicate argument**: an argument (or enum variant) name appears twice in one definition.
//! - **Duplicate deriving**: the same capability is requested twice.
//! - **Mixed constructor kinds**: definitions sharing a namespace and name (the constructors of
//!   one sum type) are declared with different kinds.
//!
//! Run the linter via the `fpp` binary: `fpp lint file.fpp`. Exit code 1 if any error-level findings.

use crate::ast::{DefinitionCollection, DefinitionKind};

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Identifies which rule produced the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintRule {
    DuplicateArgument,
    DuplicateDeriving,
    MixedConstructorKinds,
}

impl LintRule {
    pub fn id(self) -> &'static str {
        match self {
            LintRule::DuplicateArgument => "duplicate-argument",
            LintRule::DuplicateDeriving => "duplicate-deriving",
            LintRule::MixedConstructorKinds => "mixed-constructor-kinds",
        }
    }
}

/// A single lint message, located by the definition's qualified name.
#[derive(Debug, Clone)]
pub struct LintMessage {
    pub definition: String,
    pub rule: LintRule,
    pub severity: Severity,
    pub message: String,
}

/// Run all lint rules. Returns messages in collection order.
pub fn lint(collection: &DefinitionCollection) -> Vec<LintMessage> {
    let mut out = Vec::new();
    let mut reported_groups: Vec<(&str, &str)> = Vec::new();

    for definition in collection {
        let qualified = definition.qualified_name();

        // Duplicate argument names
        let mut seen: Vec<&str> = Vec::new();
        for argument in &definition.arguments {
            let name = argument.name.as_str();
            if seen.contains(&name) {
                out.push(LintMessage {
                    definition: qualified.clone(),
                    rule: LintRule::DuplicateArgument,
                    severity: Severity::Error,
                    message: format!("argument `{}` declared more than once", name),
                });
            } else {
                seen.push(name);
            }
        }

        // Duplicate derivings
        for (i, deriving) in definition.derivings.iter().enumerate() {
            if definition.derivings[..i].contains(deriving) {
                out.push(LintMessage {
                    definition: qualified.clone(),
                    rule: LintRule::DuplicateDeriving,
                    severity: Severity::Warning,
                    message: format!("deriving `{}` requested more than once", deriving),
                });
            }
        }

        // Constructors of one type must agree on kind; reported once per group
        let key = (definition.namespace.as_str(), definition.name.as_str());
        if reported_groups.contains(&key) {
            continue;
        }
        let constructors = collection.constructors_of(&definition.namespace, &definition.name);
        let kinds: Vec<DefinitionKind> = constructors.iter().map(|d| d.kind).collect();
        if kinds.iter().any(|k| *k != definition.kind) {
            reported_groups.push(key);
            out.push(LintMessage {
                definition: qualified,
                rule: LintRule::MixedConstructorKinds,
                severity: Severity::Error,
                message: format!(
                    "{} constructors declared with different kinds: {:?}",
                    constructors.len(),
                    kinds
                ),
            });
        }
    }

    out
}
