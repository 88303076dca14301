//! Declaration model produced by the parser.

use std::fmt;

/// Kind of a parsed declaration.
///
/// `command`, `domainEvent`, `aggregateChanged` and `query` all map to
/// [`DefinitionKind::Message`]; the keyword used is not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Data,
    Enum,
    Message,
}

/// Leading keyword of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKeyword {
    Data,
    Enum,
    Command,
    DomainEvent,
    AggregateChanged,
    Query,
}

impl DeclarationKeyword {
    /// Match a word after upper-casing its first letter, so `data` and `Data`
    /// both match but `DATA` does not.
    pub fn from_word(word: &str) -> Option<Self> {
        let mut chars = word.chars();
        let first = chars.next()?;
        let normalized: String = first.to_uppercase().chain(chars).collect();
        match normalized.as_str() {
            "Data" => Some(DeclarationKeyword::Data),
            "Enum" => Some(DeclarationKeyword::Enum),
            "Command" => Some(DeclarationKeyword::Command),
            "DomainEvent" | "Domain_event" => Some(DeclarationKeyword::DomainEvent),
            "AggregateChanged" | "Aggregate_changed" => Some(DeclarationKeyword::AggregateChanged),
            "Query" => Some(DeclarationKeyword::Query),
            _ => None,
        }
    }

    pub fn kind(self) -> DefinitionKind {
        match self {
            DeclarationKeyword::Data => DefinitionKind::Data,
            DeclarationKeyword::Enum => DefinitionKind::Enum,
            DeclarationKeyword::Command
            | DeclarationKeyword::DomainEvent
            | DeclarationKeyword::AggregateChanged
            | DeclarationKeyword::Query => DefinitionKind::Message,
        }
    }
}

/// A generated capability requested by a `deriving` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deriving {
    Equals,
    FromArray,
    FromScalar,
    FromString,
    ToArray,
    ToScalar,
    ToString,
    Uuid,
}

impl Deriving {
    pub const ALL: [Deriving; 8] = [
        Deriving::Equals,
        Deriving::FromArray,
        Deriving::FromScalar,
        Deriving::FromString,
        Deriving::ToArray,
        Deriving::ToScalar,
        Deriving::ToString,
        Deriving::Uuid,
    ];

    /// Exact, case-sensitive catalog lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Deriving::Equals => "Equals",
            Deriving::FromArray => "FromArray",
            Deriving::FromScalar => "FromScalar",
            Deriving::FromString => "FromString",
            Deriving::ToArray => "ToArray",
            Deriving::ToScalar => "ToScalar",
            Deriving::ToString => "ToString",
            Deriving::Uuid => "Uuid",
        }
    }
}

impl fmt::Display for Deriving {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named field, or an enum variant when `typehint` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    /// Declared type; a leading `?` marks it nullable.
    pub typehint: Option<String>,
}

impl Argument {
    pub fn new(name: impl Into<String>, typehint: Option<String>) -> Self {
        Argument {
            name: name.into(),
            typehint,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.typehint.as_deref().is_some_and(|t| t.starts_with('?'))
    }

    /// Declared type without the nullability marker.
    pub fn type_name(&self) -> Option<&str> {
        self.typehint
            .as_deref()
            .map(|t| t.strip_prefix('?').unwrap_or(t))
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.typehint {
            Some(t) => write!(f, "{} ${}", t, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// One parsed declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub kind: DefinitionKind,
    /// Empty for the global namespace.
    pub namespace: String,
    pub name: String,
    /// Constructor parameters in order; for enums, the variants in order.
    pub arguments: Vec<Argument>,
    /// Requested capabilities in source order, duplicates kept.
    pub derivings: Vec<Deriving>,
    /// Override for generated message classes.
    pub message_name: Option<String>,
}

impl Definition {
    pub fn new(
        kind: DefinitionKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
        arguments: Vec<Argument>,
        derivings: Vec<Deriving>,
        message_name: Option<String>,
    ) -> Self {
        Definition {
            kind,
            namespace: namespace.into(),
            name: name.into(),
            arguments,
            derivings,
            message_name,
        }
    }

    /// `Namespace\Name`, or just `Name` in the global namespace.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}\\{}", self.namespace, self.name)
        }
    }

    pub fn has_deriving(&self, deriving: Deriving) -> bool {
        self.derivings.contains(&deriving)
    }
}

/// Canonical DSL text. Message definitions print as `command`; the keyword
/// used in source is not kept.
impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.kind {
            DefinitionKind::Data => "data",
            DefinitionKind::Enum => "enum",
            DefinitionKind::Message => "command",
        };
        write!(f, "{} {}", keyword, self.name)?;
        if let Some(message_name) = &self.message_name {
            write!(f, " : {}", message_name)?;
        }
        f.write_str(" = ")?;

        if self.kind == DefinitionKind::Enum {
            let variants: Vec<&str> = self.arguments.iter().map(|a| a.name.as_str()).collect();
            return f.write_str(&variants.join(" | "));
        }

        let fields: Vec<String> = self.arguments.iter().map(|a| a.to_string()).collect();
        if fields.is_empty() {
            f.write_str("{}")?;
        } else {
            write!(f, "{{ {} }}", fields.join(", "))?;
        }
        if !self.derivings.is_empty() {
            let names: Vec<&str> = self.derivings.iter().map(|d| d.name()).collect();
            write!(f, " deriving ({})", names.join(", "))?;
        }
        Ok(())
    }
}

/// Definitions parsed from one input, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionCollection {
    definitions: Vec<Definition>,
}

impl DefinitionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_definition(&mut self, definition: Definition) {
        self.definitions.push(definition);
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Definition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// First definition with this namespace and name.
    pub fn get(&self, namespace: &str, name: &str) -> Option<&Definition> {
        self.definitions
            .iter()
            .find(|d| d.namespace == namespace && d.name == name)
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.get(namespace, name).is_some()
    }

    /// All definitions sharing a namespace and name, i.e. the constructors of
    /// one sum type, in source order.
    pub fn constructors_of(&self, namespace: &str, name: &str) -> Vec<&Definition> {
        self.definitions
            .iter()
            .filter(|d| d.namespace == namespace && d.name == name)
            .collect()
    }

    /// Canonical DSL source; parsing it yields an equal collection.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        let mut open: Option<&str> = None;
        for definition in &self.definitions {
            let namespace = definition.namespace.as_str();
            if open != Some(namespace) {
                if open.is_some_and(|ns| !ns.is_empty()) {
                    out.push_str("}\n");
                }
                if !namespace.is_empty() {
                    out.push_str(&format!("namespace {} {{\n", namespace));
                }
                open = Some(namespace);
            }
            let indent = if namespace.is_empty() { "" } else { "    " };
            out.push_str(&format!("{}{}\n", indent, definition));
        }
        if open.is_some_and(|ns| !ns.is_empty()) {
            out.push_str("}\n");
        }
        out
    }
}

impl<'a> IntoIterator for &'a DefinitionCollection {
    type Item = &'a Definition;
    type IntoIter = std::slice::Iter<'a, Definition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.iter()
    }
}
