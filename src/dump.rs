//! Emission orchestration: walks a collection, groups constructors of one sum
//! type and hands each to a [`Dumper`] with the class keyword it should use.
//! Rendering itself (templates, target syntax) belongs to the dumper.
//! [`AggregateChangedDumper`] is the one concrete dumper shipped here.

use crate::ast::{Definition, DefinitionCollection, DefinitionKind};

/// Header written once at the top of generated output.
pub const GENERATED_HEADER: &str = "<?php\n\n// this file is auto-generated by fpp\n// don't edit this file manually\n\ndeclare(strict_types=1);\n\n";

/// Base class of every generated aggregate-changed event.
pub const AGGREGATE_CHANGED_BASE: &str = "\\Prooph\\EventSourcing\\AggregateChanged";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DumpError {
    #[error("{name}: an aggregate-changed event needs at least one argument (the aggregate id)")]
    MissingAggregateId { name: String },

    #[error("{name}: only message declarations can be dumped as aggregate-changed events, found {kind:?}")]
    UnsupportedKind { name: String, kind: DefinitionKind },

    #[error("{name}: aggregate-changed events cannot have several constructors")]
    SumTypeNotSupported { name: String },
}

/// Class modifier for an emitted constructor or base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKeyword {
    Final,
    Abstract,
}

impl ClassKeyword {
    /// Keyword text followed by a space.
    pub fn as_prefix(self) -> &'static str {
        match self {
            ClassKeyword::Final => "final ",
            ClassKeyword::Abstract => "abstract ",
        }
    }
}

/// Renders one definition. `constructor` is `None` when the abstract base of
/// a multi-constructor type is requested.
pub trait Dumper {
    fn dump(
        &self,
        definition: &Definition,
        constructor: Option<&Definition>,
        collection: &DefinitionCollection,
        keyword: ClassKeyword,
    ) -> Result<String, DumpError>;
}

/// Plain rendering closures never fail.
impl<F> Dumper for F
where
    F: Fn(&Definition, Option<&Definition>, &DefinitionCollection, ClassKeyword) -> String,
{
    fn dump(
        &self,
        definition: &Definition,
        constructor: Option<&Definition>,
        collection: &DefinitionCollection,
        keyword: ClassKeyword,
    ) -> Result<String, DumpError> {
        Ok(self(definition, constructor, collection, keyword))
    }
}

/// Emit every definition in the collection through `dumper`.
///
/// Definitions sharing a namespace and name are emitted together at the first
/// one's position. A lone constructor is `Final`; several constructors are
/// each `Final` and are followed by their `Abstract` base.
pub fn dump(collection: &DefinitionCollection, dumper: &dyn Dumper) -> Result<String, DumpError> {
    let mut code = String::from(GENERATED_HEADER);
    let mut seen: Vec<(&str, &str)> = Vec::new();

    for definition in collection {
        let key = (definition.namespace.as_str(), definition.name.as_str());
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);

        let constructors = collection.constructors_of(&definition.namespace, &definition.name);
        tracing::debug!(
            name = %definition.qualified_name(),
            constructors = constructors.len(),
            "dumping definition"
        );

        for constructor in &constructors {
            code.push_str(&dumper.dump(definition, Some(*constructor), collection, ClassKeyword::Final)?);
        }
        if constructors.len() > 1 {
            code.push_str(&dumper.dump(definition, None, collection, ClassKeyword::Abstract)?);
        }
    }

    if code.ends_with('\n') {
        code.pop();
    }
    Ok(code)
}

/// Message name used by generated message classes: the declared override, or
/// `\Namespace\Name`.
pub fn default_message_name(definition: &Definition) -> String {
    match &definition.message_name {
        Some(name) => name.clone(),
        None => format!("\\{}", definition.qualified_name()),
    }
}

/// Renders message declarations as prooph `AggregateChanged` event classes.
///
/// The first argument is the aggregate id passed to `occur`; the remaining
/// arguments form the payload. Every argument gets a private property and a
/// lazy accessor reading from the payload. Namespaced events are wrapped in a
/// braced `namespace` block and indented by four spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateChangedDumper;

impl AggregateChangedDumper {
    fn render(event: &Definition) -> Result<String, DumpError> {
        if event.kind != DefinitionKind::Message {
            return Err(DumpError::UnsupportedKind {
                name: event.qualified_name(),
                kind: event.kind,
            });
        }
        let (aggregate_id, payload) = event.arguments.split_first().ok_or_else(|| {
            DumpError::MissingAggregateId {
                name: event.qualified_name(),
            }
        })?;

        let namespaced = !event.namespace.is_empty();
        let i = if namespaced { "    " } else { "" };
        let mut lines: Vec<String> = Vec::new();

        if namespaced {
            lines.push(format!("namespace {} {{", event.namespace));
        }
        lines.push(format!("{i}final class {} extends {}", event.name, AGGREGATE_CHANGED_BASE));
        lines.push(format!("{i}{{"));
        lines.push(format!("{i}    protected $messageName = '{}';", default_message_name(event)));
        for arg in &event.arguments {
            lines.push(format!("{i}    private ${};", arg.name));
        }
        lines.push(String::new());

        let params: Vec<String> = event
            .arguments
            .iter()
            .map(|arg| match &arg.typehint {
                Some(t) => format!("{} ${}", t, arg.name),
                None => format!("${}", arg.name),
            })
            .collect();
        lines.push(format!("{i}    public static function withData({})", params.join(", ")));
        lines.push(format!("{i}    {{"));
        lines.push(format!("{i}        $event = self::occur(${}, [", aggregate_id.name));
        for arg in payload {
            lines.push(format!("{i}            '{0}' => ${0},", arg.name));
        }
        lines.push(format!("{i}        ]);"));
        lines.push(String::new());
        for arg in &event.arguments {
            lines.push(format!("{i}        $event->{0} = ${0};", arg.name));
        }
        lines.push(String::new());
        lines.push(format!("{i}        return $event;"));
        lines.push(format!("{i}    }}"));

        for arg in &event.arguments {
            let return_type = arg
                .typehint
                .as_ref()
                .map(|t| format!(": {}", t))
                .unwrap_or_default();
            lines.push(String::new());
            lines.push(format!("{i}    public function {}(){}", arg.name, return_type));
            lines.push(format!("{i}    {{"));
            lines.push(format!("{i}        if (! isset($this->{})) {{", arg.name));
            lines.push(format!("{i}            $this->{0} = $this->payload['{0}'];", arg.name));
            lines.push(format!("{i}        }}"));
            lines.push(String::new());
            lines.push(format!("{i}        return $this->{};", arg.name));
            lines.push(format!("{i}    }}"));
        }

        lines.push(format!("{i}}}"));
        if namespaced {
            lines.push("}".to_string());
        }

        let mut code = lines.join("\n");
        code.push_str("\n\n");
        Ok(code)
    }
}

impl Dumper for AggregateChangedDumper {
    fn dump(
        &self,
        definition: &Definition,
        constructor: Option<&Definition>,
        _collection: &DefinitionCollection,
        _keyword: ClassKeyword,
    ) -> Result<String, DumpError> {
        match constructor {
            Some(event) => Self::render(event),
            None => Err(DumpError::SumTypeNotSupported {
                name: definition.qualified_name(),
            }),
        }
    }
}
