//! # fppdsl: declaration DSL front end
//!
//! Parses a small DSL of algebraic-style declarations (data records, enums and
//! message declarations) into an ordered [`DefinitionCollection`] that a code
//! emission layer renders through [`dump()`](dump::dump), for example as
//! event classes with [`AggregateChangedDumper`].
//!
//! ## DSL structure
//!
//! - **Namespaces**: `namespace App\Model;` (rest of file) or `namespace App { ... }` (block)
//! - **Data**: `data Name = { Type $field, ... } [deriving (Cap, ...)]`
//! - **Enums**: `enum Name = A | B | C`
//! - **Messages**: `command`, `domainEvent`, `aggregateChanged`, `query`:
//!   `command Name [: MessageName] = { Type $field, ... }`
//!
//! Types may be nullable (`?int`) or qualified (`\DateTimeImmutable`, `App\Email`).
//! Comments (`//`, `#`, `/* */`) count as whitespace.
//!
//! ## Example DSL
//!
//! ```text
//! namespace App\Model {
//!     data Person = { string $name, ?int $age } deriving (Equals, ToArray)
//!     enum Color = Red | Green | Blue
//!     command Register : App\Commands\RegisterUser = { string $email }
//! }
//! ```
//!
//! ## Usage
//!
//! See `tests/dsl.rs` for full examples and the `fpp` binary for the command line.

pub mod ast;
pub mod dump;
pub mod error;
pub mod lexer;
pub mod lint;
pub mod parser;

pub use ast::{
    Argument, DeclarationKeyword, Definition, DefinitionCollection, DefinitionKind, Deriving,
};
pub use dump::{
    default_message_name, dump, AggregateChangedDumper, ClassKeyword, DumpError, Dumper,
};
pub use error::ParseError;
pub use lexer::{tokenize, Token, TokenClass, TokenStream};
pub use parser::{parse, Parser};
