//! Single-pass declaration parser over the token stream.
//!
//! Each declaration kind is parsed by a flat loop that reads one token at a
//! time. The only lookahead is the token a helper hands back when it had to
//! read past the end of its construct; the main loop dispatches that token
//! next instead of reading a fresh one, so nothing between declarations is
//! dropped.

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::{Token, TokenClass, TokenStream};

/// Parse DSL source into an ordered collection of definitions.
pub fn parse(source: &str) -> Result<DefinitionCollection, ParseError> {
    Parser::new(source)?.parse()
}

/// Per-call parser state. Instances are independent of each other.
pub struct Parser {
    tokens: TokenStream,
    namespace: String,
    namespace_braced: bool,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Ok(Parser {
            tokens: TokenStream::new(source)?,
            namespace: String::new(),
            namespace_braced: false,
        })
    }

    pub fn parse(mut self) -> Result<DefinitionCollection, ParseError> {
        let mut collection = DefinitionCollection::new();
        let mut pending: Option<Token> = None;

        loop {
            let token = match pending.take() {
                Some(token) => token,
                None if self.tokens.is_exhausted() => break,
                None => self.tokens.next_token()?,
            };

            match token.class {
                TokenClass::Whitespace => {}
                TokenClass::Namespace => {
                    if self.namespace_braced {
                        return Err(ParseError::NestedNamespaceDetected { line: token.line });
                    }
                    self.parse_namespace()?;
                }
                TokenClass::Identifier => {
                    let keyword = DeclarationKeyword::from_word(&token.text).ok_or_else(|| {
                        ParseError::unexpected("declaration keyword", &token.text, token.line)
                    })?;
                    let (definition, lookahead) = self.parse_declaration(keyword)?;
                    tracing::debug!(
                        kind = ?definition.kind,
                        name = %definition.qualified_name(),
                        arguments = definition.arguments.len(),
                        "parsed definition"
                    );
                    collection.add_definition(definition);
                    pending = lookahead;
                }
                TokenClass::Other if token.is("}") && self.namespace_braced => {
                    tracing::debug!(namespace = %self.namespace, "closed namespace");
                    self.namespace.clear();
                    self.namespace_braced = false;
                }
                _ => {
                    return Err(ParseError::unexpected(
                        "identifier or whitespace",
                        &token.text,
                        token.line,
                    ))
                }
            }
        }

        if self.namespace_braced {
            tracing::debug!(
                namespace = %self.namespace,
                line = self.tokens.line(),
                "namespace block still open at end of input"
            );
        }
        Ok(collection)
    }

    fn parse_declaration(
        &mut self,
        keyword: DeclarationKeyword,
    ) -> Result<(Definition, Option<Token>), ParseError> {
        let namespace = self.namespace.clone();
        match keyword {
            DeclarationKeyword::Data => {
                let name = self.parse_name()?;
                let arguments = self.parse_arguments()?;
                let (derivings, lookahead) = self.parse_derivings(true)?;
                let definition = Definition::new(
                    DefinitionKind::Data,
                    namespace,
                    name,
                    arguments,
                    derivings,
                    None,
                );
                Ok((definition, lookahead))
            }
            DeclarationKeyword::Enum => {
                let name = self.parse_name()?;
                let (variants, lookahead) = self.parse_enum_variants()?;
                let definition =
                    Definition::new(DefinitionKind::Enum, namespace, name, variants, vec![], None);
                Ok((definition, lookahead))
            }
            DeclarationKeyword::Command
            | DeclarationKeyword::DomainEvent
            | DeclarationKeyword::AggregateChanged
            | DeclarationKeyword::Query => {
                let (name, message_name) = self.parse_name_with_message()?;
                let arguments = self.parse_arguments()?;
                let (derivings, lookahead) = self.parse_derivings(false)?;
                let definition = Definition::new(
                    keyword.kind(),
                    namespace,
                    name,
                    arguments,
                    derivings,
                    message_name,
                );
                Ok((definition, lookahead))
            }
        }
    }

    fn next(&mut self) -> Result<Token, ParseError> {
        self.tokens.next_token()
    }

    /// Read the next token, stepping over one whitespace token.
    fn next_skipping_whitespace(&mut self) -> Result<Token, ParseError> {
        let token = self.next()?;
        if token.is_whitespace() {
            self.next()
        } else {
            Ok(token)
        }
    }

    fn expect_whitespace(&mut self) -> Result<(), ParseError> {
        let token = self.next()?;
        if token.is_whitespace() {
            Ok(())
        } else {
            Err(ParseError::unexpected("whitespace", &token.text, token.line))
        }
    }

    fn expect_identifier(token: &Token) -> Result<(), ParseError> {
        if token.class == TokenClass::Identifier {
            Ok(())
        } else {
            Err(ParseError::ExpectedIdentifier {
                found: token.text.clone(),
                line: token.line,
            })
        }
    }

    fn expect_literal(token: &Token, literal: &str) -> Result<(), ParseError> {
        if token.is(literal) {
            Ok(())
        } else {
            Err(ParseError::unexpected(
                format!("`{}`", literal),
                &token.text,
                token.line,
            ))
        }
    }

    /// `namespace A\B;` or `namespace A\B {`, after the keyword.
    fn parse_namespace(&mut self) -> Result<(), ParseError> {
        self.expect_whitespace()?;

        let mut token = self.next()?;
        Self::expect_identifier(&token)?;
        let mut namespace = token.text;

        token = self.next()?;
        while token.class == TokenClass::NsSeparator {
            token = self.next()?;
            Self::expect_identifier(&token)?;
            namespace.push('\\');
            namespace.push_str(&token.text);
            token = self.next()?;
        }

        if token.is_whitespace() {
            token = self.next()?;
        }

        if token.is("{") {
            self.namespace_braced = true;
        } else if !token.is(";") {
            return Err(ParseError::unexpected("`;` or `{`", &token.text, token.line));
        }

        tracing::debug!(namespace = %namespace, braced = self.namespace_braced, "opened namespace");
        self.namespace = namespace;
        Ok(())
    }

    /// ` Name =`, after the keyword.
    fn parse_name(&mut self) -> Result<String, ParseError> {
        self.expect_whitespace()?;

        let token = self.next()?;
        Self::expect_identifier(&token)?;
        let name = token.text;

        let token = self.next_skipping_whitespace()?;
        Self::expect_literal(&token, "=")?;
        Ok(name)
    }

    /// ` Name [: Override] =`, after the keyword.
    fn parse_name_with_message(&mut self) -> Result<(String, Option<String>), ParseError> {
        self.expect_whitespace()?;

        let token = self.next()?;
        Self::expect_identifier(&token)?;
        let name = token.text;

        let mut token = self.next_skipping_whitespace()?;
        let mut message_name = None;

        if token.is(":") {
            token = self.next_skipping_whitespace()?;
            if token.class != TokenClass::Identifier && token.class != TokenClass::NsSeparator {
                return Err(ParseError::ExpectedIdentifier {
                    found: token.text,
                    line: token.line,
                });
            }
            let mut text = token.text;
            token = self.next()?;
            while !token.is_whitespace() && !token.is("=") {
                text.push_str(&token.text);
                token = self.next()?;
            }
            if token.is_whitespace() {
                token = self.next()?;
            }
            message_name = Some(text);
        }

        Self::expect_literal(&token, "=")?;
        Ok((name, message_name))
    }

    /// `[?][\]Ident(\Ident)*` starting at `token`. Returns the type text and
    /// the first token after it.
    fn parse_typehint(&mut self, mut token: Token) -> Result<(String, Token), ParseError> {
        let mut typehint = String::new();
        if token.is("?") {
            typehint.push('?');
            token = self.next()?;
        }
        if token.class == TokenClass::NsSeparator {
            typehint.push('\\');
            token = self.next()?;
        }
        Self::expect_identifier(&token)?;
        typehint.push_str(&token.text);

        token = self.next()?;
        while token.class == TokenClass::NsSeparator {
            token = self.next()?;
            Self::expect_identifier(&token)?;
            typehint.push('\\');
            typehint.push_str(&token.text);
            token = self.next()?;
        }
        Ok((typehint, token))
    }

    /// `{ Type $name, ... }`, after `=`.
    fn parse_arguments(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut arguments = Vec::new();

        let token = self.next_skipping_whitespace()?;
        Self::expect_literal(&token, "{")?;

        let mut token = self.next_skipping_whitespace()?;
        while !token.is("}") {
            let (typehint, after_type) = self.parse_typehint(token)?;
            if !after_type.is_whitespace() {
                return Err(ParseError::unexpected(
                    "whitespace",
                    &after_type.text,
                    after_type.line,
                ));
            }

            let variable = self.next()?;
            if variable.class != TokenClass::Variable {
                return Err(ParseError::unexpected("variable", &variable.text, variable.line));
            }
            let name = variable.text.trim_start_matches('$').to_string();
            arguments.push(Argument::new(name, Some(typehint)));

            token = self.next_skipping_whitespace()?;
            if token.is(",") {
                token = self.next_skipping_whitespace()?;
            }
        }

        Ok(arguments)
    }

    /// `Variant | Variant ...`, after `=`.
    fn parse_enum_variants(&mut self) -> Result<(Vec<Argument>, Option<Token>), ParseError> {
        let mut variants = Vec::new();

        let mut token = self.next_skipping_whitespace()?;
        loop {
            Self::expect_identifier(&token)?;
            variants.push(Argument::new(token.text, None));

            if self.tokens.is_exhausted() {
                return Ok((variants, None));
            }
            token = self.next()?;
            if token.is_whitespace() {
                if self.tokens.is_exhausted() {
                    return Ok((variants, None));
                }
                token = self.next()?;
            }
            if token.is("|") {
                token = self.next()?;
            }
            if token.is_whitespace() {
                if self.tokens.is_exhausted() {
                    return Ok((variants, None));
                }
                token = self.next()?;
            }
            if self.ends_variant_list(&token) {
                return Ok((variants, Some(token)));
            }
        }
    }

    fn ends_variant_list(&self, token: &Token) -> bool {
        match token.class {
            TokenClass::Identifier => DeclarationKeyword::from_word(&token.text).is_some(),
            TokenClass::Namespace => true,
            TokenClass::Other => token.is("}") && self.namespace_braced,
            _ => false,
        }
    }

    /// Optional `deriving (Cap, ...)` after an argument list.
    fn parse_derivings(&mut self, allow: bool) -> Result<(Vec<Deriving>, Option<Token>), ParseError> {
        let mut derivings = Vec::new();

        if self.tokens.is_exhausted() {
            return Ok((derivings, None));
        }
        let mut token = self.next()?;
        if token.is_whitespace() {
            if self.tokens.is_exhausted() {
                return Ok((derivings, None));
            }
            token = self.next()?;
        }

        if !(token.class == TokenClass::Identifier && token.is("deriving")) {
            return Ok((derivings, Some(token)));
        }
        if !allow {
            return Err(ParseError::UnknownDeriving {
                deriving: token.text,
                line: token.line,
            });
        }

        token = self.next_skipping_whitespace()?;
        Self::expect_literal(&token, "(")?;

        token = self.next_skipping_whitespace()?;
        while !token.is(")") {
            Self::expect_identifier(&token)?;
            let deriving = Deriving::from_name(&token.text).ok_or_else(|| {
                ParseError::UnknownDeriving {
                    deriving: token.text.clone(),
                    line: token.line,
                }
            })?;
            derivings.push(deriving);

            token = self.next()?;
            if token.is_whitespace() {
                return Err(ParseError::unexpected("`,` or `)`", &token.text, token.line));
            }
            if token.is(",") {
                token = self.next_skipping_whitespace()?;
            }
        }

        Ok((derivings, None))
    }
}
