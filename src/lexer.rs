//! Token stream over DSL source, scanned with PEST.
//!
//! The grammar only classifies tokens; anything it has no dedicated rule for
//! (punctuation, digits, stray characters) comes back as [`TokenClass::Other`]
//! carrying its literal text, so the parser can match on class plus text.

use crate::error::ParseError;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct TokenScanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Spaces, tabs, newlines and comments.
    Whitespace,
    Identifier,
    /// `$name`; the text keeps the sigil.
    Variable,
    /// `\`
    NsSeparator,
    /// `namespace`, any case.
    Namespace,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    pub text: String,
    /// 1-based line in the caller's input.
    pub line: usize,
}

impl Token {
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    pub fn is_whitespace(&self) -> bool {
        self.class == TokenClass::Whitespace
    }
}

/// Scan the whole source into classified tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut pairs = TokenScanner::parse(Rule::tokens, source).map_err(|e| {
        let line = match e.line_col {
            pest::error::LineColLocation::Pos((line, _)) => line,
            pest::error::LineColLocation::Span((line, _), _) => line,
        };
        ParseError::unexpected("token", e.line().trim().to_string(), line)
    })?;
    let root = pairs.next().ok_or(ParseError::UnexpectedEndOfInput { line: 1 })?;

    let mut tokens = Vec::new();
    for pair in root.into_inner() {
        let class = match pair.as_rule() {
            Rule::whitespace => TokenClass::Whitespace,
            Rule::identifier => TokenClass::Identifier,
            Rule::variable => TokenClass::Variable,
            Rule::ns_separator => TokenClass::NsSeparator,
            Rule::namespace_kw => TokenClass::Namespace,
            Rule::EOI => continue,
            _ => TokenClass::Other,
        };
        let (line, _) = pair.line_col();
        tokens.push(Token {
            class,
            text: pair.as_str().to_string(),
            line,
        });
    }
    tracing::trace!(count = tokens.len(), "scanned tokens");
    Ok(tokens)
}

/// Single-pass cursor. Never rewinds; lookahead is kept by the caller.
#[derive(Debug)]
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
    line: usize,
}

impl TokenStream {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Ok(Self::from_tokens(tokenize(source)?))
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        TokenStream {
            tokens: tokens.into_iter(),
            line: 1,
        }
    }

    /// Advance one position. Fails once the stream is exhausted.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        match self.tokens.next() {
            Some(token) => {
                self.line = token.line;
                Ok(token)
            }
            None => Err(ParseError::UnexpectedEndOfInput { line: self.line }),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.tokens.len() == 0
    }

    /// Line of the last token handed out.
    pub fn line(&self) -> usize {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(src: &str) -> Vec<(TokenClass, String)> {
        tokenize(src)
            .expect("tokenize")
            .into_iter()
            .map(|t| (t.class, t.text))
            .collect()
    }

    #[test]
    fn classifies_argument_list() {
        use TokenClass::*;
        let got = classes("{ ?int $b }");
        let want = vec![
            (Other, "{".to_string()),
            (Whitespace, " ".to_string()),
            (Other, "?".to_string()),
            (Identifier, "int".to_string()),
            (Whitespace, " ".to_string()),
            (Variable, "$b".to_string()),
            (Whitespace, " ".to_string()),
            (Other, "}".to_string()),
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn namespace_keyword_is_whole_word() {
        let got = classes("namespace namespaces Namespace");
        assert_eq!(got[0].0, TokenClass::Namespace);
        assert_eq!(got[2], (TokenClass::Identifier, "namespaces".to_string()));
        assert_eq!(got[4].0, TokenClass::Namespace);
    }

    #[test]
    fn qualified_name_splits_on_separator() {
        let got = classes(r"App\Commands");
        assert_eq!(
            got,
            vec![
                (TokenClass::Identifier, "App".to_string()),
                (TokenClass::NsSeparator, "\\".to_string()),
                (TokenClass::Identifier, "Commands".to_string()),
            ]
        );
    }

    #[test]
    fn comments_fold_into_whitespace() {
        let got = classes("a // note\n/* block */ b # tail");
        assert_eq!(got.len(), 4);
        assert_eq!(got[1].0, TokenClass::Whitespace);
        assert_eq!(got[2], (TokenClass::Identifier, "b".to_string()));
        assert_eq!(got[3].0, TokenClass::Whitespace);
    }

    #[test]
    fn lines_are_one_based() {
        let tokens = tokenize("data\n\nFoo").expect("tokenize");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn empty_source_has_no_tokens() {
        assert!(tokenize("").expect("tokenize").is_empty());
    }

    #[test]
    fn stream_fails_past_the_end() {
        let mut stream = TokenStream::new("x\ny").expect("stream");
        stream.next_token().expect("x");
        stream.next_token().expect("newline");
        let y = stream.next_token().expect("y");
        assert_eq!(y.line, 2);
        assert_eq!(stream.line(), 2);
        assert!(stream.is_exhausted());
        assert_eq!(
            stream.next_token(),
            Err(ParseError::UnexpectedEndOfInput { line: 2 })
        );
        assert_eq!(stream.line(), 2);
    }

    #[test]
    fn lone_sigil_is_other() {
        let got = classes("$ 1");
        assert_eq!(got[0], (TokenClass::Other, "$".to_string()));
        assert_eq!(got[2], (TokenClass::Other, "1".to_string()));
    }
}
