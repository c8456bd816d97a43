mod cursor;

use crate::{Error, Span, Tag, T};

use cursor::Cursor;

/// One lexeme of source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub(crate) tag: Tag,
    pub(crate) span: Span,
}

impl Token {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }
}

/// Scans source text into tokens.
///
/// Trivia (whitespace and comments) is produced like any other token; the
/// parser strips it from the token stream and records its spans.
pub struct Lexer<'input> {
    source: &'input str,
    cursor: Cursor<'input>,
    errors: Vec<Error>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Self {
            source: input,
            cursor: Cursor::new(input),
            errors: Vec::new(),
        }
    }

    /// Scan the entire input.
    pub fn lex(mut self) -> (Vec<Token>, Vec<Error>) {
        let mut tokens = Vec::new();
        while !self.cursor.is_eof() {
            let start = self.cursor.pos();
            let tag = self.advance();
            let end = self.cursor.pos();
            tokens.push(Token {
                tag,
                span: Span::new(start as u32, end as u32),
            });
        }
        (tokens, self.errors)
    }

    fn advance(&mut self) -> Tag {
        let start = self.cursor.pos();
        let c = self.cursor.bump().unwrap();

        match c {
            c if is_whitespace(c) => {
                self.cursor.eat_while(is_whitespace);
                Tag::Whitespace
            }
            '/' => match self.cursor.first() {
                Some('/') => {
                    self.cursor.eat_while(|c| c != '\n');
                    Tag::Comment
                }
                Some('*') => self.block_comment(start),
                Some('=') => {
                    self.cursor.bump();
                    T![/=]
                }
                _ => T![/],
            },
            c if is_ident_start(c) => {
                self.cursor.eat_while(is_ident_char);
                let text = &self.source[start..self.cursor.pos()];
                keyword(text).unwrap_or(Tag::Identifier)
            }
            c if c.is_ascii_digit() => self.number(c),
            '.' => {
                if matches!(self.cursor.first(), Some(c) if c.is_ascii_digit()) {
                    self.number('.')
                } else {
                    T![.]
                }
            }
            '(' => T!['('],
            ')' => T![')'],
            '[' => T!['['],
            ']' => T![']'],
            '{' => T!['{'],
            '}' => T!['}'],
            ';' => T![;],
            ',' => T![,],
            '?' => T![?],
            ':' => T![:],
            '~' => T![~],
            '+' => {
                if self.cursor.eatc('+') {
                    T![++]
                } else if self.cursor.eatc('=') {
                    T![+=]
                } else {
                    T![+]
                }
            }
            '-' => {
                if self.cursor.eatc('-') {
                    T![--]
                } else if self.cursor.eatc('=') {
                    T![-=]
                } else {
                    T![-]
                }
            }
            '*' => {
                if self.cursor.eatc('=') {
                    T![*=]
                } else {
                    T![*]
                }
            }
            '%' => {
                if self.cursor.eatc('=') {
                    T![%=]
                } else {
                    T![%]
                }
            }
            '=' => {
                if self.cursor.eatc('=') {
                    T![==]
                } else {
                    T![=]
                }
            }
            '!' => {
                if self.cursor.eatc('=') {
                    T![!=]
                } else {
                    T![!]
                }
            }
            '<' => {
                if self.cursor.eatc('<') {
                    if self.cursor.eatc('=') {
                        T![<<=]
                    } else {
                        T![<<]
                    }
                } else if self.cursor.eatc('=') {
                    T![<=]
                } else {
                    T![<]
                }
            }
            '>' => {
                if self.cursor.eatc('>') {
                    if self.cursor.eatc('=') {
                        T![>>=]
                    } else {
                        T![>>]
                    }
                } else if self.cursor.eatc('=') {
                    T![>=]
                } else {
                    T![>]
                }
            }
            '&' => {
                if self.cursor.eatc('&') {
                    T![&&]
                } else if self.cursor.eatc('=') {
                    T![&=]
                } else {
                    T![&]
                }
            }
            '|' => {
                if self.cursor.eatc('|') {
                    T![||]
                } else if self.cursor.eatc('=') {
                    T![|=]
                } else {
                    T![|]
                }
            }
            '^' => {
                if self.cursor.eatc('^') {
                    T![^^]
                } else if self.cursor.eatc('=') {
                    T![^=]
                } else {
                    T![^]
                }
            }
            c => {
                self.errors.push(Error::with_loc(
                    format!("unexpected character `{c}`"),
                    c.to_string(),
                    start,
                ));
                Tag::Unknown
            }
        }
    }

    /// The opening `/` is consumed; `*` is next.
    fn block_comment(&mut self, start: usize) -> Tag {
        self.cursor.bump();
        loop {
            match self.cursor.bump() {
                Some('*') if self.cursor.first() == Some('/') => {
                    self.cursor.bump();
                    return Tag::Comment;
                }
                Some(_) => {}
                None => {
                    self.errors.push(Error::with_loc(
                        "unterminated block comment",
                        self.source[start..].to_string(),
                        start,
                    ));
                    return Tag::Comment;
                }
            }
        }
    }

    /// Decimal, octal and hex integers, floats with fraction or exponent,
    /// and the `u U f F lf LF` suffixes, all under one tag.
    fn number(&mut self, first: char) -> Tag {
        if first == '0' && matches!(self.cursor.first(), Some('x' | 'X')) {
            self.cursor.bump();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
            self.cursor.eat_while(is_number_suffix);
            return Tag::Number;
        }

        let mut seen_dot = first == '.';
        while let Some(c) = self.cursor.first() {
            match c {
                c if c.is_ascii_digit() => {
                    self.cursor.bump();
                }
                '.' if !seen_dot => {
                    self.cursor.bump();
                    seen_dot = true;
                }
                'e' | 'E' if matches!(self.cursor.second(), Some(d) if d.is_ascii_digit() || d == '+' || d == '-') =>
                {
                    self.cursor.bump();
                    if matches!(self.cursor.first(), Some('+' | '-')) {
                        self.cursor.bump();
                    }
                    self.cursor.eat_while(|c| c.is_ascii_digit());
                    break;
                }
                _ => break,
            }
        }
        self.cursor.eat_while(is_number_suffix);
        Tag::Number
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000B}' | '\u{000C}')
}

fn is_ident_start(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_')
}

fn is_ident_char(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_')
}

fn is_number_suffix(c: char) -> bool {
    matches!(c, 'u' | 'U' | 'f' | 'F' | 'l' | 'L')
}

fn keyword(text: &str) -> Option<Tag> {
    let tag = match text {
        "const" => T![const],
        "uniform" => T![uniform],
        "attribute" => T![attribute],
        "varying" => T![varying],
        "buffer" => T![buffer],
        "shared" => T![shared],
        "coherent" => T![coherent],
        "volatile" => T![volatile],
        "restrict" => T![restrict],
        "readonly" => T![readonly],
        "writeonly" => T![writeonly],
        "in" => T![in],
        "out" => T![out],
        "inout" => T![inout],
        "patch" => T![patch],
        "sample" => T![sample],
        "highp" => T![highp],
        "mediump" => T![mediump],
        "lowp" => T![lowp],
        "smooth" => T![smooth],
        "flat" => T![flat],
        "noperspective" => T![noperspective],
        "centroid" => T![centroid],
        "invariant" => T![invariant],
        "precise" => T![precise],
        "layout" => T![layout],
        "struct" => T![struct],
        "if" => T![if],
        "else" => T![else],
        "for" => T![for],
        "while" => T![while],
        "do" => T![do],
        "return" => T![return],
        "break" => T![break],
        "continue" => T![continue],
        "discard" => T![discard],
        "switch" => T![switch],
        "case" => T![case],
        "default" => T![default],
        _ => return None,
    };
    Some(tag)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Tag;

    fn tags(input: &str) -> Vec<Tag> {
        let (tokens, errors) = Lexer::new(input).lex();
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens
            .iter()
            .map(Token::tag)
            .filter(|tag| !tag.is_trivia())
            .collect()
    }

    #[test]
    fn it_lexes_a_global_declaration() {
        assert_eq!(
            tags("uniform vec4 color;"),
            vec![T![uniform], T![ident], T![ident], T![;]],
        );
    }

    #[test]
    fn it_lexes_operators_with_maximal_munch() {
        assert_eq!(
            tags("a <<= b << c < d"),
            vec![T![ident], T![<<=], T![ident], T![<<], T![ident], T![<], T![ident]],
        );
        assert_eq!(tags("x++ + ++y"), vec![T![ident], T![++], T![+], T![++], T![ident]]);
    }

    #[test]
    fn it_lexes_numbers() {
        assert_eq!(
            tags("0 10 0x1F 1.5 .5 1e-3 2.0f 3u 1.0lf"),
            vec![Tag::Number; 9],
        );
    }

    #[test]
    fn it_keeps_comment_spans() {
        let (tokens, errors) = Lexer::new("/*1*/x // tail").lex();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].tag(), Tag::Comment);
        assert_eq!(tokens[0].text("/*1*/x // tail"), "/*1*/");
        assert_eq!(tokens[1].tag(), Tag::Identifier);
        assert_eq!(tokens.last().map(Token::tag), Some(Tag::Comment));
    }

    #[test]
    fn it_reports_unterminated_block_comments() {
        let (tokens, errors) = Lexer::new("int a; /* trailing").lex();
        assert_eq!(tokens.last().map(Token::tag), Some(Tag::Comment));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "unterminated block comment");
    }

    #[test]
    fn it_recovers_from_stray_bytes() {
        let (tokens, errors) = Lexer::new("int @a;").lex();
        assert!(tokens.iter().any(|t| t.tag() == Tag::Unknown));
        assert_eq!(errors.len(), 1);
    }
}
