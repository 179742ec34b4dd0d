use std::fmt;

use crate::spices::error::{ErrorKind, SpicesError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Particle(String),
    Integer(u32),
    Connector,
    Open(Bracket),
    Close(Bracket),
    Quote,
    MonomerMark,
    Tag(Tag),
    /// Content of `[ ]` that is neither a number nor a tag.
    AttrText(String),
    /// Content of `' '` that is not a number.
    QuoteText(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    /// `( )` branch
    Normal,
    /// `{ }` monomer block
    Curly,
    /// `[ ]` attribute
    Angular,
    /// `< >` part
    Part,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Head,
    Tail,
    Start,
    End,
}

impl Bracket {
    pub fn open_char(self) -> char {
        match self {
            Self::Normal => '(',
            Self::Curly => '{',
            Self::Angular => '[',
            Self::Part => '<',
        }
    }

    pub fn close_char(self) -> char {
        match self {
            Self::Normal => ')',
            Self::Curly => '}',
            Self::Angular => ']',
            Self::Part => '>',
        }
    }
}

impl Tag {
    fn from_keyword(word: &str) -> Option<Tag> {
        match word {
            "HEAD" => Some(Tag::Head),
            "TAIL" => Some(Tag::Tail),
            "START" => Some(Tag::Start),
            "END" => Some(Tag::End),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Tag::Head => "HEAD",
            Tag::Tail => "TAIL",
            Tag::Start => "START",
            Tag::End => "END",
        }
    }
}

impl Token {
    fn new(kind: TokenKind, pos: usize) -> Self {
        Self { kind, pos }
    }

    pub fn is_particle(&self) -> bool {
        matches!(self.kind, TokenKind::Particle(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Particle(name) => f.write_str(name),
            TokenKind::Integer(n) => write!(f, "{n}"),
            TokenKind::Connector => f.write_str("-"),
            TokenKind::Open(b) => write!(f, "{}", b.open_char()),
            TokenKind::Close(b) => write!(f, "{}", b.close_char()),
            TokenKind::Quote => f.write_str("'"),
            TokenKind::MonomerMark => f.write_str("#"),
            TokenKind::Tag(t) => write!(f, "[{}]", t.keyword()),
            TokenKind::AttrText(text) | TokenKind::QuoteText(text) => f.write_str(text),
        }
    }
}

const INVALID_FIRST: &[char] = &['-', ')', ']', '}', '>', '\'', '#'];
const INVALID_LAST: &[char] = &['-', '(', '[', '{', '<', '#'];

pub fn tokenize(input: &str) -> Result<Vec<Token>, SpicesError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();

    if let Some(first) = chars.iter().position(|c| !c.is_whitespace()) {
        if INVALID_FIRST.contains(&chars[first]) {
            return Err(SpicesError::new(ErrorKind::InvalidFirstCharacter, first));
        }
    }

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => {
                i += 1;
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && is_name_char(chars[i]) {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push(Token::new(TokenKind::Particle(name), start));
            }
            c if c.is_ascii_digit() => {
                let start = i;
                let value = parse_number(&chars, &mut i)?;
                tokens.push(Token::new(TokenKind::Integer(value), start));
            }
            '-' => {
                tokens.push(Token::new(TokenKind::Connector, i));
                i += 1;
            }
            '(' => {
                tokens.push(Token::new(TokenKind::Open(Bracket::Normal), i));
                i += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::Close(Bracket::Normal), i));
                i += 1;
            }
            '{' => {
                tokens.push(Token::new(TokenKind::Open(Bracket::Curly), i));
                i += 1;
            }
            '}' => {
                tokens.push(Token::new(TokenKind::Close(Bracket::Curly), i));
                i += 1;
            }
            '<' => {
                tokens.push(Token::new(TokenKind::Open(Bracket::Part), i));
                i += 1;
            }
            '>' => {
                tokens.push(Token::new(TokenKind::Close(Bracket::Part), i));
                i += 1;
            }
            ']' => {
                tokens.push(Token::new(TokenKind::Close(Bracket::Angular), i));
                i += 1;
            }
            '#' => {
                tokens.push(Token::new(TokenKind::MonomerMark, i));
                i += 1;
            }
            '[' => {
                i = lex_attribute(&chars, i, &mut tokens)?;
            }
            '\'' => {
                i = lex_backbone(&chars, i, &mut tokens)?;
            }
            _ => return Err(SpicesError::new(ErrorKind::InvalidCharacter, i)),
        }
    }

    if let Some(last) = chars.iter().rposition(|c| !c.is_whitespace()) {
        if INVALID_LAST.contains(&chars[last]) {
            return Err(SpicesError::new(ErrorKind::InvalidLastCharacter, last));
        }
    }

    Ok(tokens)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_structural(c: char) -> bool {
    matches!(
        c,
        '[' | ']' | '(' | ')' | '{' | '}' | '<' | '>' | '-' | '\'' | '#'
    )
}

fn parse_number(chars: &[char], i: &mut usize) -> Result<u32, SpicesError> {
    let start = *i;
    let mut value: u32 = 0;
    while *i < chars.len() && chars[*i].is_ascii_digit() {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(chars[*i] as u32 - '0' as u32))
            .ok_or(SpicesError::new(ErrorKind::NumberTooLarge, start))?;
        *i += 1;
    }
    Ok(value)
}

/// Finds the closing delimiter of a `[ ]` or `' '` group, giving up at the
/// first structural character.
fn find_closing(chars: &[char], start: usize, close: char) -> Option<usize> {
    let mut j = start + 1;
    while j < chars.len() {
        if chars[j] == close {
            return Some(j);
        }
        if is_structural(chars[j]) {
            return None;
        }
        j += 1;
    }
    None
}

fn content(chars: &[char], start: usize, end: usize) -> (String, usize) {
    let raw = &chars[start + 1..end];
    let offset = raw.iter().take_while(|c| c.is_whitespace()).count();
    let text: String = raw.iter().collect();
    (text.trim().to_string(), start + 1 + offset)
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn lex_attribute(
    chars: &[char],
    start: usize,
    tokens: &mut Vec<Token>,
) -> Result<usize, SpicesError> {
    let Some(end) = find_closing(chars, start, ']') else {
        tokens.push(Token::new(TokenKind::Open(Bracket::Angular), start));
        return Ok(start + 1);
    };
    let (text, text_pos) = content(chars, start, end);

    if let Some(tag) = Tag::from_keyword(&text) {
        tokens.push(Token::new(TokenKind::Tag(tag), start));
        return Ok(end + 1);
    }

    tokens.push(Token::new(TokenKind::Open(Bracket::Angular), start));
    if is_number(&text) {
        let mut cursor = text_pos;
        let value = parse_number(chars, &mut cursor)?;
        tokens.push(Token::new(TokenKind::Integer(value), text_pos));
    } else if !text.is_empty() {
        tokens.push(Token::new(TokenKind::AttrText(text), text_pos));
    }
    tokens.push(Token::new(TokenKind::Close(Bracket::Angular), end));
    Ok(end + 1)
}

fn lex_backbone(
    chars: &[char],
    start: usize,
    tokens: &mut Vec<Token>,
) -> Result<usize, SpicesError> {
    tokens.push(Token::new(TokenKind::Quote, start));
    let Some(end) = find_closing(chars, start, '\'') else {
        return Ok(start + 1);
    };
    let (text, text_pos) = content(chars, start, end);

    if is_number(&text) {
        let mut cursor = text_pos;
        let value = parse_number(chars, &mut cursor)?;
        tokens.push(Token::new(TokenKind::Integer(value), text_pos));
    } else if !text.is_empty() {
        tokens.push(Token::new(TokenKind::QuoteText(text), text_pos));
    }
    tokens.push(Token::new(TokenKind::Quote, end));
    Ok(end + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(s: &str) -> Vec<TokenKind> {
        tokenize(s).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn particle(name: &str) -> TokenKind {
        TokenKind::Particle(name.to_string())
    }

    #[test]
    fn linear_chain() {
        assert_eq!(
            kinds("A-B-C"),
            vec![
                particle("A"),
                TokenKind::Connector,
                particle("B"),
                TokenKind::Connector,
                particle("C"),
            ]
        );
    }

    #[test]
    fn multi_character_names() {
        assert_eq!(kinds("Aa1"), vec![particle("Aa1")]);
        assert_eq!(kinds("C_2-Na"), vec![particle("C_2"), TokenKind::Connector, particle("Na")]);
    }

    #[test]
    fn repeat_count() {
        assert_eq!(kinds("3A"), vec![TokenKind::Integer(3), particle("A")]);
    }

    #[test]
    fn whitespace_is_skipped() {
        assert_eq!(
            kinds("  A -\n B "),
            vec![particle("A"), TokenKind::Connector, particle("B")]
        );
    }

    #[test]
    fn ring_label() {
        assert_eq!(
            kinds("A[12]"),
            vec![
                particle("A"),
                TokenKind::Open(Bracket::Angular),
                TokenKind::Integer(12),
                TokenKind::Close(Bracket::Angular),
            ]
        );
    }

    #[test]
    fn tags() {
        assert_eq!(
            kinds("A[HEAD][TAIL][START][ END ]"),
            vec![
                particle("A"),
                TokenKind::Tag(Tag::Head),
                TokenKind::Tag(Tag::Tail),
                TokenKind::Tag(Tag::Start),
                TokenKind::Tag(Tag::End),
            ]
        );
    }

    #[test]
    fn malformed_attribute_content() {
        assert_eq!(
            kinds("A[x1]"),
            vec![
                particle("A"),
                TokenKind::Open(Bracket::Angular),
                TokenKind::AttrText("x1".to_string()),
                TokenKind::Close(Bracket::Angular),
            ]
        );
        assert_eq!(
            kinds("A[]"),
            vec![
                particle("A"),
                TokenKind::Open(Bracket::Angular),
                TokenKind::Close(Bracket::Angular),
            ]
        );
    }

    #[test]
    fn unterminated_attribute() {
        assert_eq!(
            kinds("A[1-B"),
            vec![
                particle("A"),
                TokenKind::Open(Bracket::Angular),
                TokenKind::Integer(1),
                TokenKind::Connector,
                particle("B"),
            ]
        );
    }

    #[test]
    fn backbone_index() {
        assert_eq!(
            kinds("A'1'"),
            vec![
                particle("A"),
                TokenKind::Quote,
                TokenKind::Integer(1),
                TokenKind::Quote,
            ]
        );
        assert_eq!(
            kinds("A'b'"),
            vec![
                particle("A"),
                TokenKind::Quote,
                TokenKind::QuoteText("b".to_string()),
                TokenKind::Quote,
            ]
        );
    }

    #[test]
    fn positions() {
        let tokens = tokenize("A - B[2]").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.pos).collect();
        assert_eq!(positions, vec![0, 2, 4, 5, 6, 7]);
    }

    #[test]
    fn display_round_trip() {
        let tokens = tokenize("2<{A[HEAD]-B[TAIL]}#PE-C'1'(D[1])>").unwrap();
        let text: String = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(text, "2<{A[HEAD]-B[TAIL]}#PE-C'1'(D[1])>");
    }

    #[test]
    fn invalid_character() {
        let err = tokenize("A-B=C").unwrap_err();
        assert_eq!(err, SpicesError::new(ErrorKind::InvalidCharacter, 3));
    }

    #[test]
    fn invalid_first_and_last_character() {
        assert_eq!(
            tokenize("-A").unwrap_err().kind,
            ErrorKind::InvalidFirstCharacter
        );
        assert_eq!(
            tokenize(" A-").unwrap_err(),
            SpicesError::new(ErrorKind::InvalidLastCharacter, 2)
        );
        assert_eq!(
            tokenize("A(").unwrap_err().kind,
            ErrorKind::InvalidLastCharacter
        );
    }

    #[test]
    fn number_overflow() {
        assert_eq!(
            tokenize("99999999999A").unwrap_err().kind,
            ErrorKind::NumberTooLarge
        );
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }
}
