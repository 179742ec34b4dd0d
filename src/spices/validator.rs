use std::collections::BTreeMap;

use crate::config::ParseOptions;
use crate::spices::error::{ErrorKind, SpicesError};
use crate::spices::tokenizer::{Bracket, Tag, Token, TokenKind};

/// Kind of the last significant token seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Begin,
    Particle,
    RingLabel,
    HeadTail,
    StartEnd,
    Backbone,
    Connector,
    OpenBranch,
    CloseBranch,
    OpenMonomer,
    CloseMonomer,
    MonomerName,
    Repeat,
    PartRepeat,
    OpenPart,
    ClosePart,
}

impl Prev {
    /// A complete unit (particle or monomer block) precedes this point.
    fn ends_unit(self) -> bool {
        matches!(
            self,
            Prev::Particle
                | Prev::RingLabel
                | Prev::HeadTail
                | Prev::StartEnd
                | Prev::Backbone
                | Prev::CloseBranch
                | Prev::CloseMonomer
                | Prev::MonomerName
        )
    }

    /// Still on the particle itself, before any backbone index or branch.
    fn on_particle(self) -> bool {
        matches!(self, Prev::Particle | Prev::RingLabel | Prev::HeadTail)
    }
}

#[derive(Debug, Clone, Copy)]
struct RingOccurrence {
    particle: usize,
    scope: Option<usize>,
    pos: usize,
}

#[derive(Debug, Default)]
struct PartScope {
    start_seen: bool,
    end_seen: bool,
    backbone_count: u32,
    rings: BTreeMap<u32, Vec<RingOccurrence>>,
    monomers: usize,
}

#[derive(Debug)]
struct MonomerScope {
    heads: u32,
    tails: u32,
    repeated: bool,
    scope: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct CurrentParticle {
    ordinal: usize,
    repeated: bool,
}

struct Validator<'a> {
    tokens: &'a [Token],
    options: &'a ParseOptions,
    idx: usize,
    prev: Prev,
    stack: Vec<(Bracket, usize)>,
    explicit_parts: bool,
    part: PartScope,
    monomer: Option<MonomerScope>,
    current: CurrentParticle,
    particles: usize,
    repeat: u32,
    scopes: usize,
}

/// Checks that a token stream is a legal SPICES structure.
///
/// The scan stops at the first violated rule; its kind and position are returned.
pub fn validate(tokens: &[Token], options: &ParseOptions) -> Result<(), SpicesError> {
    if !has_particles(tokens) {
        return Err(SpicesError::new(ErrorKind::NoTokens, 0));
    }
    Validator::new(tokens, options).run()
}

/// Whether any particle token is present, ignoring the names that follow `#`.
fn has_particles(tokens: &[Token]) -> bool {
    tokens.iter().enumerate().any(|(i, t)| {
        t.is_particle() && !(i > 0 && tokens[i - 1].kind == TokenKind::MonomerMark)
    })
}

fn fail<T>(kind: ErrorKind, pos: usize) -> Result<T, SpicesError> {
    Err(SpicesError::new(kind, pos))
}

fn missing_opening(bracket: Bracket) -> ErrorKind {
    match bracket {
        Bracket::Normal => ErrorKind::MissingOpeningNormalBracket,
        Bracket::Curly => ErrorKind::MissingOpeningCurlyBracket,
        Bracket::Angular => ErrorKind::MissingOpeningAngularBracket,
        Bracket::Part => ErrorKind::MissingOpeningPartBracket,
    }
}

fn missing_closing(bracket: Bracket) -> ErrorKind {
    match bracket {
        Bracket::Normal => ErrorKind::MissingClosingNormalBracket,
        Bracket::Curly => ErrorKind::MissingClosingCurlyBracket,
        Bracket::Angular => ErrorKind::MissingClosingAngularBracket,
        Bracket::Part => ErrorKind::MissingClosingPartBracket,
    }
}

fn starts_upper(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

impl<'a> Validator<'a> {
    fn new(tokens: &'a [Token], options: &'a ParseOptions) -> Self {
        let explicit_parts = match tokens {
            [first, ..] if first.kind == TokenKind::Open(Bracket::Part) => true,
            [first, second, ..] => {
                matches!(first.kind, TokenKind::Integer(_))
                    && second.kind == TokenKind::Open(Bracket::Part)
            }
            _ => false,
        };
        Self {
            tokens,
            options,
            idx: 0,
            prev: Prev::Begin,
            stack: Vec::new(),
            explicit_parts,
            part: PartScope::default(),
            monomer: None,
            current: CurrentParticle::default(),
            particles: 0,
            repeat: 1,
            scopes: 0,
        }
    }

    fn run(mut self) -> Result<(), SpicesError> {
        let tokens = self.tokens;
        while let Some(token) = tokens.get(self.idx) {
            self.check_follow(token)?;
            self.step(token)?;
            self.idx += 1;
        }
        self.finish()
    }

    fn peek(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.idx + offset)
    }

    fn outside_part(&self) -> bool {
        self.explicit_parts && self.stack.is_empty()
    }

    fn check_follow(&self, token: &Token) -> Result<(), SpicesError> {
        let (allowed, kind) = match self.prev {
            Prev::Backbone => (
                matches!(
                    token.kind,
                    TokenKind::Connector
                        | TokenKind::Open(Bracket::Normal)
                        | TokenKind::Close(Bracket::Normal | Bracket::Curly | Bracket::Part)
                ),
                ErrorKind::MissingAConnectionAfterBackboneIndex,
            ),
            Prev::StartEnd => (
                matches!(
                    token.kind,
                    TokenKind::Connector
                        | TokenKind::Tag(Tag::Start | Tag::End)
                        | TokenKind::Quote
                        | TokenKind::Close(Bracket::Normal | Bracket::Part)
                ),
                ErrorKind::InvalidParticleAfterStartEnd,
            ),
            Prev::Repeat => (
                matches!(
                    token.kind,
                    TokenKind::Particle(_) | TokenKind::Open(Bracket::Curly)
                ),
                ErrorKind::InvalidPositionOfNumber,
            ),
            Prev::PartRepeat => (
                token.kind == TokenKind::Open(Bracket::Part),
                ErrorKind::InvalidPositionOfNumber,
            ),
            _ => return Ok(()),
        };
        if allowed {
            Ok(())
        } else {
            fail(kind, token.pos)
        }
    }

    fn step(&mut self, token: &Token) -> Result<(), SpicesError> {
        let pos = token.pos;
        match &token.kind {
            TokenKind::Particle(name) => self.particle(name, pos),
            TokenKind::Integer(n) => self.integer(*n, pos),
            TokenKind::Connector => self.connector(pos),
            TokenKind::Open(Bracket::Normal) => self.open_branch(pos),
            TokenKind::Close(Bracket::Normal) => self.close_branch(pos),
            TokenKind::Open(Bracket::Curly) => self.open_monomer(pos),
            TokenKind::Close(Bracket::Curly) => self.close_monomer(pos),
            TokenKind::Open(Bracket::Part) => self.open_part(pos),
            TokenKind::Close(Bracket::Part) => self.close_part(pos),
            TokenKind::Open(Bracket::Angular) => self.ring_label(pos),
            TokenKind::Close(Bracket::Angular) => {
                fail(ErrorKind::MissingOpeningAngularBracket, pos)
            }
            TokenKind::Tag(tag @ (Tag::Head | Tag::Tail)) => self.head_tail(*tag, pos),
            TokenKind::Tag(tag) => self.start_end(*tag, pos),
            TokenKind::Quote => self.backbone(pos),
            TokenKind::MonomerMark => self.monomer_name(pos),
            TokenKind::AttrText(_) | TokenKind::QuoteText(_) => {
                fail(ErrorKind::InvalidCharacter, pos)
            }
        }
    }

    fn particle(&mut self, name: &str, pos: usize) -> Result<(), SpicesError> {
        if !starts_upper(name) {
            return fail(ErrorKind::InvalidFirstCharacterOfParticle, pos);
        }
        if let Some(dictionary) = &self.options.particle_dictionary {
            if !dictionary.contains(name) {
                return fail(ErrorKind::UnknownParticle, pos);
            }
        }
        if self.outside_part() {
            return fail(ErrorKind::ParticleOutsideOfPart, pos);
        }
        match self.prev {
            Prev::Begin
            | Prev::Connector
            | Prev::OpenBranch
            | Prev::OpenMonomer
            | Prev::OpenPart
            | Prev::Repeat => {}
            _ => return fail(ErrorKind::MissingConnection, pos),
        }
        self.particles += 1;
        self.current = CurrentParticle {
            ordinal: self.particles,
            repeated: self.repeat > 1,
        };
        self.repeat = 1;
        self.prev = Prev::Particle;
        Ok(())
    }

    fn integer(&mut self, n: u32, pos: usize) -> Result<(), SpicesError> {
        let before_part = self
            .peek(1)
            .is_some_and(|t| t.kind == TokenKind::Open(Bracket::Part));
        if self.stack.is_empty()
            && before_part
            && matches!(self.prev, Prev::Begin | Prev::ClosePart)
        {
            if n == 0 {
                return fail(ErrorKind::ZeroRepeat, pos);
            }
            self.prev = Prev::PartRepeat;
            return Ok(());
        }
        if self.outside_part() {
            return fail(ErrorKind::InvalidPositionOfNumber, pos);
        }
        match self.prev {
            Prev::Begin
            | Prev::Connector
            | Prev::OpenBranch
            | Prev::OpenMonomer
            | Prev::OpenPart => {}
            prev if prev.ends_unit() => return fail(ErrorKind::MissingConnection, pos),
            _ => return fail(ErrorKind::InvalidPositionOfNumber, pos),
        }
        if n == 0 {
            return fail(ErrorKind::ZeroRepeat, pos);
        }
        self.repeat = n;
        self.prev = Prev::Repeat;
        Ok(())
    }

    fn connector(&mut self, pos: usize) -> Result<(), SpicesError> {
        if self.outside_part() {
            return fail(ErrorKind::ConnectionBetweenParts, pos);
        }
        match self.prev {
            Prev::Connector => return fail(ErrorKind::ConnectorAfterConnector, pos),
            prev if prev.ends_unit() => {}
            _ => return fail(ErrorKind::MissingParticleBeforeConnector, pos),
        }
        self.prev = Prev::Connector;
        Ok(())
    }

    fn open_branch(&mut self, pos: usize) -> Result<(), SpicesError> {
        if self.outside_part() {
            return fail(ErrorKind::ParticleOutsideOfPart, pos);
        }
        match self.prev {
            Prev::OpenBranch => return fail(ErrorKind::InSeriesOfNormalOpeningBrackets, pos),
            Prev::Connector => return fail(ErrorKind::MissingParticleAfterConnector, pos),
            prev if prev.ends_unit() => {}
            _ => return fail(ErrorKind::MissingConnection, pos),
        }
        self.stack.push((Bracket::Normal, pos));
        self.prev = Prev::OpenBranch;
        Ok(())
    }

    fn close_branch(&mut self, pos: usize) -> Result<(), SpicesError> {
        match self.prev {
            Prev::OpenBranch => return fail(ErrorKind::EmptyNormalBrackets, pos),
            Prev::Connector => return fail(ErrorKind::MissingParticleAfterConnector, pos),
            _ => {}
        }
        self.pop(Bracket::Normal, pos)?;
        self.prev = Prev::CloseBranch;
        Ok(())
    }

    fn open_monomer(&mut self, pos: usize) -> Result<(), SpicesError> {
        if self.outside_part() {
            return fail(ErrorKind::ParticleOutsideOfPart, pos);
        }
        if self.monomer.is_some() {
            return fail(ErrorKind::NestedMonomer, pos);
        }
        if self.prev.ends_unit() {
            return fail(ErrorKind::MissingConnection, pos);
        }
        self.scopes += 1;
        self.monomer = Some(MonomerScope {
            heads: 0,
            tails: 0,
            repeated: self.repeat > 1,
            scope: self.scopes,
        });
        self.repeat = 1;
        self.stack.push((Bracket::Curly, pos));
        self.prev = Prev::OpenMonomer;
        Ok(())
    }

    fn close_monomer(&mut self, pos: usize) -> Result<(), SpicesError> {
        match self.prev {
            Prev::OpenMonomer => return fail(ErrorKind::EmptyCurlyBrackets, pos),
            Prev::Connector => return fail(ErrorKind::MissingParticleAfterConnector, pos),
            _ => {}
        }
        self.pop(Bracket::Curly, pos)?;
        if let Some(monomer) = self.monomer.take() {
            if monomer.heads == 0 {
                return fail(ErrorKind::MissingHeadAttribute, pos);
            }
            if monomer.tails == 0 {
                return fail(ErrorKind::MissingTailAttribute, pos);
            }
        }
        self.part.monomers += 1;
        self.prev = Prev::CloseMonomer;
        Ok(())
    }

    fn open_part(&mut self, pos: usize) -> Result<(), SpicesError> {
        let at_top = matches!(
            self.prev,
            Prev::Begin | Prev::ClosePart | Prev::PartRepeat
        );
        if !self.explicit_parts || !self.stack.is_empty() || !at_top {
            return fail(ErrorKind::InvalidPositionOfPart, pos);
        }
        self.part = PartScope::default();
        self.stack.push((Bracket::Part, pos));
        self.prev = Prev::OpenPart;
        Ok(())
    }

    fn close_part(&mut self, pos: usize) -> Result<(), SpicesError> {
        match self.prev {
            Prev::OpenPart => return fail(ErrorKind::EmptyPartBrackets, pos),
            Prev::Connector => return fail(ErrorKind::MissingParticleAfterConnector, pos),
            _ => {}
        }
        self.pop(Bracket::Part, pos)?;
        self.finish_part(pos)?;
        self.prev = Prev::ClosePart;
        Ok(())
    }

    fn pop(&mut self, bracket: Bracket, pos: usize) -> Result<(), SpicesError> {
        if let Some(&(top, top_pos)) = self.stack.last() {
            if top == bracket {
                self.stack.pop();
                return Ok(());
            }
            if self.stack.iter().any(|&(b, _)| b == bracket) {
                return fail(missing_closing(top), top_pos);
            }
        }
        fail(missing_opening(bracket), pos)
    }

    /// Checks the attribute target shared by `[n]`, `[HEAD]` and `[TAIL]`.
    fn attribute_target(&self, pos: usize) -> Result<(), SpicesError> {
        if self.outside_part() {
            return fail(ErrorKind::ParticleOutsideOfPart, pos);
        }
        match self.prev {
            Prev::Connector => fail(ErrorKind::MissingParticleAfterConnector, pos),
            prev if prev.on_particle() => Ok(()),
            _ => fail(ErrorKind::MissingParticleBeforeAttribute, pos),
        }
    }

    fn ring_label(&mut self, pos: usize) -> Result<(), SpicesError> {
        self.attribute_target(pos)?;
        let label = match (self.peek(1), self.peek(2)) {
            (Some(t), _) if t.kind == TokenKind::Close(Bracket::Angular) => {
                return fail(ErrorKind::EmptyAngularBrackets, pos);
            }
            (Some(t), _)
                if matches!(t.kind, TokenKind::AttrText(_) | TokenKind::Integer(0)) =>
            {
                return fail(ErrorKind::InvalidCharacterBetweenAngularBrackets, t.pos);
            }
            (Some(Token { kind: TokenKind::Integer(n), .. }), Some(close))
                if close.kind == TokenKind::Close(Bracket::Angular) =>
            {
                *n
            }
            _ => return fail(ErrorKind::MissingClosingAngularBracket, pos),
        };
        self.idx += 2;
        self.record_ring(label, pos)?;
        self.prev = Prev::RingLabel;
        Ok(())
    }

    fn record_ring(&mut self, label: u32, pos: usize) -> Result<(), SpicesError> {
        let current = self.current;
        if current.repeated {
            return fail(ErrorKind::RingClosureAcrossRepetition, pos);
        }
        let scope = self
            .monomer
            .as_ref()
            .filter(|m| m.repeated)
            .map(|m| m.scope);
        let occurrences = self.part.rings.entry(label).or_default();
        match occurrences.as_slice() {
            [] => {}
            [first] => {
                if first.particle == current.ordinal {
                    return fail(ErrorKind::RingClosureToItself, pos);
                }
                if first.scope != scope {
                    return fail(ErrorKind::RingClosureAcrossRepetition, pos);
                }
            }
            _ => return fail(ErrorKind::TooManyRingClosures, pos),
        }
        occurrences.push(RingOccurrence {
            particle: current.ordinal,
            scope,
            pos,
        });
        Ok(())
    }

    fn head_tail(&mut self, tag: Tag, pos: usize) -> Result<(), SpicesError> {
        self.attribute_target(pos)?;
        let repeated = self.current.repeated;
        let Some(monomer) = self.monomer.as_mut() else {
            return fail(ErrorKind::HeadOrTailOutsideOfMonomer, pos);
        };
        if tag == Tag::Head {
            if monomer.heads > 0 || repeated {
                return fail(ErrorKind::TooManyHead, pos);
            }
            monomer.heads += 1;
        } else {
            if monomer.tails > 0 || repeated {
                return fail(ErrorKind::TooManyTail, pos);
            }
            monomer.tails += 1;
        }
        self.prev = Prev::HeadTail;
        Ok(())
    }

    fn start_end(&mut self, tag: Tag, pos: usize) -> Result<(), SpicesError> {
        if self.outside_part() {
            return fail(ErrorKind::ParticleOutsideOfPart, pos);
        }
        let is_start = tag == Tag::Start;
        if self.monomer.is_some() {
            return fail(
                if is_start {
                    ErrorKind::StartAttributeInMonomer
                } else {
                    ErrorKind::EndAttributeInMonomer
                },
                pos,
            );
        }
        match self.prev {
            Prev::Connector => return fail(ErrorKind::MissingParticleAfterConnector, pos),
            Prev::Particle | Prev::RingLabel | Prev::StartEnd => {}
            _ => return fail(ErrorKind::MissingParticleBeforeAttribute, pos),
        }
        let repeated = self.current.repeated;
        if is_start {
            if self.part.start_seen || repeated {
                return fail(ErrorKind::TooManyStartTag, pos);
            }
            self.part.start_seen = true;
        } else {
            if self.part.end_seen || repeated {
                return fail(ErrorKind::TooManyEndTag, pos);
            }
            self.part.end_seen = true;
        }
        self.prev = Prev::StartEnd;
        Ok(())
    }

    fn backbone(&mut self, pos: usize) -> Result<(), SpicesError> {
        if self.outside_part() {
            return fail(ErrorKind::ParticleOutsideOfPart, pos);
        }
        match self.prev {
            Prev::Connector => return fail(ErrorKind::MissingParticleAfterConnector, pos),
            Prev::Particle | Prev::RingLabel | Prev::HeadTail | Prev::StartEnd => {}
            _ => return fail(ErrorKind::InvalidPositionOfBackboneIndex, pos),
        }
        let value = match (self.peek(1), self.peek(2)) {
            (Some(Token { kind: TokenKind::Integer(n), .. }), Some(close))
                if close.kind == TokenKind::Quote =>
            {
                *n
            }
            _ => return fail(ErrorKind::IllegalBackboneIndexFormat, pos),
        };
        self.idx += 2;
        if value == 0 {
            return fail(ErrorKind::ZeroInBackboneindex, pos);
        }
        let in_repeat = self.current.repeated || self.monomer.as_ref().is_some_and(|m| m.repeated);
        let expected = self.part.backbone_count + 1;
        if in_repeat || value < expected {
            return fail(ErrorKind::RedundancyOfBackboneIndices, pos);
        }
        if value > expected {
            return fail(ErrorKind::MissingBackboneIndex, pos);
        }
        self.part.backbone_count += 1;
        self.prev = Prev::Backbone;
        Ok(())
    }

    fn monomer_name(&mut self, pos: usize) -> Result<(), SpicesError> {
        if self.prev == Prev::HeadTail {
            return fail(ErrorKind::MonomerAfterHeadOrTail, pos);
        }
        if self.monomer.is_some() {
            return fail(ErrorKind::MonomerInMonomer, pos);
        }
        if self.prev == Prev::MonomerName {
            return fail(ErrorKind::MonomerAfterMonomer, pos);
        }
        if self.prev != Prev::CloseMonomer {
            return fail(ErrorKind::MonomerNameWithoutMonomer, pos);
        }
        match self.peek(1) {
            Some(Token {
                kind: TokenKind::Particle(name),
                ..
            }) if starts_upper(name) => {}
            Some(next) => return fail(ErrorKind::InvalidFirstCharacterOfMonomerName, next.pos),
            None => return fail(ErrorKind::InvalidFirstCharacterOfMonomerName, pos),
        }
        self.idx += 1;
        self.prev = Prev::MonomerName;
        Ok(())
    }

    fn finish_part(&self, pos: usize) -> Result<(), SpicesError> {
        let unpaired = self
            .part
            .rings
            .values()
            .filter(|occurrences| occurrences.len() == 1)
            .map(|occurrences| occurrences[0])
            .min_by_key(|occurrence| occurrence.pos);
        if let Some(occurrence) = unpaired {
            return fail(ErrorKind::MissingRingClosure, occurrence.pos);
        }
        if self.part.start_seen && !self.part.end_seen {
            return fail(ErrorKind::MissingEndAttribute, pos);
        }
        if self.part.end_seen && !self.part.start_seen {
            return fail(ErrorKind::MissingStartAttribute, pos);
        }
        if self.part.backbone_count == 1 {
            return fail(ErrorKind::TooLessBackboneindex, pos);
        }
        if self.options.expect_monomer && self.part.monomers == 0 {
            return fail(ErrorKind::NoMonomer, pos);
        }
        Ok(())
    }

    fn finish(&self) -> Result<(), SpicesError> {
        let end = self.tokens.last().map_or(0, |t| t.pos);
        if matches!(self.prev, Prev::Repeat | Prev::PartRepeat) {
            return fail(ErrorKind::InvalidPositionOfNumber, end);
        }
        if let Some(&(top, top_pos)) = self.stack.last() {
            return fail(missing_closing(top), top_pos);
        }
        if !self.explicit_parts {
            self.finish_part(end)?;
        }
        Ok(())
    }
}
