use std::fmt;

use thiserror::Error;

/// The group an [`ErrorKind`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing, extra or empty brackets of one of the four kinds.
    Bracket,
    /// Invalid characters, missing particles or connections.
    Position,
    /// Ring-closure labels that do not pair up.
    RingClosure,
    /// Backbone index format, value or placement.
    Backbone,
    /// Monomer, HEAD/TAIL and START/END attributes.
    Attribute,
    /// Particle name lexical rules and dictionary membership.
    ParticleName,
}

macro_rules! error_kinds {
    ($($category:ident => { $($kind:ident => $text:literal,)* })*) => {
        /// Every condition the validator can report.
        ///
        /// The variant name doubles as the message key used to look up localized text.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ErrorKind {
            $($($kind,)*)*
        }

        impl ErrorKind {
            pub const ALL: &'static [ErrorKind] = &[$($(ErrorKind::$kind,)*)*];

            /// Catalog key for this condition.
            pub fn message_key(self) -> &'static str {
                match self {
                    $($(ErrorKind::$kind => stringify!($kind),)*)*
                }
            }

            pub fn category(self) -> ErrorCategory {
                match self {
                    $($(ErrorKind::$kind => ErrorCategory::$category,)*)*
                }
            }

            fn text(self) -> &'static str {
                match self {
                    $($(ErrorKind::$kind => $text,)*)*
                }
            }

            pub fn from_message_key(key: &str) -> Option<ErrorKind> {
                match key {
                    $($(stringify!($kind) => Some(ErrorKind::$kind),)*)*
                    _ => None,
                }
            }
        }
    };
}

error_kinds! {
    Bracket => {
        MissingOpeningNormalBracket => "missing opening '('",
        MissingClosingNormalBracket => "missing closing ')'",
        EmptyNormalBrackets => "empty '()'",
        InSeriesOfNormalOpeningBrackets => "'(' directly after '('",
        MissingOpeningCurlyBracket => "missing opening '{'",
        MissingClosingCurlyBracket => "missing closing '}'",
        EmptyCurlyBrackets => "empty '{}'",
        MissingOpeningAngularBracket => "missing opening '['",
        MissingClosingAngularBracket => "missing closing ']'",
        EmptyAngularBrackets => "empty '[]'",
        InvalidCharacterBetweenAngularBrackets => "'[]' must hold a positive integer or a tag",
        MissingOpeningPartBracket => "missing opening '<'",
        MissingClosingPartBracket => "missing closing '>'",
        EmptyPartBrackets => "empty '<>'",
    }
    Position => {
        NoTokens => "structure contains no particles",
        InvalidCharacter => "invalid character",
        InvalidFirstCharacter => "invalid first character",
        InvalidLastCharacter => "invalid last character",
        NumberTooLarge => "number too large",
        MissingConnection => "missing connection '-'",
        ConnectorAfterConnector => "two connectors in a row",
        MissingParticleBeforeConnector => "missing particle before '-'",
        MissingParticleAfterConnector => "missing particle after '-'",
        MissingParticleBeforeAttribute => "attribute is not attached to a particle",
        InvalidPositionOfNumber => "number is not followed by a particle or bracket it repeats",
        ZeroRepeat => "repeat count must be positive",
        NestedMonomer => "monomer block inside a monomer block",
        InvalidPositionOfPart => "'<' is only allowed at the top level of a multi-part structure",
        ParticleOutsideOfPart => "particle outside of '<>' in a multi-part structure",
        ConnectionBetweenParts => "parts cannot be connected",
    }
    RingClosure => {
        MissingRingClosure => "ring closure label used only once",
        TooManyRingClosures => "ring closure label used more than twice",
        RingClosureToItself => "ring closure label used twice on the same particle",
        RingClosureAcrossRepetition => "ring closure crosses the boundary of a repeated unit",
    }
    Backbone => {
        ZeroInBackboneindex => "backbone index must be positive",
        IllegalBackboneIndexFormat => "backbone index must be a positive integer between quotes",
        TooLessBackboneindex => "a backbone needs at least two indices",
        MissingBackboneIndex => "gap in backbone indices",
        RedundancyOfBackboneIndices => "backbone index used more than once",
        InvalidPositionOfBackboneIndex => "backbone index is not attached to a particle",
        MissingAConnectionAfterBackboneIndex => "missing connection after backbone index",
    }
    Attribute => {
        MissingHeadAttribute => "monomer block without [HEAD]",
        MissingTailAttribute => "monomer block without [TAIL]",
        TooManyHead => "more than one [HEAD] in a monomer block",
        TooManyTail => "more than one [TAIL] in a monomer block",
        HeadOrTailOutsideOfMonomer => "[HEAD] and [TAIL] are only allowed inside '{}'",
        TooManyStartTag => "more than one [START] in a part",
        TooManyEndTag => "more than one [END] in a part",
        StartAttributeInMonomer => "[START] inside a monomer block",
        EndAttributeInMonomer => "[END] inside a monomer block",
        MissingStartAttribute => "[END] without [START]",
        MissingEndAttribute => "[START] without [END]",
        InvalidParticleAfterStartEnd => "[START] and [END] must be followed by a connection",
        MonomerAfterMonomer => "two monomer names in a row",
        MonomerInMonomer => "monomer name inside a monomer block",
        MonomerAfterHeadOrTail => "monomer name after [HEAD] or [TAIL]",
        MonomerNameWithoutMonomer => "monomer name does not follow a monomer block",
        NoMonomer => "no monomer block in part",
    }
    ParticleName => {
        InvalidFirstCharacterOfParticle => "particle name must start with an upper-case letter",
        InvalidFirstCharacterOfMonomerName => "monomer name must start with an upper-case letter",
        UnknownParticle => "unknown particle",
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A validation failure: the first violated rule and the character position it was found at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at position {pos}")]
pub struct SpicesError {
    pub kind: ErrorKind,
    pub pos: usize,
}

impl SpicesError {
    pub fn new(kind: ErrorKind, pos: usize) -> Self {
        Self { kind, pos }
    }

    pub fn message_key(&self) -> &'static str {
        self.kind.message_key()
    }
}
