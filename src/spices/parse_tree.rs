use crate::spices::tokenizer::{Bracket, Tag, Token, TokenKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseParticle {
    pub name: String,
    pub ring_labels: Vec<u32>,
    pub head: bool,
    pub tail: bool,
    pub start: bool,
    pub end: bool,
    pub backbone: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitBody {
    Particle(ParseParticle),
    Monomer { chain: Chain, name: Option<String> },
}

/// One element of a chain: a particle or monomer block, its repeat count and
/// the branches hanging off it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub repeat: u32,
    pub body: UnitBody,
    pub branches: Vec<Chain>,
}

/// Units joined by `-`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub root: Chain,
}

/// Builds the tree of one part. The tokens must already have passed validation.
pub fn build_parse_tree(tokens: &[Token]) -> ParseTree {
    let mut cursor = Cursor { tokens, idx: 0 };
    ParseTree {
        root: cursor.chain(),
    }
}

struct Cursor<'a> {
    tokens: &'a [Token],
    idx: usize,
}

impl<'a> Cursor<'a> {
    fn kind_at(&self, idx: usize) -> Option<&'a TokenKind> {
        self.tokens.get(idx).map(|t| &t.kind)
    }

    fn peek(&self) -> Option<&'a TokenKind> {
        self.kind_at(self.idx)
    }

    fn chain(&mut self) -> Chain {
        let mut units = Vec::new();
        while let Some(unit) = self.unit() {
            units.push(unit);
            if self.peek() != Some(&TokenKind::Connector) {
                break;
            }
            self.idx += 1;
        }
        Chain { units }
    }

    fn unit(&mut self) -> Option<Unit> {
        let repeat = match self.peek() {
            Some(TokenKind::Integer(n)) => {
                self.idx += 1;
                *n
            }
            _ => 1,
        };

        let body = match self.peek()? {
            TokenKind::Particle(name) => {
                self.idx += 1;
                UnitBody::Particle(self.particle(name))
            }
            TokenKind::Open(Bracket::Curly) => {
                self.idx += 1;
                let chain = self.chain();
                self.skip_close(Bracket::Curly);
                let name = self.monomer_name();
                UnitBody::Monomer { chain, name }
            }
            _ => return None,
        };

        let mut branches = Vec::new();
        while self.peek() == Some(&TokenKind::Open(Bracket::Normal)) {
            self.idx += 1;
            branches.push(self.chain());
            self.skip_close(Bracket::Normal);
        }

        Some(Unit {
            repeat,
            body,
            branches,
        })
    }

    fn particle(&mut self, name: &str) -> ParseParticle {
        let mut particle = ParseParticle {
            name: name.to_string(),
            ..ParseParticle::default()
        };
        loop {
            match self.peek() {
                Some(TokenKind::Open(Bracket::Angular)) => {
                    if let Some(TokenKind::Integer(n)) = self.kind_at(self.idx + 1) {
                        particle.ring_labels.push(*n);
                    }
                    self.idx += 3;
                }
                Some(TokenKind::Quote) => {
                    if let Some(TokenKind::Integer(n)) = self.kind_at(self.idx + 1) {
                        particle.backbone = Some(*n);
                    }
                    self.idx += 3;
                }
                Some(TokenKind::Tag(tag)) => {
                    match tag {
                        Tag::Head => particle.head = true,
                        Tag::Tail => particle.tail = true,
                        Tag::Start => particle.start = true,
                        Tag::End => particle.end = true,
                    }
                    self.idx += 1;
                }
                _ => break,
            }
        }
        particle
    }

    fn monomer_name(&mut self) -> Option<String> {
        if self.peek() != Some(&TokenKind::MonomerMark) {
            return None;
        }
        match self.kind_at(self.idx + 1) {
            Some(TokenKind::Particle(name)) => {
                self.idx += 2;
                Some(name.clone())
            }
            _ => {
                self.idx += 1;
                None
            }
        }
    }

    fn skip_close(&mut self, bracket: Bracket) {
        if self.peek() == Some(&TokenKind::Close(bracket)) {
            self.idx += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spices::tokenizer::tokenize;

    fn tree(s: &str) -> Chain {
        build_parse_tree(&tokenize(s).unwrap()).root
    }

    fn particle_name(unit: &Unit) -> &str {
        match &unit.body {
            UnitBody::Particle(p) => &p.name,
            UnitBody::Monomer { .. } => panic!("expected a particle"),
        }
    }

    #[test]
    fn linear_chain() {
        let root = tree("A-B-C");
        let names: Vec<&str> = root.units.iter().map(particle_name).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert!(root.units.iter().all(|u| u.repeat == 1 && u.branches.is_empty()));
    }

    #[test]
    fn branches_attach_to_their_unit() {
        let root = tree("A(B)(C-D)-E");
        assert_eq!(root.units.len(), 2);
        let branches = &root.units[0].branches;
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1].units.len(), 2);
        assert_eq!(particle_name(&branches[1].units[1]), "D");
    }

    #[test]
    fn repeat_count() {
        let root = tree("3A-B");
        assert_eq!(root.units[0].repeat, 3);
        assert_eq!(root.units[1].repeat, 1);
    }

    #[test]
    fn particle_attributes() {
        let root = tree("A[1][2][START]'1'-B[1][2][END]'2'");
        let UnitBody::Particle(a) = &root.units[0].body else {
            panic!("expected a particle");
        };
        assert_eq!(a.ring_labels, vec![1, 2]);
        assert!(a.start && !a.end);
        assert_eq!(a.backbone, Some(1));
    }

    #[test]
    fn named_monomer() {
        let root = tree("X-2{A[HEAD]-B[TAIL]}#PE(C)-Y");
        assert_eq!(root.units.len(), 3);
        let unit = &root.units[1];
        assert_eq!(unit.repeat, 2);
        assert_eq!(unit.branches.len(), 1);
        let UnitBody::Monomer { chain, name } = &unit.body else {
            panic!("expected a monomer");
        };
        assert_eq!(name.as_deref(), Some("PE"));
        let UnitBody::Particle(head) = &chain.units[0].body else {
            panic!("expected a particle");
        };
        assert!(head.head);
    }
}
