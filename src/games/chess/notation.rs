// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Move notation: SAN (`Nbd7`, `exd8=Q+`, `O-O`) and UCI (`e2e4`, `e7e8q`).
//!
//! Text is parsed into constraints and matched against the legal moves of
//! the current position, so the notation never has to be trusted.

use super::position::{file_of, rank_of, square, Move, MoveKind, PieceKind, Position, Square};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// Text is not SAN or UCI.
    Unparseable,
    /// Well formed, but no legal move fits.
    Illegal,
    /// More than one legal move fits.
    Ambiguous,
}

#[derive(Debug, Default)]
struct Pattern {
    piece: Option<PieceKind>,
    from: Option<Square>,
    from_file: Option<u8>,
    from_rank: Option<u8>,
    to: Option<Square>,
    promotion: Option<PieceKind>,
    castle: Option<MoveKind>,
    capture: bool,
}

impl Pattern {
    fn matches(&self, m: &Move) -> bool {
        if let Some(kind) = self.castle {
            return m.kind == kind;
        }
        if matches!(m.kind, MoveKind::CastleKingSide | MoveKind::CastleQueenSide) && self.from.is_none() {
            return false;
        }
        // SAN pawn captures always name the origin file.
        if self.piece == Some(PieceKind::Pawn) && self.from_file.is_none() && m.capture {
            return false;
        }
        self.piece.map_or(true, |p| p == m.piece)
            && self.from.map_or(true, |s| s == m.from)
            && self.from_file.map_or(true, |f| f == file_of(m.from))
            && self.from_rank.map_or(true, |r| r == rank_of(m.from))
            && self.to.map_or(true, |s| s == m.to)
            && self.promotion == m.promotion
            && (!self.capture || m.capture)
    }
}

fn parse_file(c: char) -> Option<u8> {
    ('a'..='h').contains(&c).then(|| c as u8 - b'a')
}

fn parse_rank(c: char) -> Option<u8> {
    ('1'..='8').contains(&c).then(|| c as u8 - b'1')
}

fn parse_square(file: char, rank: char) -> Option<Square> {
    Some(square(parse_file(file)?, parse_rank(rank)?))
}

fn parse_uci(text: &str) -> Option<Pattern> {
    let chars: Vec<char> = text.chars().collect();
    if !(chars.len() == 4 || chars.len() == 5) {
        return None;
    }
    let from = parse_square(chars[0], chars[1])?;
    let to = parse_square(chars[2], chars[3])?;
    let promotion = match chars.get(4) {
        Some(&c) => Some(PieceKind::from_uci(c)?),
        None => None,
    };
    Some(Pattern {
        from: Some(from),
        to: Some(to),
        promotion,
        ..Default::default()
    })
}

fn parse_san(text: &str) -> Option<Pattern> {
    match text {
        "O-O" | "0-0" => {
            return Some(Pattern { castle: Some(MoveKind::CastleKingSide), ..Default::default() })
        }
        "O-O-O" | "0-0-0" => {
            return Some(Pattern { castle: Some(MoveKind::CastleQueenSide), ..Default::default() })
        }
        _ => {}
    }

    let mut body: Vec<char> = text.chars().collect();
    let mut pattern = Pattern::default();

    // Promotion suffix, with or without '='.
    if let Some(&last) = body.last() {
        if let Some(kind) = PieceKind::from_san(last).filter(|k| *k != PieceKind::King) {
            if body.len() >= 3 {
                body.pop();
                if body.last() == Some(&'=') {
                    body.pop();
                }
                pattern.promotion = Some(kind);
            }
        }
    }

    pattern.piece = Some(match body.first().copied().and_then(PieceKind::from_san) {
        Some(kind) => {
            body.remove(0);
            kind
        }
        None => PieceKind::Pawn,
    });

    if body.contains(&'x') {
        pattern.capture = true;
        body.retain(|&c| c != 'x');
    }
    if body.len() < 2 || body.len() > 4 {
        return None;
    }
    let split = body.len() - 2;
    pattern.to = Some(parse_square(body[split], body[split + 1])?);

    for &c in &body[..split] {
        if let Some(f) = parse_file(c) {
            if pattern.from_file.replace(f).is_some() {
                return None;
            }
        } else if let Some(r) = parse_rank(c) {
            if pattern.from_rank.replace(r).is_some() {
                return None;
            }
        } else {
            return None;
        }
    }
    Some(pattern)
}

/// Strips check, mate, annotation and en passant suffixes.
fn clean(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix("e.p.").unwrap_or(trimmed).trim_end();
    trimmed.trim_end_matches(['+', '#', '!', '?'])
}

/// Resolves `text` to the single legal move it denotes.
pub fn resolve(position: &Position, text: &str) -> Result<Move, NotationError> {
    let text = clean(text);
    if text.is_empty() {
        return Err(NotationError::Unparseable);
    }
    let pattern = parse_uci(text)
        .or_else(|| parse_san(text))
        .ok_or(NotationError::Unparseable)?;

    let legal = position.legal_moves();
    let mut hits = legal.iter().filter(|m| pattern.matches(m));
    match (hits.next(), hits.next()) {
        (Some(m), None) => Ok(*m),
        (None, _) => Err(NotationError::Illegal),
        (Some(_), Some(_)) => Err(NotationError::Ambiguous),
    }
}
