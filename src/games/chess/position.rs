// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Board representation and legal move generation.
//!
//! Squares are `rank * 8 + file` with a1 = 0 and h8 = 63. Positions are
//! small `Copy` values; moves are applied copy-make.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    fn home_rank(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub fn from_san(c: char) -> Option<PieceKind> {
        match c {
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn from_uci(c: char) -> Option<PieceKind> {
        PieceKind::from_san(c.to_ascii_uppercase()).filter(|k| *k != PieceKind::King)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

pub type Square = u8;

pub fn square(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

pub fn file_of(sq: Square) -> u8 {
    sq % 8
}

pub fn rank_of(sq: Square) -> u8 {
    sq / 8
}

fn offset(sq: Square, df: i8, dr: i8) -> Option<Square> {
    let f = file_of(sq) as i8 + df;
    let r = rank_of(sq) as i8 + dr;
    if (0..8).contains(&f) && (0..8).contains(&r) {
        Some(square(f as u8, r as u8))
    } else {
        None
    }
}

const KNIGHT_STEPS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const KING_STEPS: [(i8, i8); 8] = [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const WHITE_KING_SIDE: u8 = 1;
const WHITE_QUEEN_SIDE: u8 = 2;
const BLACK_KING_SIDE: u8 = 4;
const BLACK_QUEEN_SIDE: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    DoublePush,
    EnPassant,
    CastleKingSide,
    CastleQueenSide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub capture: bool,
    pub promotion: Option<PieceKind>,
    pub kind: MoveKind,
}

/// The part of a position that decides repetition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey {
    board: [Option<Piece>; 64],
    side: Color,
    castling: u8,
    en_passant: Option<Square>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    side: Color,
    castling: u8,
    en_passant: Option<Square>,
    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u32,
    pub fullmove: u32,
}

impl Position {
    pub fn start() -> Self {
        use PieceKind::*;
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut board = [None; 64];
        for (file, &kind) in back.iter().enumerate() {
            let f = file as u8;
            board[square(f, 0) as usize] = Some(Piece { color: Color::White, kind });
            board[square(f, 1) as usize] = Some(Piece { color: Color::White, kind: Pawn });
            board[square(f, 6) as usize] = Some(Piece { color: Color::Black, kind: Pawn });
            board[square(f, 7) as usize] = Some(Piece { color: Color::Black, kind });
        }
        Self {
            board,
            side: Color::White,
            castling: WHITE_KING_SIDE | WHITE_QUEEN_SIDE | BLACK_KING_SIDE | BLACK_QUEEN_SIDE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove: 1,
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.side
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq as usize]
    }

    /// The en passant square only counts when the capture is actually
    /// playable.
    pub fn key(&self) -> PositionKey {
        let en_passant = self
            .en_passant
            .filter(|_| self.legal_moves().iter().any(|m| m.kind == MoveKind::EnPassant));
        PositionKey {
            board: self.board,
            side: self.side,
            castling: self.castling,
            en_passant,
        }
    }

    fn king_square(&self, color: Color) -> Option<Square> {
        (0..64u8).find(|&sq| {
            self.board[sq as usize] == Some(Piece { color, kind: PieceKind::King })
        })
    }

    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .map(|k| self.is_attacked(k, color.opponent()))
            .unwrap_or(false)
    }

    /// Whether any piece of `by` attacks `sq`.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        let holds = |s: Option<Square>, kinds: &[PieceKind]| {
            s.and_then(|s| self.board[s as usize])
                .map(|p| p.color == by && kinds.contains(&p.kind))
                .unwrap_or(false)
        };

        // A pawn of `by` attacks from one rank behind, relative to its direction.
        let back = -by.forward();
        if holds(offset(sq, 1, back), &[PieceKind::Pawn]) || holds(offset(sq, -1, back), &[PieceKind::Pawn]) {
            return true;
        }
        if KNIGHT_STEPS.iter().any(|&(df, dr)| holds(offset(sq, df, dr), &[PieceKind::Knight])) {
            return true;
        }
        if KING_STEPS.iter().any(|&(df, dr)| holds(offset(sq, df, dr), &[PieceKind::King])) {
            return true;
        }
        let ray_hits = |dirs: &[(i8, i8)], kinds: &[PieceKind]| {
            dirs.iter().any(|&(df, dr)| {
                let mut cur = offset(sq, df, dr);
                while let Some(s) = cur {
                    if let Some(p) = self.board[s as usize] {
                        return p.color == by && kinds.contains(&p.kind);
                    }
                    cur = offset(s, df, dr);
                }
                false
            })
        };
        ray_hits(&DIAGONALS, &[PieceKind::Bishop, PieceKind::Queen])
            || ray_hits(&ORTHOGONALS, &[PieceKind::Rook, PieceKind::Queen])
    }

    fn pseudo_moves(&self) -> Vec<Move> {
        let us = self.side;
        let mut moves = Vec::with_capacity(48);
        for from in 0..64u8 {
            let Some(piece) = self.board[from as usize] else { continue };
            if piece.color != us {
                continue;
            }
            match piece.kind {
                PieceKind::Pawn => self.pawn_moves(from, &mut moves),
                PieceKind::Knight => self.step_moves(from, piece.kind, &KNIGHT_STEPS, &mut moves),
                PieceKind::Bishop => self.ray_moves(from, piece.kind, &DIAGONALS, &mut moves),
                PieceKind::Rook => self.ray_moves(from, piece.kind, &ORTHOGONALS, &mut moves),
                PieceKind::Queen => {
                    self.ray_moves(from, piece.kind, &DIAGONALS, &mut moves);
                    self.ray_moves(from, piece.kind, &ORTHOGONALS, &mut moves);
                }
                PieceKind::King => {
                    self.step_moves(from, piece.kind, &KING_STEPS, &mut moves);
                    self.castle_moves(from, &mut moves);
                }
            }
        }
        moves
    }

    fn push(&self, moves: &mut Vec<Move>, from: Square, to: Square, piece: PieceKind, kind: MoveKind) {
        let capture = self.board[to as usize].is_some() || kind == MoveKind::EnPassant;
        moves.push(Move { from, to, piece, capture, promotion: None, kind });
    }

    fn pawn_moves(&self, from: Square, moves: &mut Vec<Move>) {
        let us = self.side;
        let dir = us.forward();
        let last_rank = if us == Color::White { 7 } else { 0 };
        let start_rank = if us == Color::White { 1 } else { 6 };

        let mut add = |to: Square, kind: MoveKind| {
            if rank_of(to) == last_rank {
                for promo in [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight] {
                    let capture = self.board[to as usize].is_some();
                    moves.push(Move { from, to, piece: PieceKind::Pawn, capture, promotion: Some(promo), kind });
                }
            } else {
                self.push(moves, from, to, PieceKind::Pawn, kind);
            }
        };

        if let Some(one) = offset(from, 0, dir) {
            if self.board[one as usize].is_none() {
                add(one, MoveKind::Normal);
                if rank_of(from) == start_rank {
                    if let Some(two) = offset(one, 0, dir) {
                        if self.board[two as usize].is_none() {
                            add(two, MoveKind::DoublePush);
                        }
                    }
                }
            }
        }
        for df in [-1, 1] {
            let Some(to) = offset(from, df, dir) else { continue };
            match self.board[to as usize] {
                Some(p) if p.color != us => add(to, MoveKind::Normal),
                None if self.en_passant == Some(to) => add(to, MoveKind::EnPassant),
                _ => {}
            }
        }
    }

    fn step_moves(&self, from: Square, kind: PieceKind, steps: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(df, dr) in steps {
            let Some(to) = offset(from, df, dr) else { continue };
            match self.board[to as usize] {
                Some(p) if p.color == self.side => {}
                _ => self.push(moves, from, to, kind, MoveKind::Normal),
            }
        }
    }

    fn ray_moves(&self, from: Square, kind: PieceKind, dirs: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(df, dr) in dirs {
            let mut cur = offset(from, df, dr);
            while let Some(to) = cur {
                match self.board[to as usize] {
                    None => self.push(moves, from, to, kind, MoveKind::Normal),
                    Some(p) => {
                        if p.color != self.side {
                            self.push(moves, from, to, kind, MoveKind::Normal);
                        }
                        break;
                    }
                }
                cur = offset(to, df, dr);
            }
        }
    }

    fn castle_moves(&self, from: Square, moves: &mut Vec<Move>) {
        let us = self.side;
        let them = us.opponent();
        let home = us.home_rank();
        if from != square(4, home) || self.is_attacked(from, them) {
            return;
        }
        let (king_side, queen_side) = match us {
            Color::White => (WHITE_KING_SIDE, WHITE_QUEEN_SIDE),
            Color::Black => (BLACK_KING_SIDE, BLACK_QUEEN_SIDE),
        };
        let empty = |files: &[u8]| files.iter().all(|&f| self.board[square(f, home) as usize].is_none());
        let safe = |files: &[u8]| files.iter().all(|&f| !self.is_attacked(square(f, home), them));
        let rook_home = |f: u8| self.board[square(f, home) as usize] == Some(Piece { color: us, kind: PieceKind::Rook });

        if self.castling & king_side != 0 && rook_home(7) && empty(&[5, 6]) && safe(&[5, 6]) {
            self.push(moves, from, square(6, home), PieceKind::King, MoveKind::CastleKingSide);
        }
        if self.castling & queen_side != 0 && rook_home(0) && empty(&[1, 2, 3]) && safe(&[2, 3]) {
            self.push(moves, from, square(2, home), PieceKind::King, MoveKind::CastleQueenSide);
        }
    }

    /// All moves that do not leave the mover's king in check.
    pub fn legal_moves(&self) -> Vec<Move> {
        let us = self.side;
        self.pseudo_moves()
            .into_iter()
            .filter(|m| !self.apply(m).in_check(us))
            .collect()
    }

    /// Plays `mv`, assumed generated for this position.
    pub fn apply(&self, mv: &Move) -> Position {
        let mut next = *self;
        let us = self.side;
        let home = us.home_rank();
        let moving = self.board[mv.from as usize];

        next.board[mv.from as usize] = None;
        if mv.kind == MoveKind::EnPassant {
            let victim = square(file_of(mv.to), rank_of(mv.from));
            next.board[victim as usize] = None;
        }
        next.board[mv.to as usize] = match mv.promotion {
            Some(kind) => Some(Piece { color: us, kind }),
            None => moving,
        };
        match mv.kind {
            MoveKind::CastleKingSide => {
                next.board[square(7, home) as usize] = None;
                next.board[square(5, home) as usize] = Some(Piece { color: us, kind: PieceKind::Rook });
            }
            MoveKind::CastleQueenSide => {
                next.board[square(0, home) as usize] = None;
                next.board[square(3, home) as usize] = Some(Piece { color: us, kind: PieceKind::Rook });
            }
            _ => {}
        }

        if mv.piece == PieceKind::King {
            next.castling &= match us {
                Color::White => !(WHITE_KING_SIDE | WHITE_QUEEN_SIDE),
                Color::Black => !(BLACK_KING_SIDE | BLACK_QUEEN_SIDE),
            };
        }
        for (corner, right) in [
            (square(0, 0), WHITE_QUEEN_SIDE),
            (square(7, 0), WHITE_KING_SIDE),
            (square(0, 7), BLACK_QUEEN_SIDE),
            (square(7, 7), BLACK_KING_SIDE),
        ] {
            if mv.from == corner || mv.to == corner {
                next.castling &= !right;
            }
        }

        next.en_passant = if mv.kind == MoveKind::DoublePush {
            Some((mv.from + mv.to) / 2)
        } else {
            None
        };
        next.halfmove_clock = if mv.piece == PieceKind::Pawn || mv.capture {
            0
        } else {
            self.halfmove_clock + 1
        };
        if us == Color::Black {
            next.fullmove += 1;
        }
        next.side = us.opponent();
        next
    }

    /// Neither side can possibly deliver mate: bare kings, a single minor
    /// piece, or bishops that all share one square colour.
    pub fn insufficient_material(&self) -> bool {
        let mut minors = Vec::new();
        for sq in 0..64u8 {
            let Some(p) = self.board[sq as usize] else { continue };
            match p.kind {
                PieceKind::King => {}
                PieceKind::Knight | PieceKind::Bishop => minors.push((p.kind, sq)),
                _ => return false,
            }
        }
        match minors.as_slice() {
            [] | [_] => true,
            bishops if bishops.iter().all(|(k, _)| *k == PieceKind::Bishop) => {
                let shade = |sq: Square| (file_of(sq) + rank_of(sq)) % 2;
                let first = shade(bishops[0].1);
                bishops.iter().all(|&(_, sq)| shade(sq) == first)
            }
            _ => false,
        }
    }
}
