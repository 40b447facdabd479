use super::{GenContext, MaybeMovePush};
use crate::bitboard::Bitboard;
use crate::moves::{Move, PromotePiece};
use crate::types::{Color, Piece, Rank, Square};
use crate::{attack, geometry, legal};

/// Direction-dependent pawn geometry
struct PawnDir {
    forward: isize,
    start: Rank,
    last: Rank,
}

impl PawnDir {
    fn of(c: Color) -> PawnDir {
        PawnDir {
            forward: geometry::pawn_forward_delta(c),
            start: geometry::double_push_src_rank(c),
            last: geometry::promote_rank(c),
        }
    }
}

fn emit_maybe_promote<P: MaybeMovePush>(
    ctx: &mut GenContext<'_>,
    dst: &mut P,
    dir: &PawnDir,
    mv: Move,
) -> Result<(), P::Err> {
    if mv.to().rank() != dir.last {
        return ctx.emit(dst, mv);
    }
    for p in PromotePiece::ALL {
        ctx.emit(dst, mv.with_promote(p))?;
    }
    Ok(())
}

pub fn find_moves<P: MaybeMovePush>(ctx: &mut GenContext<'_>, dst: &mut P) -> Result<(), P::Err> {
    let dir = PawnDir::of(ctx.side);
    let pawns = ctx.pos.piece2(ctx.side, Piece::Pawn);

    for from in pawns {
        let allowed = ctx.allowed(from);

        // Pawns never stand on the last rank, so one step forward is always on the board
        let one = from.add(dir.forward);
        if !ctx.all.has(one) {
            if allowed.has(one) {
                let mv = Move::new(Piece::Pawn, ctx.side, from, one);
                emit_maybe_promote(ctx, dst, &dir, mv)?;
            }
            if from.rank() == dir.start {
                let two = one.add(dir.forward);
                if !ctx.all.has(two) && allowed.has(two) {
                    ctx.emit(dst, Move::new(Piece::Pawn, ctx.side, from, two))?;
                }
            }
        }

        for to in attack::pawn(ctx.side, from) & ctx.them & allowed {
            let mv = ctx.simple(Piece::Pawn, from, to);
            emit_maybe_promote(ctx, dst, &dir, mv)?;
        }
    }

    if let Some(ep) = ctx.pos.ep() {
        find_enpassant(ctx, dst, pawns & attack::pawn(ctx.side.inv(), ep), ep)?;
    }
    Ok(())
}

fn find_enpassant<P: MaybeMovePush>(
    ctx: &mut GenContext<'_>,
    dst: &mut P,
    candidates: Bitboard,
    ep: Square,
) -> Result<(), P::Err> {
    // Both the pawn and its victim leave their squares, so pins alone can't tell if it's legal
    for from in candidates {
        let mv = Move::en_passant(ctx.side, from, ep);
        if !legal::is_king_in_check_after_move(ctx.pos, mv) {
            ctx.emit(dst, mv)?;
        }
    }
    Ok(())
}
