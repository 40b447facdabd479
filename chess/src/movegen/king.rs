use super::{GenContext, MaybeMovePush};
use crate::moves::Move;
use crate::types::{CastlingSide, Piece};
use crate::{attack, castling, legal};

pub fn find_moves<P: MaybeMovePush>(ctx: &mut GenContext<'_>, dst: &mut P) -> Result<(), P::Err> {
    let pos = ctx.pos;
    let from = ctx.king;
    let near_enemy_king = attack::king(pos.king(ctx.side.inv()));
    for to in attack::king(from) & !ctx.us & !near_enemy_king {
        let mv = ctx.simple(Piece::King, from, to);
        if !legal::is_king_in_check_after_move(pos, mv) {
            ctx.emit(dst, mv)?;
        }
    }

    if ctx.checkers.is_nonempty() {
        return Ok(());
    }
    for side in [CastlingSide::King, CastlingSide::Queen] {
        if !pos.castling().has(ctx.side, side)
            || (castling::pass(ctx.side, side) & ctx.all).is_nonempty()
        {
            continue;
        }
        // The king's own square is already known to be safe
        let path = castling::king_path(ctx.side, side);
        if path[1..]
            .iter()
            .any(|&sq| pos.is_square_attacked(sq, ctx.side.inv()))
        {
            continue;
        }
        ctx.emit(dst, Move::castling(ctx.side, side))?;
    }
    Ok(())
}
