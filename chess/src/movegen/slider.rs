use super::{GenContext, MaybeMovePush};
use crate::attack;
use crate::types::Piece;

/// Moves of bishops, rooks or queens, depending on `piece`
pub fn find_moves<P: MaybeMovePush>(
    piece: Piece,
    ctx: &mut GenContext<'_>,
    dst: &mut P,
) -> Result<(), P::Err> {
    for from in ctx.pos.piece2(ctx.side, piece) {
        let allowed = ctx.allowed(from);
        if allowed.is_empty() {
            continue;
        }
        for &r in attack::slider_rays(piece) {
            let targets = attack::ray_attacks(r, from, ctx.all) & allowed;
            let quiet = targets & !ctx.them;
            for to in quiet {
                let mv = ctx.simple(piece, from, to);
                ctx.emit(dst, mv)?;
            }
            // At most one capture per ray, on the first blocker
            for to in targets & ctx.them {
                let mv = ctx.simple(piece, from, to);
                ctx.emit(dst, mv)?;
            }
        }
    }
    Ok(())
}
