use super::{GenContext, MaybeMovePush};
use crate::attack;
use crate::types::Piece;

pub fn find_moves<P: MaybeMovePush>(ctx: &mut GenContext<'_>, dst: &mut P) -> Result<(), P::Err> {
    // A pinned knight can never stay on the pin line
    let knights = ctx.pos.piece2(ctx.side, Piece::Knight) & !ctx.pins.pinned();
    for from in knights {
        for to in attack::knight(from) & ctx.allowed(from) {
            let mv = ctx.simple(Piece::Knight, from, to);
            ctx.emit(dst, mv)?;
        }
    }
    Ok(())
}
