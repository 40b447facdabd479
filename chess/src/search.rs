//! Fixed-depth alpha-beta search

use crate::eval::{Evaluator, Score, INF, MATE};
use crate::moves::Move;
use crate::position::Position;

use log::info;

/// Search parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Depth in half-moves
    pub depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig { depth: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Score from the point of view of the side to move
    pub score: Score,
    /// Best move, `None` if there are no legal moves or the depth is zero
    pub best: Option<Move>,
    /// Principal variation, starting with `best`
    pub pv: Vec<Move>,
    /// Number of nodes visited by this search
    pub nodes: u64,
}

/// Score of a position without legal moves found at distance `ply` from the root
#[inline]
fn terminal_score(pos: &Position, ply: u32) -> Score {
    if pos.is_check() {
        -MATE + ply as Score
    } else {
        0
    }
}

/// Fail-hard negamax with alpha-beta pruning
///
/// Scores outside the window are reported as the nearest bound, so only the root score is exact.
pub struct AlphaBeta<E> {
    eval: E,
    config: SearchConfig,
    nodes: u64,
}

impl<E: Evaluator> AlphaBeta<E> {
    pub fn new(eval: E, config: SearchConfig) -> AlphaBeta<E> {
        AlphaBeta {
            eval,
            config,
            nodes: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Total number of nodes visited since creation
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn search(&mut self, pos: &Position) -> SearchResult {
        let start_nodes = self.nodes;
        let mut pos = *pos;
        let mut pv = Vec::new();
        let score = self.negamax(&mut pos, self.config.depth, 0, -INF, INF, &mut pv);
        let res = SearchResult {
            score,
            best: pv.first().copied(),
            pv,
            nodes: self.nodes - start_nodes,
        };
        info!(
            "depth {} score {} nodes {} pv {}",
            self.config.depth,
            res.score,
            res.nodes,
            res.pv
                .iter()
                .map(|mv| mv.uci().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        );
        res
    }

    fn negamax(
        &mut self,
        pos: &mut Position,
        depth: u32,
        ply: u32,
        mut alpha: Score,
        beta: Score,
        pv: &mut Vec<Move>,
    ) -> Score {
        self.nodes += 1;
        pv.clear();
        if depth == 0 {
            return self.eval.evaluate(pos);
        }

        let moves = pos.legal_moves();
        if moves.is_empty() {
            return terminal_score(pos, ply).clamp(alpha, beta);
        }

        let mut child_pv = Vec::new();
        for mv in moves {
            let u = pos.make_move_raw(mv);
            let score = -self.negamax(pos, depth - 1, ply + 1, -beta, -alpha, &mut child_pv);
            pos.unmake_move(mv, u);
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
                pv.clear();
                pv.push(mv);
                pv.extend_from_slice(&child_pv);
            }
        }
        alpha
    }
}

/// Plain minimax without pruning, returning the score and the principal variation
///
/// Uses the same conventions as [`AlphaBeta`], so both agree on the score and the best move.
pub fn minimax<E: Evaluator>(pos: &Position, depth: u32, eval: &E) -> (Score, Vec<Move>) {
    do_minimax(pos, depth, 0, eval)
}

fn do_minimax<E: Evaluator>(pos: &Position, depth: u32, ply: u32, eval: &E) -> (Score, Vec<Move>) {
    if depth == 0 {
        return (eval.evaluate(pos), Vec::new());
    }
    let moves = pos.legal_moves();
    if moves.is_empty() {
        return (terminal_score(pos, ply), Vec::new());
    }
    let mut best = -INF;
    let mut pv = Vec::new();
    for mv in moves {
        let (score, line) = do_minimax(&pos.make_move(mv), depth - 1, ply + 1, eval);
        let score = -score;
        if score > best {
            best = score;
            pv.clear();
            pv.push(mv);
            pv.extend(line);
        }
    }
    (best, pv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Material;

    #[test]
    fn test_mate_in_one() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut search = AlphaBeta::new(Material, SearchConfig { depth: 2 });
        let res = search.search(&pos);
        assert_eq!(res.score, MATE - 1);
        assert_eq!(res.best.map(|mv| mv.uci().to_string()), Some("a1a8".to_string()));
        assert!(res.best.unwrap().is_check());
        assert_eq!(res.pv.len(), 1);
        assert_eq!(search.nodes(), res.nodes);
    }

    #[test]
    fn test_prefers_shorter_mate() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut search = AlphaBeta::new(Material, SearchConfig { depth: 4 });
        let res = search.search(&pos);
        assert_eq!(res.score, MATE - 1);
        assert_eq!(res.best.map(|mv| mv.uci().to_string()), Some("a1a8".to_string()));
    }

    #[test]
    fn test_terminal() {
        let stalemate = Position::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        let mut search = AlphaBeta::new(Material, SearchConfig { depth: 3 });
        let res = search.search(&stalemate);
        assert_eq!(res.score, 0);
        assert_eq!(res.best, None);
        assert!(res.pv.is_empty());

        let mated = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        let res = search.search(&mated);
        assert_eq!(res.score, -MATE);
        assert_eq!(res.best, None);
    }

    #[test]
    fn test_wins_material() {
        // Free queen on d5
        let pos = Position::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let mut search = AlphaBeta::new(Material, SearchConfig { depth: 2 });
        let res = search.search(&pos);
        assert_eq!(res.best.map(|mv| mv.uci().to_string()), Some("d1d5".to_string()));
        assert!(res.score > 400);
    }

    #[test]
    fn test_matches_minimax() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
            "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1",
            "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];
        for fen in fens {
            let pos = Position::from_fen(fen).unwrap();
            for depth in 1..=3 {
                let (score, pv) = minimax(&pos, depth, &Material);
                let mut search = AlphaBeta::new(Material, SearchConfig { depth });
                let res = search.search(&pos);
                assert_eq!(res.score, score, "{} at depth {}", fen, depth);
                assert_eq!(res.best, pv.first().copied(), "{} at depth {}", fen, depth);
            }
        }
    }

    #[test]
    fn test_custom_evaluator() {
        let pos = Position::initial();
        let mut search = AlphaBeta::new(|_: &Position| 7, SearchConfig { depth: 1 });
        let res = search.search(&pos);
        assert_eq!(res.score, -7);
        assert_eq!(res.nodes, 21);
    }
}
