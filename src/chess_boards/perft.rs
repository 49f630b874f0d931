use crate::chess_boards::chess_board::{ChessBoard, Color};

/// Counts leaf positions `depth` plies deep, alternating sides from `active_color`.
/// Games end when a king is captured, so such positions are leaves.
pub fn perft(board: &ChessBoard, active_color: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1u64;
    }
    if !board.king_present(Color::White) || !board.king_present(Color::Black) {
        return 1u64;
    }

    let mut node_count = 0u64;
    for mv in board.all_legal_moves(active_color) {
        let mut new_board = board.clone();
        new_board.apply(mv);
        node_count += perft(&new_board, active_color.opposite(), depth - 1);
    }
    node_count
}
