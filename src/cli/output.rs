//! Output formatting for CLI

use crate::{
    engine::{PatternReport, StatsReport},
    tictactoe::{Board, Cell},
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, &str)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Render the board as a 3x3 grid; empty cells show their index.
pub fn render_board(board: &Board) -> String {
    let cells = board.cells();
    let mut rows = Vec::with_capacity(3);
    for row in 0..3 {
        let line: Vec<String> = (0..3)
            .map(|col| {
                let pos = row * 3 + col;
                match cells[pos] {
                    Cell::Empty => pos.to_string(),
                    cell => cell.to_char().to_string(),
                }
            })
            .collect();
        rows.push(format!(" {} ", line.join(" | ")));
    }
    rows.join("\n---+---+---\n")
}

/// Print the aggregate figures of a stats report
pub fn print_stats_report(report: &StatsReport) {
    print_section("Nemesis Learning Stats");
    print_stats_table(&[
        ("Games", &report.total_games.to_string()),
        ("Wins", &report.wins.to_string()),
        ("Losses", &report.losses.to_string()),
        ("Draws", &report.draws.to_string()),
        ("Win rate", &format!("{:.1}%", report.win_rate)),
        ("Adaptation", &format!("{}/100", report.adaptation_level)),
        ("Learned patterns", &report.learned_patterns.to_string()),
        ("Blocked patterns", &report.blocked_patterns.to_string()),
    ]);
}

/// Print one line per learned pattern
pub fn print_patterns(patterns: &[PatternReport]) {
    print_subsection("Patterns");
    if patterns.is_empty() {
        println!("  (none)");
        return;
    }
    for pattern in patterns {
        println!(
            "  {:12} x{:<4} {:8} players: {}  last seen {}",
            pattern.key.to_string(),
            pattern.count,
            if pattern.is_blocked { "blocked" } else { "" },
            pattern.players.join(", "),
            pattern.last_seen.format("%Y-%m-%d %H:%M"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Mark;

    #[test]
    fn test_render_board_shows_free_indices() {
        let board = Board::new()
            .apply_move(0, Mark::X)
            .unwrap()
            .apply_move(4, Mark::O)
            .unwrap();
        let rendered = render_board(&board);
        assert!(rendered.starts_with(" X | 1 | 2 "));
        assert!(rendered.contains(" 3 | O | 5 "));
        assert_eq!(rendered.lines().count(), 5);
    }
}
