//! Boards command implementation - List known build targets

use anyhow::Result;

use crate::cli::args::Cli;
use crate::config::{AppConfig, BoardTypeRegistry};

/// Print every known board and the boards.txt lines a build needs for it
pub async fn execute_boards_command(cli: &Cli, config: AppConfig) -> Result<()> {
    let registry = BoardTypeRegistry::from_config(&config.board);

    println!("🔍 Known Teensy boards:");
    println!("======================\n");

    for target in registry.list_board_types() {
        let marker = if target.id == config.board.default_board {
            " (default)"
        } else {
            ""
        };
        println!("{}{}", target, marker);
        if cli.verbose > 0 {
            for line in target.required_lines() {
                println!("    {}", line);
            }
        }
    }

    if registry.get_board_type(&config.board.default_board).is_none() {
        println!(
            "\n⚠️  Default board '{}' is not a known Teensy board",
            config.board.default_board
        );
    }
    Ok(())
}
