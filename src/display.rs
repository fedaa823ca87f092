use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stderr, Write};

use connect4_negamax::{
    position::{Position, CURRENT, OPPONENT},
    HEIGHT, WIDTH,
};

/// Draws a position on stderr, red tiles belong to the player to move
pub fn display(position: &Position) -> Result<()> {
    let mut stderr = stderr();

    let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
    stderr.queue(PrintStyledContent(style(cols + "\n")))?;

    // top row first
    for row in (0..HEIGHT).rev() {
        for column in 0..WIDTH {
            stderr.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match position.cell(column, row) {
                        CURRENT => Color::Red,
                        OPPONENT => Color::Yellow,
                        _ => Color::DarkBlue,
                    }),
            ))?;
        }
        stderr.queue(PrintStyledContent(style("\n")))?;
    }
    stderr.flush()?;
    Ok(())
}
