use std::path::PathBuf;

use anyhow::Context as _;
use tetrion_engine::{FIELD_HEIGHT, FIELD_WIDTH, GameSession};

use crate::{model::save_file::SaveFile, util};

#[derive(Debug, Clone, clap::Args)]
pub struct InspectArg {
    /// Path to the save file (JSON format)
    save_file: PathBuf,
}

pub fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let InspectArg { save_file } = arg;

    eprintln!("Loading saved game from {}", save_file.display());
    let save: SaveFile = util::read_json_file("save", save_file)?;

    // Loading into a session runs the same validation as resuming would
    let mut session = GameSession::new();
    session
        .load(save.game.clone())
        .with_context(|| format!("Invalid saved game: {}", save_file.display()))?;
    eprintln!("Save file is valid");

    let active = save.game.active_piece;
    let next = save.game.next_piece;
    println!("Saved at:     {}", save.saved_at);
    println!("Score:        {}", save.game.score);
    println!("Locked cells: {}", save.game.field.len());
    println!(
        "Active piece: {} rotation {} at ({}, {}), {:?}",
        active.piece.kind().as_char(),
        active.piece.rotation().index(),
        active.piece.position().x(),
        active.piece.position().y(),
        active.color,
    );
    println!("Next piece:   {}, {:?}", next.kind.as_char(), next.color);
    println!();
    print!("{}", field_art(&session));

    Ok(())
}

/// Visible rows with locked cells as `#` and the falling piece as `@`.
fn field_art(session: &GameSession) -> String {
    let active = session.active_piece().piece.absolute_cells();
    let mut art = String::new();
    for y in 0..FIELD_HEIGHT {
        for x in 0..FIELD_WIDTH {
            let c = if active.contains(&(x, y)) {
                '@'
            } else if session.field().is_occupied(x, y) {
                '#'
            } else {
                '.'
            };
            art.push(c);
        }
        art.push('\n');
    }
    art
}

#[cfg(test)]
mod tests {
    use tetrion_engine::{ActivePiece, Field, Piece, PieceColor, PieceKind, PiecePosition};

    use super::*;

    #[test]
    fn test_field_art_marks_active_piece() {
        let field = Field::from_ascii(
            "
            .#########
            #########.
            ",
        );
        let mut session = GameSession::new();
        let mut saved = session.save();
        saved.field = field.cells().to_vec();
        saved.active_piece = ActivePiece {
            piece: Piece::with_pose(PieceKind::O, 0, PiecePosition::new(0, 0)),
            color: PieceColor::Yellow,
        };
        session.load(saved).unwrap();

        let art = field_art(&session);
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines.len(), 20, "{art}");
        assert_eq!(lines[0], "@@........");
        assert_eq!(lines[1], "@@........");
        assert_eq!(lines[2], "..........");
        assert_eq!(lines[18], ".#########");
        assert_eq!(lines[19], "#########.");
        assert_eq!(art.replace('@', "."), session.field().to_string());
    }

    #[test]
    fn test_hidden_rows_are_not_drawn() {
        let session = GameSession::new();
        let hidden = session
            .active_piece()
            .piece
            .absolute_cells()
            .iter()
            .filter(|(_, y)| *y < 0)
            .count();
        let art = field_art(&session);
        assert_eq!(art.matches('@').count(), 4 - hidden, "{art}");
    }
}
