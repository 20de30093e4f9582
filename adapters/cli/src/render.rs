//! Plain-text rendering of the maze and the actors in it.

use maze_hunt_core::{CellCoord, CellState};
use maze_hunt_world::{query, World};

const WALL: char = '#';
const FLOOR: char = '.';
const ENTRANCE: char = 'E';
const OBJECTIVE: char = '*';
const PURSUER: char = 'P';
const TARGET: char = '@';

/// Renders the world as text, one line per row.
///
/// Actors outside the grid are not drawn. The target is drawn over the
/// pursuer when both share a cell.
pub(crate) fn render(world: &World) -> String {
    let grid = query::grid(world);
    let pursuer = query::pursuer(world).cell;
    let target = query::target(world).cell;
    let objectives = query::objectives(world);

    let capacity = (grid.width() as usize + 1) * grid.height() as usize;
    let mut output = String::with_capacity(capacity);
    for row in 0..grid.height() {
        for column in 0..grid.width() {
            let cell = CellCoord::new(column, row);
            let glyph = if target == Some(cell) {
                TARGET
            } else if pursuer == Some(cell) {
                PURSUER
            } else if objectives.contains(&cell) {
                OBJECTIVE
            } else if cell == grid.entrance() {
                ENTRANCE
            } else {
                match grid.cell_at(cell) {
                    Ok(CellState::Floor) => FLOOR,
                    _ => WALL,
                }
            };
            output.push(glyph);
        }
        output.push('\n');
    }
    output
}
