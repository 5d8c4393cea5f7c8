//! ASCII layout parser used to author level snapshots.

use roguepilot_core::{CellKind, Location};

use crate::LayoutError;

/// Entity glyph discovered while scanning a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    Player,
    Monster,
    Item,
    HealthPack,
}

/// Terrain and entity placements recovered from a layout string.
#[derive(Debug)]
pub(crate) struct ParsedLayout {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) cells: Vec<CellKind>,
    pub(crate) placements: Vec<(Location, Placement)>,
}

/// Parses the layout row by row.
///
/// Leading and trailing blank lines are ignored. Rows shorter than the widest
/// row are padded with walls.
pub(crate) fn parse(layout: &str) -> Result<ParsedLayout, LayoutError> {
    let rows: Vec<&str> = layout
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .skip_while(|line| line.trim().is_empty())
        .collect();
    let trailing = rows
        .iter()
        .rev()
        .take_while(|line| line.trim().is_empty())
        .count();
    let rows = &rows[..rows.len() - trailing];

    let width = rows
        .iter()
        .map(|row| row.chars().count())
        .max()
        .unwrap_or(0);
    if width == 0 {
        return Err(LayoutError::EmptyLayout);
    }

    let width_u32 = u32::try_from(width).map_err(|_| LayoutError::Oversized)?;
    let height_u32 = u32::try_from(rows.len()).map_err(|_| LayoutError::Oversized)?;
    let mut cells = vec![CellKind::Wall; width * rows.len()];
    let mut placements = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        let row_index = i32::try_from(y).map_err(|_| LayoutError::Oversized)?;
        for (x, glyph) in row.chars().enumerate() {
            let column_index = i32::try_from(x).map_err(|_| LayoutError::Oversized)?;
            let location = Location::new(column_index, row_index);
            let (kind, placement) = classify(glyph)
                .ok_or(LayoutError::UnknownGlyph { glyph, location })?;
            cells[y * width + x] = kind;
            if let Some(placement) = placement {
                placements.push((location, placement));
            }
        }
    }

    Ok(ParsedLayout {
        width: width_u32,
        height: height_u32,
        cells,
        placements,
    })
}

fn classify(glyph: char) -> Option<(CellKind, Option<Placement>)> {
    let classified = match glyph {
        '#' => (CellKind::Wall, None),
        '^' => (CellKind::Trap, None),
        '.' | ' ' => (CellKind::Floor, None),
        'E' => (CellKind::Exit, None),
        '@' => (CellKind::Floor, Some(Placement::Player)),
        'M' => (CellKind::Floor, Some(Placement::Monster)),
        'I' => (CellKind::Floor, Some(Placement::Item)),
        'H' => (CellKind::Floor, Some(Placement::HealthPack)),
        _ => return None,
    };
    Some(classified)
}
