//! ASCII rack preview
//!
//! Draws placements on a character grid, two columns and one row per inch.

use crate::entities::rack::{Placement, RackGeometry};

const COLS_PER_INCH: f64 = 2.0;
const ROWS_PER_INCH: f64 = 1.0;

/// Render the rack outline, its wires and every placed part
pub fn render(geometry: &RackGeometry, placements: &[Placement], show_wires: bool) -> String {
    let cols = (geometry.width * COLS_PER_INCH).round().max(1.0) as usize;
    let rows = (geometry.height * ROWS_PER_INCH).round().max(1.0) as usize;

    let mut grid = vec![vec!['.'; cols]; rows];

    if show_wires {
        for wire in geometry.wire_positions() {
            let col = (wire * COLS_PER_INCH) as usize;
            if col < cols {
                for line in grid.iter_mut() {
                    line[col] = '|';
                }
            }
        }
    }

    for (row, line) in grid.iter_mut().enumerate() {
        let y = (row as f64 + 0.5) / ROWS_PER_INCH;
        for (col, cell) in line.iter_mut().enumerate() {
            let x = (col as f64 + 0.5) / COLS_PER_INCH;
            if placements.iter().any(|p| covers(p, x, y)) {
                *cell = '#';
            }
        }
    }

    let border = format!("+{}+", "-".repeat(cols));
    let mut out = String::with_capacity((cols + 3) * (rows + 2));
    out.push_str(&border);
    out.push('\n');
    for line in grid {
        out.push('|');
        out.extend(line);
        out.push('|');
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out
}

fn covers(p: &Placement, x: f64, y: f64) -> bool {
    x >= p.x && x < p.x + p.width && y >= p.y && y < p.y + p.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::rack::{self, PartFootprint, SpacingPolicy};

    #[test]
    fn test_empty_rack() {
        let geometry = RackGeometry::default();
        let out = render(&geometry, &[], false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0].len(), 44);
        assert!(!out.contains('#'));
    }

    #[test]
    fn test_wires_drawn() {
        let geometry = RackGeometry::default();
        let out = render(&geometry, &[], true);
        let middle = out.lines().nth(5).unwrap_or_default();
        // Outer borders plus 13 wires
        assert_eq!(middle.matches('|').count(), 15);
    }

    #[test]
    fn test_parts_drawn() {
        let geometry = RackGeometry::default();
        let footprint = PartFootprint::new(4.0, 6.0);
        let policy = SpacingPolicy::FreeGrid {
            horizontal_spacing: 0.25,
            vertical_spacing: 0.25,
        };
        let plan = rack::plan(&geometry, &footprint, &policy, 1).unwrap();
        let placed = rack::placements(&geometry, &footprint, &plan);
        let out = render(&geometry, &placed, false);

        // Eight 4 × 6 in parts, 8 columns by 6 rows each
        assert_eq!(out.matches('#').count(), 8 * 8 * 6);
    }
}
