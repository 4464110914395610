//! Terminal rendering of a grid page.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, ColumnConstraint, ContentArrangement, Table, Width};
use shopdesk_lib::grid::{ColumnWidth, RenderedGrid};

/// Rough pixel width of one terminal cell.
const PX_PER_CHAR: u32 = 8;

const MIN_CHARS: u16 = 4;

pub fn print_grid(grid: &RenderedGrid) {
    println!("{}", build_table(grid));
    println!(
        "Page {} of {} ({} total)",
        grid.page + 1,
        grid.page_count.max(1),
        grid.total_count
    );
}

fn build_table(grid: &RenderedGrid) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        grid.headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    for row in &grid.rows {
        table.add_row(row.cells.iter().map(Cell::new));
    }
    table.set_constraints(grid.widths.iter().map(|w| constraint(*w)));
    table
}

/// Persisted pixel widths cap a column; flex columns only get a floor.
fn constraint(width: ColumnWidth) -> ColumnConstraint {
    match width {
        ColumnWidth::Fixed(px) => {
            let chars = u16::try_from(px / PX_PER_CHAR).unwrap_or(u16::MAX).max(MIN_CHARS);
            ColumnConstraint::UpperBoundary(Width::Fixed(chars))
        }
        ColumnWidth::Flex(_) => ColumnConstraint::LowerBoundary(Width::Fixed(MIN_CHARS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk_lib::grid::RenderedRow;

    #[test]
    fn test_pixel_widths_become_char_caps() {
        assert_eq!(
            constraint(ColumnWidth::Fixed(200)),
            ColumnConstraint::UpperBoundary(Width::Fixed(25))
        );
        assert_eq!(
            constraint(ColumnWidth::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Fixed(MIN_CHARS))
        );
    }

    #[test]
    fn test_table_contains_cells() {
        let grid = RenderedGrid {
            headers: vec!["Name".into(), "Active".into()],
            widths: vec![ColumnWidth::Flex(1.0), ColumnWidth::Fixed(100)],
            rows: vec![RenderedRow {
                id: Some("p1".into()),
                cells: vec!["Runner".into(), "Yes".into()],
            }],
            page: 0,
            page_count: 1,
            total_count: 1,
        };
        let rendered = build_table(&grid).to_string();
        assert!(rendered.contains("Name"));
        assert!(rendered.contains("Runner"));
        assert!(rendered.contains("Yes"));
    }
}
