use std::fmt;

use comfy_table::{Cell, Table as Grid, presets::ASCII_FULL_CONDENSED};
use gear_audit_engine::Table;

// --------------------------------------------------------
// Report Table View (psql-style grid)
// --------------------------------------------------------

pub struct TableView<'a> {
    table: &'a Table,
}

impl<'a> TableView<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    fn grid(&self) -> Grid {
        let mut grid = Grid::new();
        grid.load_preset(ASCII_FULL_CONDENSED)
            .set_header(self.table.columns().iter().map(Cell::new).collect::<Vec<_>>());

        for row in self.table.rows() {
            grid.add_row(
                row.iter()
                    .map(|cell| Cell::new(cell.as_deref().unwrap_or("")))
                    .collect::<Vec<_>>(),
            );
        }
        grid
    }
}

impl fmt::Display for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.table.columns().is_empty() {
            return writeln!(f, "(empty report)");
        }
        writeln!(f, "{}", self.grid())
    }
}
