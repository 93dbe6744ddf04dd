pub mod analyze;
pub mod capacity;
pub mod embed;
pub mod extract;

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// One line of a two column report
#[derive(Tabled)]
pub(crate) struct Figure {
    pub name: &'static str,
    pub value: String,
}

impl Figure {
    pub fn new(name: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}

pub(crate) fn print_figures(figures: Vec<Figure>) {
    let mut table = Table::new(figures);
    table.with(Style::rounded());
    println!("{table}");
}
