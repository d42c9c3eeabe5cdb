use super::ui;
use crate::core::currency;
use comfy_table::Cell;

pub fn display_currency_table() -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
    for (code, name) in currency::list().iter() {
        table.add_row(vec![Cell::new(code), Cell::new(name)]);
    }
    table.to_string()
}
