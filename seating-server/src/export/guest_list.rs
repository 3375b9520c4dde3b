//! Printable guest list, one section per table

use chrono::{DateTime, Local};
use seating_print::{Font, PdfBuilder, PrintResult};
use shared::models::{Guest, Overview, TableRoster};

use crate::core::EventInfo;

const TITLE: &str = "Liste des Invités par Table";

/// Download name for an export generated at `millis`
pub fn export_filename(millis: i64) -> String {
    format!("guest-list-{}.pdf", millis)
}

fn plural(count: u32, one: &str, many: &str) -> String {
    format!("{} {}", count, if count > 1 { many } else { one })
}

/// Render the guest list as PDF bytes
///
/// Tables come in overview order (by number); each shows its occupancy and
/// guests, or a placeholder when nobody is seated there.
pub fn render_guest_list(
    overview: &Overview,
    event: &EventInfo,
    generated_at: DateTime<Local>,
) -> PrintResult<Vec<u8>> {
    let mut pdf = PdfBuilder::a4();
    pdf.title(TITLE);
    pdf.footer(&format!(
        "Document généré le {} à {}",
        generated_at.format("%d/%m/%Y"),
        generated_at.format("%H:%M")
    ));

    pdf.font(Font::Bold, 20.0).line(TITLE);
    pdf.font(Font::Regular, 11.0);
    if let Some(headline) = event.headline() {
        pdf.line(&headline);
    }
    if !event.location.trim().is_empty() {
        pdf.line(event.location.trim());
    }
    pdf.rule().gap(4.0);

    let totals = &overview.totals;
    let col = pdf.content_width() / 4.0;
    let capacity = format!("{}/{}", totals.used_capacity, totals.total_capacity);
    let guests = totals.guests.to_string();
    let arrived = totals.arrived.to_string();
    let tables = totals.tables.to_string();
    pdf.font(Font::Bold, 14.0).row(&[
        (0.0, guests.as_str()),
        (col, arrived.as_str()),
        (col * 2.0, tables.as_str()),
        (col * 3.0, capacity.as_str()),
    ]);
    pdf.font(Font::Regular, 9.0).row(&[
        (0.0, "Invités"),
        (col, "Arrivés"),
        (col * 2.0, "Tables"),
        (col * 3.0, "Capacité"),
    ]);
    pdf.gap(12.0);

    for roster in &overview.tables {
        table_section(&mut pdf, roster);
    }

    pdf.build()
}

fn table_section(pdf: &mut PdfBuilder, roster: &TableRoster) {
    let table = &roster.table;

    // keep the header block together with the first guest row
    pdf.ensure_space(70.0);
    pdf.font(Font::Bold, 12.0)
        .shaded_line(&format!("Table {} - {}", table.number, table.name));

    pdf.font(Font::Regular, 9.0);
    if !table.description.trim().is_empty() {
        pdf.line(table.description.trim());
    }
    pdf.line(&format!(
        "{} / {} places occupées",
        table.current_count, table.capacity
    ));
    pdf.gap(2.0);

    pdf.font(Font::Regular, 10.0);
    if roster.guests.is_empty() {
        pdf.line("Aucun invité assigné");
    } else {
        let width = pdf.content_width();
        for guest in &roster.guests {
            guest_row(pdf, guest, width);
        }
    }
    pdf.gap(10.0);
}

fn guest_row(pdf: &mut PdfBuilder, guest: &Guest, width: f32) {
    let places = plural(guest.places, "place", "places");
    let children = if guest.children > 0 {
        plural(guest.children, "enfant", "enfants")
    } else {
        String::new()
    };
    let arrived = if guest.arrived { "Arrivé" } else { "" };

    pdf.row(&[
        (0.0, guest.name.as_str()),
        (width * 0.55, places.as_str()),
        (width * 0.72, children.as_str()),
        (width * 0.87, arrived),
    ]);
}
