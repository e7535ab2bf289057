//! Table rendering for command output

use tabled::settings::object::Rows;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::release::types::{ModuleDescriptor, ReleaseRecord};

#[derive(Tabled)]
struct ReleaseRow {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Released")]
    released: String,
    #[tabled(rename = "Changeset")]
    changeset: String,
}

#[derive(Tabled)]
struct ModuleRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn render<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub fn releases_table(records: &[ReleaseRecord]) -> String {
    let rows: Vec<ReleaseRow> = records
        .iter()
        .map(|record| ReleaseRow {
            version: record.version.to_string(),
            channel: record.version.channel().to_string(),
            released: record.release_date.format("%Y-%m-%d").to_string(),
            changeset: record.changeset.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    render(&rows)
}

pub fn modules_table(modules: &[ModuleDescriptor]) -> String {
    let rows: Vec<ModuleRow> = modules
        .iter()
        .map(|module| ModuleRow {
            id: module.id.clone(),
            name: module.name.clone(),
        })
        .collect();
    render(&rows)
}
