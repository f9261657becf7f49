use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(db: &Path, kind: Option<&str>) -> Result<(), String> {
    let kind = kind.map(super::parse_kind).transpose()?;
    let database = super::load_database(db)?;
    let (store, _) = database.into_parts().map_err(|e| e.to_string())?;

    let groups: Vec<_> = store
        .iter()
        .filter(|g| kind.is_none_or(|k| g.kind == k))
        .collect();

    if groups.is_empty() {
        println!("  No dialogue groups found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Kind", "Infos", "Scripted"]);

    for group in &groups {
        let scripted = group
            .infos
            .iter()
            .filter(|i| i.effect_script().is_some_and(|s| !s.trim().is_empty()))
            .count();
        table.add_row(vec![
            group.id.clone(),
            group.kind.to_string(),
            group.infos.len().to_string(),
            scripted.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} dialogue group{}", groups.len(), super::plural(groups.len()));

    Ok(())
}
