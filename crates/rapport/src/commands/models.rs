use super::{load_catalog, save_catalog};
use rapport_telemetry::Paths;

pub fn run(catalog: Option<&str>, save: bool) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let mut catalog = load_catalog(catalog, &paths)?;
    catalog.sort_by(|a, b| a.provider.cmp(&b.provider).then_with(|| a.id.cmp(&b.id)));
    if save {
        save_catalog(&catalog, &paths.catalog_file())?;
    }
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}
