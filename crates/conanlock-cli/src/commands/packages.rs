use super::{json_pretty, load_catalog, EXIT_SUCCESS};
use std::path::Path;

pub fn run(lockfile: &Path, json: bool) -> Result<u8, String> {
    let catalog = load_catalog(lockfile)?;
    if json {
        println!("{}", json_pretty(&catalog.packages)?);
        return Ok(EXIT_SUCCESS);
    }
    for pkg in &catalog.packages {
        let meta = pkg.metadata();
        println!(
            "{}  {}  context={} package_id={}",
            pkg.purl(),
            meta.reference,
            if meta.context.is_empty() { "-" } else { meta.context.as_str() },
            meta.package_id.as_deref().unwrap_or("(none)"),
        );
    }
    Ok(EXIT_SUCCESS)
}
