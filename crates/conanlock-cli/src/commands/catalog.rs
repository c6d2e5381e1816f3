use super::{json_pretty, load_catalog, EXIT_SUCCESS};
use std::path::Path;

pub fn run(lockfile: &Path, json: bool) -> Result<u8, String> {
    let catalog = load_catalog(lockfile)?;
    if json {
        println!("{}", json_pretty(&catalog)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("packages ({}):", catalog.packages.len());
    for pkg in &catalog.packages {
        println!("  {:<24} {:<16} {}", pkg.name(), pkg.version(), pkg.purl());
    }
    println!("relationships ({}):", catalog.relationships.len());
    for rel in &catalog.relationships {
        println!("  {} {} {}", rel.from, rel.kind.as_str(), rel.to);
    }
    Ok(EXIT_SUCCESS)
}
