use super::{json_pretty, EXIT_SUCCESS};
use conanlock::Reference;

pub fn run(input: &str, json: bool) -> Result<u8, String> {
    let reference = Reference::parse(input).map_err(|e| format!("lockfile error: {e}"))?;
    let purl = reference.purl();
    if json {
        let payload = serde_json::json!({
            "reference": reference,
            "purl": purl,
        });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }
    println!("name:      {}", reference.name);
    println!("version:   {}", reference.version);
    println!("user:      {}", reference.user.as_deref().unwrap_or("(none)"));
    println!("channel:   {}", reference.channel.as_deref().unwrap_or("(none)"));
    println!("revision:  {}", reference.revision.as_deref().unwrap_or("(none)"));
    println!("purl:      {purl}");
    Ok(EXIT_SUCCESS)
}
