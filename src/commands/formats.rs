//! Formats subcommand handler

use anyhow::Result;

use neopen::FormatVersion;

/// Print one line per supported format version.
#[cfg(not(tarpaulin_include))]
pub fn handle() -> Result<()> {
    println!(
        "{:<12} {:>10} {:>10} {:>12}",
        "version", "x mm/unit", "y mm/unit", "pressure max"
    );
    for version in FormatVersion::ALL {
        let scale = version.spec().scale;
        println!(
            "{:<12} {:>10.5} {:>10.5} {:>12}",
            version.to_string(),
            scale.x_scale,
            scale.y_scale,
            scale.pressure_max
        );
    }
    Ok(())
}
