use std::io::{self, Write};

use anyhow::Result;
use cgmes_core::CgmesProfile;
use tabwriter::TabWriter;

pub fn handle() -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "RANK\tCODE\tPROFILE")?;
    for profile in CgmesProfile::all() {
        writeln!(
            writer,
            "{}\t{}\t{}",
            profile.rank(),
            profile.short_name(),
            profile.full_name()
        )?;
    }
    writer.flush()?;
    Ok(())
}
