use std::io::Write;

use anyhow::Result;

use crate::probe::ProbeReport;

/// Write a probe report as pretty-printed JSON.
pub fn export_json<W: Write>(report: &ProbeReport, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}
