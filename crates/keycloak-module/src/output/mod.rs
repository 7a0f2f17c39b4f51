//! Output formatting utilities

use crate::result::ModuleResult;
use serde::Serialize;
use std::io::Write;

/// Write data as a single compact JSON document followed by a newline
pub fn json_output<T: Serialize, W: Write>(data: &T, mut writer: W) -> std::io::Result<()> {
    serde_json::to_writer(&mut writer, data)?;
    writeln!(writer)?;
    writer.flush()
}

/// Print the module result on stdout, where Ansible reads it
pub fn emit(result: &ModuleResult) -> std::io::Result<()> {
    json_output(result, std::io::stdout().lock())
}
