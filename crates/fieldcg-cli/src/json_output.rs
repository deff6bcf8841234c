//! Renders an [`fieldcg::ExtractionResult`] in the two output shapes spec
//! `# 6` asks for: the default array-of-edge-objects JSON, and (`--fg`) the
//! `acg` analyzer's raw arrow-chain text lines.

use std::io::{self, Write};

use fieldcg::ExtractionResult;

/// `[{ "source": {...}, "target": {...} }, ...]`, one object per edge,
/// written directly from the already-`Serialize`-derived edge types (no
/// hand-rolled JSON builder).
pub fn write_json(out: &mut impl Write, result: &ExtractionResult) -> io::Result<()> {
    let text = serde_json::to_string_pretty(&result.edges)?;
    writeln!(out, "{text}")
}

/// One `caller -> callee` line per edge, used for the `acg` analyzer's
/// `--fg` raw text mode; falls back to the edge labels when `acg` strings
/// were not populated (non-`Acg` analyzer type).
pub fn write_acg_text(out: &mut impl Write, result: &ExtractionResult) -> io::Result<()> {
    if result.acg.is_empty() {
        for edge in &result.edges {
            writeln!(out, "{} -> {}", edge.source.label, edge.target.label)?;
        }
    } else {
        for line in &result.acg {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
