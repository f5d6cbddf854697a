//! `wirekit describe`

use crate::sources::{SourceArgs, parse_inputs};
use anyhow::Result;
use std::fmt::Write as _;
use wirekit_codegen::MemorySink;
use wirekit_core::{MessageDescriptor, WireKind};

pub fn run(sources: &SourceArgs, json: bool) -> Result<()> {
    let config = sources.load_config()?;
    let files = parse_inputs(&config)?;

    let mut sink = MemorySink::new();
    let report = config.generator()?.run(&files, &mut sink)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.descriptors)?);
    } else {
        print!("{}", render_text(&report.descriptors));
    }

    for failure in &report.failures {
        tracing::warn!("{}", failure.error);
    }
    Ok(())
}

/// Render descriptors as `.proto`-style message blocks
pub fn render_text(descriptors: &[MessageDescriptor]) -> String {
    let mut out = String::new();

    for (i, descriptor) in descriptors.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "message {} {{", descriptor.schema_name());
        for field in descriptor.fields() {
            let ty = match (field.kind(), field.type_name()) {
                (WireKind::Message, Some(type_name)) => type_name,
                (kind, _) => kind.proto_name(),
            };
            let label = if field.is_nullable() { "optional " } else { "" };
            let _ = writeln!(out, "  {label}{ty} {} = {};", field.name(), field.number());
        }
        out.push_str("}\n");
    }
    out
}
