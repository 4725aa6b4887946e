//! Scan command handler - one file, no cross-file checks

use serde_json::Value;

use crate::audit::scan_file;
use crate::cli::ScanArgs;
use crate::commands::{banner, issue_line, render, CommandContext, CommandOutput};
use crate::error::Result;
use crate::schema::{SpecFile, TestDeclaration};

pub fn run_scan(args: &ScanArgs, ctx: &CommandContext) -> Result<CommandOutput> {
    let file = scan_file(&args.path, &ctx.config)?;

    let mut declarations = Vec::with_capacity(file.declarations.len());
    for decl in &file.declarations {
        let mut value = serde_json::to_value(decl)?;
        if !args.spans {
            if let Value::Object(map) = &mut value {
                map.remove("body_span");
            }
        }
        declarations.push(value);
    }

    let json_value = serde_json::json!({
        "_type": "scan",
        "path": file.path,
        "declared_count": file.declared_count,
        "counts": {
            "total": file.total_count(),
            "spec": file.spec_count,
            "regression": file.regression_count,
            "pending": file.pending_count,
            "active": file.active_count,
        },
        "declarations": declarations,
        "issues": file.issues,
    });

    let rendered = render(&json_value, ctx, || format_scan_text(&file, args.spans))?;
    Ok(CommandOutput::ok(rendered))
}

/// `[GWT]`-style marker summary, `-` for each missing marker
pub(crate) fn marker_flags(decl: &TestDeclaration) -> String {
    [
        (decl.has_given, 'G'),
        (decl.has_when, 'W'),
        (decl.has_then, 'T'),
    ]
    .iter()
    .map(|(present, c)| if *present { *c } else { '-' })
    .collect()
}

pub(crate) fn declaration_line(decl: &TestDeclaration) -> String {
    let tag = match (&decl.tag, &decl.raw_tag) {
        (Some(tag), _) => tag.as_str().to_string(),
        (None, Some(raw)) => format!("{}?", raw),
        (None, None) => "-".to_string(),
    };
    format!(
        "  L{:<5} {:<24} {:<12} [{}]{} \"{}\"\n",
        decl.line_number,
        decl.spec_id.as_deref().unwrap_or("-"),
        tag,
        marker_flags(decl),
        if decl.is_pending { " pending" } else { "" },
        decl.raw_title
    )
}

fn format_scan_text(file: &SpecFile, spans: bool) -> String {
    let mut output = banner(&format!("SCAN {}", file.path));

    output.push_str(&format!(
        "declarations: {} (spec {}, regression {}, pending {}, active {})\n",
        file.total_count(),
        file.spec_count,
        file.regression_count,
        file.pending_count,
        file.active_count
    ));
    match file.declared_count {
        Some(n) => output.push_str(&format!("header: Spec Count: {}\n", n)),
        None => output.push_str("header: none\n"),
    }

    output.push('\n');
    for decl in &file.declarations {
        output.push_str(&declaration_line(decl));
        if spans {
            output.push_str(&format!(
                "         span {}..{}\n",
                decl.body_span.start, decl.body_span.end
            ));
        }
    }

    output.push_str(&format!("\nissues[{}]:\n", file.issues.len()));
    for issue in &file.issues {
        output.push_str(&issue_line(issue));
    }

    output
}
