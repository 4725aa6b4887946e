//! Audit command handler - full tree consistency report

use crate::audit::{audit_tree, AuditReport};
use crate::cli::AuditArgs;
use crate::commands::scan::declaration_line;
use crate::commands::{banner, issue_line, render, CommandContext, CommandOutput};
use crate::config::SpecGuardConfig;
use crate::error::Result;

/// Configuration with the command-line overrides applied
fn effective_config(args: &AuditArgs, base: &SpecGuardConfig) -> SpecGuardConfig {
    let mut config = base.clone();
    if !args.suffix.is_empty() {
        config.scan.suffixes = args.suffix.clone();
    }
    if !args.exclude.is_empty() {
        config.scan.exclude_dirs = args.exclude.clone();
    }
    if let Some(jobs) = args.jobs {
        config.scan.jobs = jobs;
    }
    config
}

pub fn run_audit(args: &AuditArgs, ctx: &CommandContext) -> Result<CommandOutput> {
    let config = effective_config(args, &ctx.config);
    let report = audit_tree(&args.root(), &config, ctx.progress)?;

    let json_value = serde_json::json!({
        "_type": "audit",
        "root": report.root,
        "quality_score": report.quality_score,
        "totals": report.totals,
        "files": report.files,
        "read_failures": report.read_failures,
        "duplicates": report.duplicates,
        "coverage_gaps": report.coverage_gaps,
    });

    let rendered = render(&json_value, ctx, || {
        format_audit_text(&report, args.issues_only, ctx.verbose)
    })?;

    let blocking = args.fail_on_error && report.has_errors();
    if blocking {
        tracing::warn!(errors = report.totals.errors, "audit found blocking errors");
    }

    Ok(CommandOutput { rendered, blocking })
}

fn format_audit_text(report: &AuditReport, issues_only: bool, verbose: bool) -> String {
    let mut output = banner(&format!("AUDIT {}", report.root));
    let totals = &report.totals;

    output.push_str(&format!(
        "files: {}  declarations: {} (spec {}, regression {}, pending {})\n",
        totals.files, totals.declarations, totals.spec, totals.regression, totals.pending
    ));
    output.push_str(&format!(
        "issues: {} errors, {} warnings, {} suggestions\n",
        totals.errors, totals.warnings, totals.suggestions
    ));
    output.push_str(&format!("quality score: {}%\n", report.quality_score));

    for file in &report.files {
        if issues_only && file.issues.is_empty() {
            continue;
        }
        output.push_str(&format!(
            "\n{} ({} declarations, {} issues)\n",
            file.path,
            file.total_count(),
            file.issues.len()
        ));
        if verbose {
            for decl in &file.declarations {
                output.push_str(&declaration_line(decl));
            }
        }
        for issue in &file.issues {
            output.push_str(&issue_line(issue));
        }
    }

    if !report.duplicates.is_empty() {
        output.push_str(&format!("\nduplicates[{}]:\n", report.duplicates.len()));
        for dup in &report.duplicates {
            let locations: Vec<String> = dup.locations.iter().map(|l| l.to_string()).collect();
            output.push_str(&format!("  {}  {}\n", dup.spec_id, locations.join(", ")));
        }
    }

    if !report.coverage_gaps.is_empty() {
        output.push_str(&format!("\ncoverage_gaps[{}]:\n", report.coverage_gaps.len()));
        for gap in &report.coverage_gaps {
            output.push_str(&issue_line(&gap.to_issue()));
        }
    }

    if !report.read_failures.is_empty() {
        output.push_str(&format!("\nread_failures[{}]:\n", report.read_failures.len()));
        for failure in &report.read_failures {
            output.push_str(&issue_line(&failure.to_issue()));
        }
    }

    output
}
