//! Subcommand implementations

use std::path::Path;

use bibtab_core::{
    bibliography_basename, build_cite_list, convert, diagnostics, formatter, parser, tsv,
    BibtabConfig, BibtabError, Diagnostic, Result, Schema, TableFormat,
};

use crate::{FormatArgs, ToBibArgs, ToTableArgs};

/// BibTeX -> table
pub fn to_table(args: &ToTableArgs, config_path: Option<&Path>) -> Result<()> {
    ensure_input(&args.input)?;
    let config = BibtabConfig::resolve(config_path)?;
    let format = table_format(&config, &args.format);

    let parsed = parser::read_file(&args.input)?;
    for issue in &parsed.issues {
        tracing::warn!("line {}: {}", issue.line, issue.message);
    }

    let mut options = config.convert.with_delimiter_check(format.delimiter);
    if let Some(rename_keys) = args.rename_keys {
        options = options.with_rename_keys(rename_keys);
    }
    if args.sort {
        options = options.with_sort_by_key(true);
    }

    tracing::info!("Converting .bib to table ...");
    let (table, warnings) = convert::to_table(&parsed.database, Schema::standard(), &options);
    report(&warnings, args.report.as_deref())?;

    tsv::write_file(&args.output, &table, &format)?;
    Ok(())
}

/// Table -> BibTeX, plus optional LaTeX fragment
pub fn to_bib(args: &ToBibArgs, config_path: Option<&Path>) -> Result<()> {
    ensure_input(&args.input)?;
    let config = BibtabConfig::resolve(config_path)?;
    let format = table_format(&config, &args.format);

    let table = tsv::read_file(&args.input, &format)?;

    tracing::info!("Converting table to .bib ...");
    let (database, warnings) = convert::to_database(&table, Schema::standard());
    report(&warnings, args.report.as_deref())?;

    formatter::write_file(&args.output, &database)?;

    let cite_list = build_cite_list(&database);
    if args.print_cites {
        tracing::info!("{}", cite_list);
    }
    if let Some(tex) = &args.tex {
        config
            .document
            .write(tex, &cite_list, &bibliography_basename(&args.output))?;
    }
    Ok(())
}

/// Fail before any conversion when the input is not a file
fn ensure_input(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(BibtabError::MissingInput(path.to_path_buf()))
    }
}

fn table_format(config: &BibtabConfig, args: &FormatArgs) -> TableFormat {
    let mut format = config.table;
    if let Some(delimiter) = args.delimiter {
        format = format.with_delimiter(delimiter);
    }
    if let Some(quote) = args.quote {
        format = format.with_quote(quote);
    }
    format
}

/// Log every warning and optionally write them as JSON
fn report(warnings: &[Diagnostic], path: Option<&Path>) -> Result<()> {
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
    if !warnings.is_empty() {
        tracing::info!("{} warning(s)", warnings.len());
    }
    if let Some(path) = path {
        std::fs::write(path, diagnostics::to_json(warnings)?)?;
    }
    Ok(())
}
