//! Source-annotated error reports

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use cjsify_parser::ParseError;
use std::io::{self, Write};

/// Writes one report per syntax error.
pub fn write_parse_errors<W: Write>(
    errors: &[ParseError],
    filename: &str,
    source: &str,
    color: bool,
    mut out: W,
) -> io::Result<()> {
    for err in errors {
        let start = err.span.start.min(source.len());
        let end = err.span.end.clamp(start, source.len());
        let span = (filename, start..end);
        Report::build(ReportKind::Error, span.clone())
            .with_config(Config::default().with_color(color))
            .with_code("E1000")
            .with_message("Syntax error")
            .with_label(Label::new(span).with_message(&err.message).with_color(Color::Red))
            .finish()
            .write((filename, Source::from(source)), &mut out)?;
    }
    Ok(())
}
