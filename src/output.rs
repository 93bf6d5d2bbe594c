//! Output formatting for location records and unit listings

use crate::index::types::{LocationRecord, ParentUnits, PATH_SEPARATOR};
use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print records as coloured `TOP → SECOND → THIRD → LEAF` lines
pub fn print_records(records: &[&LocationRecord], color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    write_records(&mut out, records)
}

/// Print one unit name per line
pub fn print_names<S: AsRef<str>>(names: &[S]) -> io::Result<()> {
    let mut out = stdout(false);
    for name in names {
        writeln!(out, "{}", name.as_ref())?;
    }
    Ok(())
}

/// Print the ancestry of a leaf, one labelled unit per line
pub fn print_parent(parent: &ParentUnits, labels: [&str; 3], color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    write_parent(&mut out, parent, labels)
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)
}

pub fn write_records<W: WriteColor>(out: &mut W, records: &[&LocationRecord]) -> io::Result<()> {
    for record in records {
        write_record(out, record)?;
    }
    Ok(())
}

fn write_record<W: WriteColor>(out: &mut W, record: &LocationRecord) -> io::Result<()> {
    let ancestors = [
        record.top_level.as_str(),
        record.second_level.as_str(),
        record.third_level.as_str(),
    ];

    for name in ancestors {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", name)?;
        out.reset()?;
        write!(out, "{}", PATH_SEPARATOR)?;
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(out, "{}", record.leaf)?;
    out.reset()?;

    if let Some(tag) = &record.electoral_tag {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "  [{}]", tag)?;
        out.reset()?;
    }

    writeln!(out)
}

fn write_parent<W: WriteColor>(
    out: &mut W,
    parent: &ParentUnits,
    labels: [&str; 3],
) -> io::Result<()> {
    let values = [
        parent.top_level.as_str(),
        parent.second_level.as_str(),
        parent.third_level.as_str(),
    ];
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    for (label, value) in labels.iter().zip(values) {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{:width$}", label, width = width)?;
        out.reset()?;
        writeln!(out, "  {}", value)?;
    }
    Ok(())
}
