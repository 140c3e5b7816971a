//! Terminal output helpers.

use std::io::{self, BufRead, Write};

/// A record that can be printed as a table row.
pub trait TableRow {
    /// Column headings.
    const HEADERS: &'static [&'static str];

    /// One cell per heading.
    fn cells(&self) -> Vec<String>;
}

/// Print rows as an aligned table on stdout.
pub fn print_table<T: TableRow>(rows: &[&T]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_table(&mut out, rows)
}

fn write_table<T: TableRow>(out: &mut impl Write, rows: &[&T]) -> io::Result<()> {
    let cells: Vec<Vec<String>> = rows.iter().map(|row| row.cells()).collect();

    let mut widths: Vec<usize> = T::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let headers: Vec<String> = T::HEADERS.iter().map(|h| (*h).to_owned()).collect();
    write_row(out, &headers, &widths)?;
    for row in &cells {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}

/// Print one line on stdout.
pub fn print_line(line: &str) -> io::Result<()> {
    writeln!(io::stdout().lock(), "{line}")
}

/// Ask a yes/no question on stderr and read the answer from stdin.
///
/// Only `y` or `yes` (any case) counts as yes.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    {
        let mut err = io::stderr().lock();
        write!(err, "{prompt} [y/N] ")?;
        err.flush()?;
    }
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
