//! Line-oriented edit loop.
//!
//! Each input line is one of:
//! - `REF=TEXT`: store TEXT in REF, then print `REF<TAB>DISPLAY` for every
//!   cell whose display may have changed (the edited cell first)
//! - `?FORMULA`: evaluate against the current cells without storing
//! - blank, or starting with `#`: ignored
//!
//! Malformed lines are reported on stderr and skipped.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tallysheet_core::Document;
use tallysheet_engine::engine::display_result;

use crate::parse_assignment;

pub fn run<R: BufRead, W: Write>(doc: &mut Document, input: R, output: &mut W) -> Result<()> {
    for (idx, line) in input.lines().enumerate() {
        let line = line.context("failed to read input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(formula) = trimmed.strip_prefix('?') {
            let result = doc.evaluate_input(formula);
            writeln!(output, "{}", display_result(&result, doc.decimals))?;
            continue;
        }

        match parse_assignment(trimmed) {
            Ok((cell, text)) => {
                for changed in doc.set_cell_from_input(cell, &text) {
                    let display = doc.get_cell_display(&changed);
                    writeln!(output, "{}\t{}", changed, display)?;
                }
            }
            Err(message) => eprintln!("line {}: {}", idx + 1, message),
        }
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn session(script: &str) -> String {
        let mut doc = Document::new();
        let mut out = Vec::new();
        run(&mut doc, Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn edits_report_changed_cells() {
        let out = session("A1=1\nA2=2\nA3==SUM(A1:A3)\nA1=5\n");
        assert_eq!(
            out,
            "A1\t1\nA2\t2\nA3\t#ERROR: circular reference at A3\nA1\t5\nA3\t#ERROR: circular reference at A3\n"
        );
    }

    #[test]
    fn dependents_follow_edits() {
        let out = session("B1=5\nA1==B1\nB1=8\n");
        assert_eq!(out, "B1\t5\nA1\t5\nB1\t8\nA1\t8\n");
    }

    #[test]
    fn queries_comments_and_bad_lines() {
        let out = session("# setup\n\nA1=10\nnot an assignment\n?A1/0\n? 2+3*4\n");
        assert_eq!(out, "A1\t10\n0\n20\n");
    }
}
