// 💬 Console search loop
// Reads queries line by line, prints a result table per query

use crate::catalog::Catalog;
use crate::export::format_unit_price;
use crate::normalizer::Record;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Typing this ends the loop
pub const EXIT_COMMAND: &str = "exit";

const COLUMNS: [&str; 6] = ["№", "Наименование", "цена", "вес", "файл", "цена за кг"];

/// What a single line of input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Exit,
    Empty,
    Search(String),
}

/// Trim and lower-case the input; the Catalog expects lower-case queries
pub fn parse_query(line: &str) -> Query {
    let query = line.trim().to_lowercase();
    if query == EXIT_COMMAND {
        Query::Exit
    } else if query.is_empty() {
        Query::Empty
    } else {
        Query::Search(query)
    }
}

pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Shell { input, output }
    }

    /// Run until `exit` or end of input. Returns the number of searches made.
    ///
    /// A line that isn't valid UTF-8 is reported and skipped; other read or
    /// write failures end the session.
    pub fn run(&mut self, catalog: &Catalog) -> io::Result<usize> {
        writeln!(self.output, "Welcome to the price list analyzer!")?;
        writeln!(self.output, "-----------------------------------\n")?;

        let mut searches = 0;
        loop {
            write!(
                self.output,
                "Enter a query (or \"{}\" to quit): ",
                EXIT_COMMAND
            )?;
            self.output.flush()?;

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => {
                    writeln!(self.output)?;
                    break;
                }
                Ok(_) => {}
                // the bad line is consumed; keep reading
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    warn!("unreadable query line: {}", err);
                    writeln!(self.output, "Error: {}\n", err)?;
                    continue;
                }
                Err(err) => return Err(err),
            }

            match parse_query(&line) {
                Query::Exit => break,
                Query::Empty => writeln!(self.output, "Query can't be empty\n")?,
                Query::Search(query) => {
                    let results = catalog.search(&query);
                    self.show_results(&query, &results)?;
                    searches += 1;
                }
            }
        }

        writeln!(self.output, "Done.")?;
        Ok(searches)
    }

    fn show_results(&mut self, query: &str, results: &[&Record]) -> io::Result<()> {
        if results.is_empty() {
            writeln!(self.output, "Nothing found for your query, try again.\n")?;
            return Ok(());
        }

        writeln!(self.output, "\nResults for \"{}\":", query)?;
        write!(self.output, "{}", render_table(results))?;
        writeln!(self.output, "Items found: {}\n", results.len())?;
        Ok(())
    }
}

/// Bordered plain-text table, numbered from 1
pub fn render_table(results: &[&Record]) -> String {
    let rows: Vec<[String; 6]> = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                (i + 1).to_string(),
                r.name().to_string(),
                r.price().to_string(),
                r.weight().to_string(),
                r.source_label().to_string(),
                format_unit_price(r.unit_price()),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let border = {
        let parts: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+\n", parts.join("+"))
    };
    let line = |cells: &[String]| {
        let parts: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!(" {}{} ", c, " ".repeat(w - c.chars().count())))
            .collect();
        format!("|{}|\n", parts.join("|"))
    };

    let header: Vec<String> = COLUMNS.iter().map(|h| h.to_string()).collect();

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&line(&header[..]));
    out.push_str(&border);
    for row in &rows {
        out.push_str(&line(&row[..]));
    }
    out.push_str(&border);
    out
}
