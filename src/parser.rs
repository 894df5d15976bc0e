//! Markdown standings table parser.
//!
//! Snapshots are published as pipe-delimited markdown tables whose first
//! three columns are rank, points and team tag. Anything that does not look
//! like a data row is skipped, row by row, without failing the parse.

use crate::models::RankingEntry;
use std::fmt;
use tracing::trace;

const DELIMITER: char = '|';
const HEADER_CELL: &str = "Rank";
const MIN_CELLS: usize = 3;

/// Why a line did not produce an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    Header,
    Separator,
    /// Prose or anything else outside the table.
    NotTableRow,
    TooFewCells,
    InvalidRank,
    InvalidPoints,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::Blank => "blank line",
            SkipReason::Header => "header row",
            SkipReason::Separator => "separator row",
            SkipReason::NotTableRow => "not a table row",
            SkipReason::TooFewCells => "fewer than three cells",
            SkipReason::InvalidRank => "rank is not a positive integer",
            SkipReason::InvalidPoints => "points is not an integer",
        };
        f.write_str(text)
    }
}

/// Result of parsing a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Entry(RankingEntry),
    Skip(SkipReason),
}

/// Parse one line of a snapshot.
pub fn parse_row(line: &str) -> RowOutcome {
    let line = line.trim();
    if line.is_empty() {
        return RowOutcome::Skip(SkipReason::Blank);
    }
    if !line.starts_with(DELIMITER) {
        return RowOutcome::Skip(SkipReason::NotTableRow);
    }

    let cells: Vec<&str> = line
        .split(DELIMITER)
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect();

    match cells.first() {
        Some(&first) if first == HEADER_CELL => return RowOutcome::Skip(SkipReason::Header),
        Some(&first) if is_separator(first) => return RowOutcome::Skip(SkipReason::Separator),
        _ => {}
    }

    if cells.len() < MIN_CELLS {
        return RowOutcome::Skip(SkipReason::TooFewCells);
    }

    let rank = match cells[0].parse::<u32>() {
        Ok(rank) if rank > 0 => rank,
        _ => return RowOutcome::Skip(SkipReason::InvalidRank),
    };
    let Ok(points) = cells[1].parse::<u32>() else {
        return RowOutcome::Skip(SkipReason::InvalidPoints);
    };

    RowOutcome::Entry(RankingEntry {
        rank,
        points,
        tag: cells[2].to_string(),
    })
}

/// Separator cells are dashes, optionally with `:` alignment markers.
fn is_separator(cell: &str) -> bool {
    cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
}

/// Lazily parse every line of `content`, yielding one outcome per line.
pub fn rows(content: &str) -> impl Iterator<Item = RowOutcome> + '_ {
    content.lines().map(parse_row)
}

/// Parse a snapshot table into entries, in table order.
pub fn parse_table(content: &str) -> Vec<RankingEntry> {
    rows(content)
        .enumerate()
        .filter_map(|(index, outcome)| match outcome {
            RowOutcome::Entry(entry) => Some(entry),
            RowOutcome::Skip(reason) => {
                trace!("Skipping line {}: {}", index + 1, reason);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rank: u32, points: u32, tag: &str) -> RankingEntry {
        RankingEntry {
            rank,
            points,
            tag: tag.to_string(),
        }
    }

    const SAMPLE: &str = "\
| Rank | Points | Team |
|---|---|---|
| 1 | 1000 | Alpha |
| 2 | 950 | Beta |
| x | 900 | Gamma |
";

    #[test]
    fn test_parse_table_drops_malformed_row() {
        let entries = parse_table(SAMPLE);
        assert_eq!(entries, vec![entry(1, 1000, "Alpha"), entry(2, 950, "Beta")]);
    }

    #[test]
    fn test_parse_table_is_idempotent() {
        assert_eq!(parse_table(SAMPLE), parse_table(SAMPLE));
    }

    #[test]
    fn test_parse_row_outcomes() {
        assert_eq!(parse_row("   "), RowOutcome::Skip(SkipReason::Blank));
        assert_eq!(
            parse_row("| Rank | Points | Team Name | Roster |"),
            RowOutcome::Skip(SkipReason::Header)
        );
        assert_eq!(
            parse_row("|:---:|---:|:--|"),
            RowOutcome::Skip(SkipReason::Separator)
        );
        assert_eq!(
            parse_row("Standings as of March"),
            RowOutcome::Skip(SkipReason::NotTableRow)
        );
        assert_eq!(parse_row("| 1 | 1000 |"), RowOutcome::Skip(SkipReason::TooFewCells));
        assert_eq!(
            parse_row("| 1 | lots | Alpha |"),
            RowOutcome::Skip(SkipReason::InvalidPoints)
        );
        assert_eq!(
            parse_row("| 0 | 10 | Alpha |"),
            RowOutcome::Skip(SkipReason::InvalidRank)
        );
        assert_eq!(
            parse_row("| -3 | 10 | Alpha |"),
            RowOutcome::Skip(SkipReason::InvalidRank)
        );
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let outcome = parse_row("|  7 | 1523 | The MongolZ | bLitz, Techno, Senzu |");
        assert_eq!(outcome, RowOutcome::Entry(entry(7, 1523, "The MongolZ")));
    }

    #[test]
    fn test_empty_cells_are_discarded() {
        // The empty points cell shifts the tag into the points column.
        assert_eq!(
            parse_row("| 4 |  | Alpha | x |"),
            RowOutcome::Skip(SkipReason::InvalidPoints)
        );
    }

    #[test]
    fn test_prose_around_table_is_ignored() {
        let content = "\
# Europe Standings

Some commentary about the season.

| Rank | Points | Team |
| --- | --- | --- |
| 1 | 2010 | Vitality |
| 2 | 1890 | MOUZ |

_Generated automatically._
";
        let entries = parse_table(content);
        assert_eq!(entries, vec![entry(1, 2010, "Vitality"), entry(2, 1890, "MOUZ")]);
    }

    #[test]
    fn test_invalid_rows_keep_relative_order() {
        let content = "\
| 1 | 100 | A |
| two | 90 | B |
| 3 | 80 | C |
| 4 | n/a | D |
| 5 | 60 | E |
";
        let tags: Vec<String> = parse_table(content).into_iter().map(|e| e.tag).collect();
        assert_eq!(tags, vec!["A", "C", "E"]);
    }

    #[test]
    fn test_header_only_table_is_empty() {
        assert!(parse_table("| Rank | Points | Team |\n|---|---|---|\n").is_empty());
        assert!(parse_table("").is_empty());
    }

    #[test]
    fn test_source_order_is_not_resorted() {
        let content = "| 2 | 950 | Beta |\n| 1 | 1000 | Alpha |\n";
        let entries = parse_table(content);
        assert_eq!(entries[0].tag, "Beta");
        assert_eq!(entries[1].tag, "Alpha");
    }
}
