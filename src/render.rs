use crate::batch::ServerStatus;

/// At most this many roster names appear in a row.
pub const MAX_LISTED_PLAYERS: usize = 6;

/// Columns for one server's row. An info failure collapses the row to the
/// address and the error text; a players failure replaces only the roster
/// column.
pub fn status_row(addr: &str, status: &ServerStatus) -> Vec<String> {
    let mut columns = vec![format!("steam://connect/{addr}")];

    let info = match &status.info {
        Ok(info) => info,
        Err(err) => {
            columns.push(err.to_string());
            return columns;
        }
    };

    columns.push(info.name.clone());
    columns.push(info.map.clone());
    columns.push(format!("{}/{}", info.human_players(), info.max_players));

    let roster = match &status.players {
        Ok(players) => players
            .iter()
            .take(MAX_LISTED_PLAYERS)
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(","),
        Err(err) => err.to_string(),
    };
    columns.push(roster);

    columns
}

/// Pad each column to its widest cell, single-space separated, one row per
/// line. Rows may have different lengths; the last cell of a row is never
/// padded.
pub fn render_table(rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = Vec::new();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i >= widths.len() {
                widths.push(0);
            }
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i + 1 == row.len() {
                out.push_str(cell);
            } else {
                out.push_str(cell);
                for _ in cell.chars().count()..widths[i] + 1 {
                    out.push(' ');
                }
            }
        }
        out.push('\n');
    }
    out
}
