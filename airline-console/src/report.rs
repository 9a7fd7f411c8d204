/// Renders rows as left-aligned columns under a header and a rule.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (column, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(column) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.iter(), &widths));
    let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1) + 1;
    lines.push("-".repeat(rule_width));
    for row in rows {
        lines.push(format_row(row.iter(), &widths));
    }
    lines
}

fn format_row<S: AsRef<str>>(cells: impl Iterator<Item = S>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    format!("|{}", line.trim_end())
}
