//! Plain-text rendering of the matrix for terminals and logs.

use crate::matrix_layout::{Grid, MatrixCell};
use crate::types::Status;

const SLOT_WIDTH: usize = 5;
const LABEL_WIDTH: usize = 9;

pub fn marker(cell: &MatrixCell) -> char {
    if cell.superseded {
        return '□';
    }
    match cell.status {
        Status::Mastered => '■',
        Status::Emergent => '▪',
        Status::NotUsed => '·',
    }
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

/// One line per level, cells placed in the same slots as the drawn grid.
pub fn render_matrix(grid: &Grid) -> String {
    let g = &grid.geometry;
    // (slot count, printed width) per section
    let slots: Vec<(usize, usize)> = grid
        .sections
        .iter()
        .map(|s| {
            let n = (s.width / g.cell_width).round() as usize;
            (n, (n * SLOT_WIDTH).max(s.name.chars().count() + 1))
        })
        .collect();

    let mut out = String::new();
    out.push_str(&pad("", LABEL_WIDTH));
    for (section, &(_, width)) in grid.sections.iter().zip(&slots) {
        out.push_str("| ");
        out.push_str(&pad(&section.name, width));
    }
    out.push('\n');

    for row in &grid.levels {
        out.push_str(&pad(&row.name, LABEL_WIDTH));
        for (section, &(n, width)) in grid.sections.iter().zip(&slots) {
            let mut line = vec![pad("", SLOT_WIDTH); n];
            for cell in grid
                .cells_at(row.level)
                .filter(|c| c.section == section.id)
            {
                let slot = ((cell.rect.x - section.x) / g.cell_width).round() as usize;
                if let Some(entry) = line.get_mut(slot) {
                    *entry = pad(&format!("{}{}", marker(cell), cell.column), SLOT_WIDTH);
                }
            }
            out.push_str("| ");
            out.push_str(&pad(&line.concat(), width));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "■ {}  ▪ {}  · {}",
        Status::Mastered.label(),
        Status::Emergent.label(),
        Status::NotUsed.label()
    ));
    if grid.has_superseded() {
        out.push_str("  □ Superado");
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::matrix_layout::build_matrix;
    use crate::response_key::ResponseKey;
    use crate::responses::Responses;
    use crate::types::QuestionId;

    #[test]
    fn test_empty_matrix() {
        let grid = build_matrix(None, &Catalog::standard());
        let text = render_matrix(&grid);
        let lines: Vec<&str> = text.lines().collect();
        // header, seven levels, legend
        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("Recusar"));
        assert!(lines[0].contains("Informação"));
        assert!(lines[1].starts_with("Nível 1"));
        assert!(lines[1].contains("·A1"));
        assert!(lines[7].contains("·C17"));
        assert!(lines[1..8].iter().all(|l| !l.contains('■')));
        assert!(!lines[8].contains("Superado"));
    }

    #[test]
    fn test_markers() {
        let mut responses = Responses::new();
        let b1 = QuestionId::parse("B.1").unwrap();
        responses.record(b1, ResponseKey::parse("x:y"), Status::Emergent);
        let c3 = QuestionId::parse("C.3").unwrap();
        responses.record(c3, ResponseKey::parse("Nível IV:x:y"), Status::Mastered);

        let text = render_matrix(&build_matrix(Some(&responses), &Catalog::standard()));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[2].contains("▪B1"));
        assert!(lines[4].contains("■C3"));
        assert!(lines[5].contains("·C3"));
    }

    #[test]
    fn test_superseded_marker_and_legend() {
        let mut responses = Responses::new();
        for id in ["A.1", "A.2", "A.3"] {
            responses.record(
                QuestionId::parse(id).unwrap(),
                ResponseKey::parse("x:y"),
                Status::Mastered,
            );
        }
        let text = render_matrix(&build_matrix(Some(&responses), &Catalog::standard()));
        assert!(text.contains("□A1"));
        assert!(text.lines().last().unwrap().contains("□ Superado"));
    }
}
