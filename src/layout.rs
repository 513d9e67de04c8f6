use crate::model::IconSettings;

pub const COMPACT_MAX_WIDTH: f32 = 640.0;
pub const MEDIUM_MAX_WIDTH: f32 = 1024.0;
pub const COMPACT_COLUMNS: u32 = 4;
pub const MEDIUM_COLUMNS: u32 = 8;
pub const MIN_WIDE_COLUMNS: u32 = 8;
pub const MAX_WIDE_COLUMNS: u32 = 24;
/// Horizontal gutter taken off the viewport before wide columns are counted.
pub const WIDE_PADDING: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    Compact,
    Medium,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub class: ViewportClass,
    pub columns: u32,
}

pub fn classify(width: f32, settings: &IconSettings) -> GridLayout {
    if !width.is_finite() || width <= COMPACT_MAX_WIDTH {
        return GridLayout {
            class: ViewportClass::Compact,
            columns: COMPACT_COLUMNS,
        };
    }
    if width <= MEDIUM_MAX_WIDTH {
        return GridLayout {
            class: ViewportClass::Medium,
            columns: MEDIUM_COLUMNS,
        };
    }
    GridLayout {
        class: ViewportClass::Wide,
        columns: wide_columns(width, settings),
    }
}

fn wide_columns(width: f32, settings: &IconSettings) -> u32 {
    let cell = settings.icon_size + settings.icon_spacing;
    let usable = (width - WIDE_PADDING).min(settings.max_content_width);
    if !cell.is_finite() || cell <= 0.0 || !usable.is_finite() || usable <= 0.0 {
        return MIN_WIDE_COLUMNS;
    }
    // `as` saturates, so huge ratios land on the upper clamp.
    let fit = (usable / cell).floor() as u32;
    fit.clamp(MIN_WIDE_COLUMNS, MAX_WIDE_COLUMNS)
}

/// The tile sizes a user can pick from the resize menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeToken {
    S1x1,
    S1x2,
    S2x1,
    S2x2,
    S2x4,
    S4x1,
    S4x2,
    S4x4,
}

impl SizeToken {
    pub const ALL: [SizeToken; 8] = [
        SizeToken::S1x1,
        SizeToken::S1x2,
        SizeToken::S2x1,
        SizeToken::S2x2,
        SizeToken::S2x4,
        SizeToken::S4x1,
        SizeToken::S4x2,
        SizeToken::S4x4,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == token.trim())
    }

    /// Unknown or malformed tokens render as a single cell.
    pub fn parse(token: &str) -> Self {
        Self::from_token(token).unwrap_or(SizeToken::S1x1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeToken::S1x1 => "1x1",
            SizeToken::S1x2 => "1x2",
            SizeToken::S2x1 => "2x1",
            SizeToken::S2x2 => "2x2",
            SizeToken::S2x4 => "2x4",
            SizeToken::S4x1 => "4x1",
            SizeToken::S4x2 => "4x2",
            SizeToken::S4x4 => "4x4",
        }
    }

    /// `(columns, rows)` before any clamping.
    pub fn dims(self) -> (u32, u32) {
        match self {
            SizeToken::S1x1 => (1, 1),
            SizeToken::S1x2 => (1, 2),
            SizeToken::S2x1 => (2, 1),
            SizeToken::S2x2 => (2, 2),
            SizeToken::S2x4 => (2, 4),
            SizeToken::S4x1 => (4, 1),
            SizeToken::S4x2 => (4, 2),
            SizeToken::S4x4 => (4, 4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub cols: u32,
    pub rows: u32,
}

/// Only the column span is clamped; a tall tile just makes the grid longer.
pub fn resolve_span(token: &str, columns: u32) -> Span {
    let (cols, rows) = SizeToken::parse(token).dims();
    Span {
        cols: cols.min(columns.max(1)),
        rows,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub col: u32,
    pub row: u32,
    pub span: Span,
}

/// Places spans in order, each at the first free cell scanning row by row.
pub fn place(spans: &[Span], columns: u32) -> Vec<Placement> {
    let columns = columns.max(1) as usize;
    let mut occupied: Vec<Vec<bool>> = Vec::new();
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let width = (span.cols as usize).clamp(1, columns);
        let height = span.rows.max(1) as usize;
        let mut row = 0usize;
        let origin = loop {
            let found = (0..=columns - width)
                .find(|&col| fits(&occupied, row, col, width, height));
            if let Some(col) = found {
                break (col, row);
            }
            row += 1;
        };

        let (col, row) = origin;
        while occupied.len() < row + height {
            occupied.push(vec![false; columns]);
        }
        for cells in occupied.iter_mut().skip(row).take(height) {
            for cell in cells.iter_mut().skip(col).take(width) {
                *cell = true;
            }
        }
        out.push(Placement {
            col: col as u32,
            row: row as u32,
            span: Span {
                cols: width as u32,
                rows: height as u32,
            },
        });
    }
    out
}

fn fits(occupied: &[Vec<bool>], row: usize, col: usize, width: usize, height: usize) -> bool {
    (row..row + height).all(|r| match occupied.get(r) {
        Some(cells) => cells[col..col + width].iter().all(|taken| !taken),
        None => true,
    })
}

/// Number of grid rows the placements cover.
pub fn row_count(placements: &[Placement]) -> u32 {
    placements
        .iter()
        .map(|p| p.row + p.span.rows)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(icon: f32, spacing: f32, max_width: f32) -> IconSettings {
        IconSettings {
            icon_size: icon,
            icon_spacing: spacing,
            max_content_width: max_width,
            ..IconSettings::default()
        }
    }

    #[test]
    fn compact_and_medium_ignore_icon_metrics() {
        let tiny = metrics(10.0, 0.0, 5000.0);
        assert_eq!(classify(300.0, &tiny).columns, 4);
        assert_eq!(classify(640.0, &tiny).class, ViewportClass::Compact);
        assert_eq!(classify(641.0, &tiny).columns, 8);
        assert_eq!(classify(1024.0, &tiny).class, ViewportClass::Medium);
    }

    #[test]
    fn wide_columns_use_content_width_and_cell_size() {
        let layout = classify(2000.0, &metrics(60.0, 27.0, 1388.0));
        assert_eq!(layout.class, ViewportClass::Wide);
        // 1388 / 87 = 15.95
        assert_eq!(layout.columns, 15);
    }

    #[test]
    fn wide_columns_are_clamped() {
        assert_eq!(classify(1100.0, &metrics(200.0, 40.0, 1388.0)).columns, 8);
        assert_eq!(classify(4000.0, &metrics(20.0, 4.0, 4000.0)).columns, 24);
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        let settings = IconSettings::default();
        assert_eq!(classify(0.0, &settings).columns, 4);
        assert_eq!(classify(-50.0, &settings).columns, 4);
        assert_eq!(classify(f32::NAN, &settings).columns, 4);
        assert_eq!(classify(1500.0, &metrics(0.0, 0.0, 1388.0)).columns, 8);
        assert_eq!(classify(1500.0, &metrics(-60.0, 10.0, 1388.0)).columns, 8);
        assert_eq!(classify(1500.0, &metrics(60.0, 27.0, -1.0)).columns, 8);
    }

    #[test]
    fn span_clamps_columns_only() {
        assert_eq!(resolve_span("4x2", 4), Span { cols: 4, rows: 2 });
        assert_eq!(resolve_span("4x2", 2), Span { cols: 2, rows: 2 });
        assert_eq!(resolve_span("2x4", 1), Span { cols: 1, rows: 4 });
    }

    #[test]
    fn unknown_tokens_fall_back_to_single_cell() {
        assert_eq!(resolve_span("3x3", 8), Span { cols: 1, rows: 1 });
        assert_eq!(resolve_span("wide", 8), Span { cols: 1, rows: 1 });
        assert_eq!(resolve_span("", 8), Span { cols: 1, rows: 1 });
        assert_eq!(SizeToken::from_token(" 2x2 "), Some(SizeToken::S2x2));
    }

    #[test]
    fn placement_fills_holes_first_fit() {
        let spans = [
            Span { cols: 2, rows: 2 },
            Span { cols: 1, rows: 1 },
            Span { cols: 2, rows: 1 },
            Span { cols: 1, rows: 1 },
        ];
        let placed = place(&spans, 4);
        let origins: Vec<(u32, u32)> = placed.iter().map(|p| (p.col, p.row)).collect();
        assert_eq!(origins, vec![(0, 0), (2, 0), (2, 1), (3, 0)]);
        assert_eq!(row_count(&placed), 2);
    }

    #[test]
    fn placement_never_overlaps_or_overflows() {
        let spans: Vec<Span> = ["4x4", "1x1", "2x1", "4x1", "1x2", "2x2", "2x4", "1x1"]
            .iter()
            .map(|t| resolve_span(t, 4))
            .collect();
        let placed = place(&spans, 4);
        let rows = row_count(&placed) as usize;
        let mut grid = vec![vec![0u8; 4]; rows];
        for p in &placed {
            assert!(p.col + p.span.cols <= 4);
            for r in p.row..p.row + p.span.rows {
                for c in p.col..p.col + p.span.cols {
                    grid[r as usize][c as usize] += 1;
                }
            }
        }
        assert!(grid.iter().flatten().all(|&n| n <= 1));
    }
}
