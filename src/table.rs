// src/table.rs
//! Client-side table transformation: filter by substring on the name
//! field, highlight the matches, toggle per-column sorting, and paginate
//! in fixed-size pages. Applied as filter -> sort -> paginate over the
//! full in-memory dataset on every render; the server is never consulted.

use crate::types::{Company, JobPosting, User};
use crate::utils;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// A run of text, marked when it matched the search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }
}

/// Split `text` into segments, marking exactly the case-insensitive
/// occurrences of `term`. A blank term yields the text unmarked.
pub fn highlight(text: &str, term: &str) -> Vec<Segment> {
    let term = term.trim();
    if term.is_empty() || text.is_empty() {
        return vec![Segment::plain(text)];
    }

    let needle: Vec<char> = term.to_lowercase().chars().collect();
    let positions: Vec<(usize, char)> = text.char_indices().collect();
    let lowered: Vec<char> = positions
        .iter()
        .map(|(_, c)| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;
    while i + needle.len() <= lowered.len() {
        if lowered[i..i + needle.len()] == needle[..] {
            let match_start = positions[i].0;
            let match_end = positions
                .get(i + needle.len())
                .map(|(byte, _)| *byte)
                .unwrap_or(text.len());

            if match_start > plain_start {
                segments.push(Segment::plain(&text[plain_start..match_start]));
            }
            segments.push(Segment {
                text: text[match_start..match_end].to_string(),
                highlighted: true,
            });

            plain_start = match_end;
            i += needle.len();
        } else {
            i += 1;
        }
    }

    if plain_start < text.len() {
        segments.push(Segment::plain(&text[plain_start..]));
    }

    segments
}

/// Rows whose designated field contains `term`, case-insensitively. A
/// blank term keeps everything.
pub fn filter_rows<'a, T, F>(rows: &'a [T], term: &str, key: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return rows.iter().collect();
    }

    rows.iter()
        .filter(|row| key(row).to_lowercase().contains(&term))
        .collect()
}

/// Case-insensitive text ordering. The stdlib has no locale collation;
/// lowercase comparison is close enough for name columns.
pub fn sort_by_text<T, F>(rows: &mut [&T], direction: SortDirection, key: F)
where
    F: Fn(&T) -> &str,
{
    rows.sort_by(|a, b| {
        let ordering = key(a).to_lowercase().cmp(&key(b).to_lowercase());
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Best-effort integer reading for ID-like columns; non-numeric text
/// sorts as zero.
pub fn parse_or_zero(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

pub fn sort_by_numeric<T, F>(rows: &mut [&T], direction: SortDirection, key: F)
where
    F: Fn(&T) -> String,
{
    rows.sort_by(|a, b| {
        let ordering = parse_or_zero(&key(a)).cmp(&parse_or_zero(&key(b)));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// One page of the filtered+sorted rows, with the range-boundary state
/// that drives the disabled prev/next controls.
#[derive(Debug)]
pub struct Page<'a, T> {
    pub rows: Vec<&'a T>,
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Slice out 1-based page `page`. Out-of-range pages clamp to the nearest
/// valid page; a page never holds more than `page_size` rows.
pub fn paginate<T>(rows: Vec<&T>, page: usize, page_size: usize) -> Page<'_, T> {
    let total_pages = rows.len().div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(rows.len());
    let rows = if start < rows.len() {
        rows[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        rows,
        page,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}

/// Row schema a page declares for its table: the searchable name field,
/// the ID-like numeric field, and the rendered cells.
pub trait TableRow {
    fn headers() -> &'static [&'static str]
    where
        Self: Sized;

    fn key_text(&self) -> &str;
    fn key_numeric(&self) -> String;
    fn cells(&self) -> Vec<String>;
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => "-".to_string(),
    }
}

impl TableRow for User {
    fn headers() -> &'static [&'static str] {
        &["Nama", "Email", "Peran", "NISN", "Jenis Kelamin", "Telepon", "Tanggal Lahir", "Dibuat"]
    }

    fn key_text(&self) -> &str {
        &self.nama
    }

    fn key_numeric(&self) -> String {
        self.nisn.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.nama.clone(),
            self.email.clone(),
            self.peran.to_string(),
            self.nisn.clone(),
            or_dash(self.jenis_kelamin.as_deref()),
            or_dash(self.telepon.as_deref()),
            or_dash(self.tanggal_lahir.as_deref().map(utils::normalize_date).as_deref()),
            utils::format_date(&self.dibuat_pada),
        ]
    }
}

impl TableRow for Company {
    fn headers() -> &'static [&'static str] {
        &["Nama", "Alamat", "Email", "Telepon"]
    }

    fn key_text(&self) -> &str {
        &self.nama
    }

    fn key_numeric(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.nama.clone(),
            self.alamat.clone(),
            self.email.clone(),
            or_dash(self.telepon.as_deref()),
        ]
    }
}

impl TableRow for JobPosting {
    fn headers() -> &'static [&'static str] {
        &["Nama", "Jenis", "Gaji", "Perusahaan", "Dibuat", "Expired"]
    }

    fn key_text(&self) -> &str {
        &self.nama
    }

    fn key_numeric(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.nama.clone(),
            self.jenis_pekerjaan.label(),
            match self.salary.as_deref() {
                Some(salary) if !salary.is_empty() => utils::format_salary(salary),
                _ => "-".to_string(),
            },
            or_dash(self.perusahaan.as_ref().map(|company| company.nama.as_str())),
            utils::format_date(&self.dibuat_pada),
            or_dash(self.expired_at.map(|dt| utils::format_date(&dt)).as_deref()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        nama: String,
        nisn: String,
    }

    fn row(nama: &str, nisn: &str) -> Row {
        Row {
            nama: nama.to_string(),
            nisn: nisn.to_string(),
        }
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.nama.clone()).collect()
    }

    #[test]
    fn filter_keeps_exactly_the_matching_subset() {
        let rows = vec![
            row("Software Engineer", "1"),
            row("Designer", "2"),
            row("ENGINEERING Lead", "3"),
        ];

        let filtered = filter_rows(&rows, "engineer", |r| &r.nama);
        assert_eq!(names(&filtered), vec!["Software Engineer", "ENGINEERING Lead"]);

        let all = filter_rows(&rows, "   ", |r| &r.nama);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn search_scenario_highlights_the_match() {
        let rows = vec![row("Software Engineer", "1"), row("Designer", "2")];

        let filtered = filter_rows(&rows, "engineer", |r| &r.nama);
        assert_eq!(names(&filtered), vec!["Software Engineer"]);

        let segments = highlight(&filtered[0].nama, "engineer");
        assert_eq!(
            segments,
            vec![
                Segment {
                    text: "Software ".to_string(),
                    highlighted: false
                },
                Segment {
                    text: "Engineer".to_string(),
                    highlighted: true
                },
            ]
        );
    }

    #[test]
    fn highlight_marks_every_occurrence() {
        let segments = highlight("abc ABA aba", "aba");
        let marked: Vec<&str> = segments
            .iter()
            .filter(|s| s.highlighted)
            .map(|s| s.text.as_str())
            .collect();
        assert!(marked.contains(&"ABA"));
        assert!(marked.contains(&"aba"));
    }

    #[test]
    fn blank_term_yields_single_plain_segment() {
        let segments = highlight("Designer", "");
        assert_eq!(segments, vec![Segment::plain("Designer")]);
    }

    #[test]
    fn toggling_text_sort_twice_restores_order() {
        let rows = vec![row("Andi", "3"), row("Budi", "1"), row("Citra", "2")];
        let mut view: Vec<&Row> = rows.iter().collect();

        let original = names(&view);
        let mut direction = SortDirection::Asc;

        direction = direction.toggle();
        sort_by_text(&mut view, direction, |r| &r.nama);
        assert_eq!(names(&view), vec!["Citra", "Budi", "Andi"]);

        direction = direction.toggle();
        sort_by_text(&mut view, direction, |r| &r.nama);
        assert_eq!(names(&view), original);
    }

    #[test]
    fn toggling_numeric_sort_twice_restores_order() {
        let rows = vec![row("a", "10"), row("b", "200"), row("c", "3000")];
        let mut view: Vec<&Row> = rows.iter().collect();
        let original = names(&view);

        sort_by_numeric(&mut view, SortDirection::Desc, |r| r.nisn.clone());
        assert_eq!(names(&view), vec!["c", "b", "a"]);

        sort_by_numeric(&mut view, SortDirection::Asc, |r| r.nisn.clone());
        assert_eq!(names(&view), original);
    }

    #[test]
    fn numeric_sort_parses_best_effort_with_zero_fallback() {
        assert_eq!(parse_or_zero("42"), 42);
        assert_eq!(parse_or_zero(" 7 "), 7);
        assert_eq!(parse_or_zero("bukan angka"), 0);

        let rows = vec![row("x", "abc"), row("y", "5")];
        let mut view: Vec<&Row> = rows.iter().collect();
        sort_by_numeric(&mut view, SortDirection::Asc, |r| r.nisn.clone());
        assert_eq!(names(&view), vec!["x", "y"]);
    }

    #[test]
    fn pages_never_exceed_page_size_and_cover_everything_once() {
        let rows: Vec<Row> = (0..23).map(|i| row(&format!("r{i}"), &i.to_string())).collect();
        let view: Vec<&Row> = rows.iter().collect();

        let mut seen = Vec::new();
        let total_pages = paginate(view.clone(), 1, PAGE_SIZE).total_pages;
        assert_eq!(total_pages, 3);

        for page_number in 1..=total_pages {
            let page = paginate(view.clone(), page_number, PAGE_SIZE);
            assert!(page.rows.len() <= PAGE_SIZE);
            seen.extend(names(&page.rows));
        }

        assert_eq!(seen, names(&view));
    }

    #[test]
    fn page_controls_disable_at_range_boundaries() {
        let rows: Vec<Row> = (0..23).map(|i| row(&format!("r{i}"), &i.to_string())).collect();
        let view: Vec<&Row> = rows.iter().collect();

        let first = paginate(view.clone(), 1, PAGE_SIZE);
        assert!(!first.has_prev);
        assert!(first.has_next);

        let last = paginate(view.clone(), 3, PAGE_SIZE);
        assert!(last.has_prev);
        assert!(!last.has_next);
        assert_eq!(last.rows.len(), 3);
    }

    #[test]
    fn out_of_range_page_clamps() {
        let rows: Vec<Row> = (0..5).map(|i| row(&format!("r{i}"), &i.to_string())).collect();
        let view: Vec<&Row> = rows.iter().collect();

        let page = paginate(view.clone(), 99, PAGE_SIZE);
        assert_eq!(page.page, 1);
        assert_eq!(page.rows.len(), 5);

        let empty = paginate(Vec::<&Row>::new(), 1, PAGE_SIZE);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_prev);
        assert!(!empty.has_next);
    }
}
