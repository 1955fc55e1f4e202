//! HTML extraction for the course catalog page.
//!
//! The page carries one department selector table followed by any number of
//! course listing tables:
//!
//! ```text
//! <table>  <select><option value="CODE">Name</option>...</select>  </table>
//! <table>  <tr>header</tr>
//!          <tr><td><a>ID</a></td><td><a>Name</a></td><td>credits</td><td>..</td><td>department</td></tr>
//! </table>
//! ```

use crate::domain::model::{Course, Department, Extraction, Record, RunOutcome};
use crate::utils::error::{CatalogError, Result};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static OPTION: LazyLock<Selector> = LazyLock::new(|| selector("option"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

const COURSE_ID_COLUMN: usize = 0;
const COURSE_NAME_COLUMN: usize = 1;
const CREDITS_COLUMN: usize = 2;
const DEPARTMENT_COLUMN: usize = 4;
const MIN_COURSE_CELLS: usize = DEPARTMENT_COLUMN + 1;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// A parsed catalog page.
pub struct CatalogDocument {
    html: Html,
}

impl CatalogDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    pub fn table_count(&self) -> usize {
        self.html.select(&TABLE).count()
    }

    /// 第一個 table 為系所選單
    fn department_table(&self) -> Result<ElementRef<'_>> {
        self.html
            .select(&TABLE)
            .next()
            .ok_or_else(|| CatalogError::structure("page contains no <table> elements"))
    }

    /// Every table after the department selector, in document order.
    fn course_tables(&self) -> Result<impl Iterator<Item = ElementRef<'_>> + '_> {
        self.department_table()?;
        Ok(self.html.select(&TABLE).skip(1))
    }
}

pub fn parse_department(option: ElementRef<'_>) -> Result<Department> {
    let department_name = element_text(option);
    let code = option.value().attr("value").ok_or_else(|| {
        CatalogError::structure(format!(
            "department option '{}' has no value attribute",
            department_name
        ))
    })?;

    if code.trim().is_empty() {
        return Err(CatalogError::field_format(
            "department_code",
            code,
            format!("empty code for department '{}'", department_name),
        ));
    }

    Ok(Department {
        department_code: code.to_string(),
        department_name,
    })
}

pub fn parse_credits(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(credits) if credits.is_finite() => Ok(credits),
        Ok(_) => Err(CatalogError::field_format(
            "credits",
            raw,
            "not a finite number",
        )),
        Err(e) => Err(CatalogError::field_format("credits", raw, e.to_string())),
    }
}

fn anchor_text(cell: ElementRef<'_>, field: &str) -> Result<String> {
    cell.select(&ANCHOR)
        .next()
        .map(element_text)
        .ok_or_else(|| CatalogError::structure(format!("{} cell has no <a> element", field)))
}

pub fn parse_course_row(row: ElementRef<'_>) -> Result<Course> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    if cells.len() < MIN_COURSE_CELLS {
        return Err(CatalogError::structure(format!(
            "course row has {} <td> cells, expected at least {}",
            cells.len(),
            MIN_COURSE_CELLS
        )));
    }

    Ok(Course {
        course_id: anchor_text(cells[COURSE_ID_COLUMN], "course_id")?,
        course_name: anchor_text(cells[COURSE_NAME_COLUMN], "course_name")?,
        credits: parse_credits(&element_text(cells[CREDITS_COLUMN]))?,
        department: element_text(cells[DEPARTMENT_COLUMN]),
    })
}

/// Department records in document order, parsed lazily.
pub fn department_records(
    document: &CatalogDocument,
) -> Result<impl Iterator<Item = Result<Department>> + '_> {
    let table = document.department_table()?;
    Ok(table.select(&OPTION).map(parse_department))
}

/// Course records of every course table in document order, parsed lazily.
/// The first row of each table is a header and is skipped; a table without
/// any row yields a `ParseStructureError` at its position.
pub fn course_records(
    document: &CatalogDocument,
) -> Result<impl Iterator<Item = Result<Course>> + '_> {
    let tables = document.course_tables()?;
    Ok(tables.enumerate().flat_map(|(index, table)| {
        let mut rows = table.select(&ROW);
        let missing_header = match rows.next() {
            Some(_) => None,
            None => Some(Err(CatalogError::structure(format!(
                "course table #{} has no header row",
                index + 1
            )))),
        };
        let rows: Vec<ElementRef<'_>> = rows.collect();
        if missing_header.is_none() && rows.is_empty() {
            tracing::warn!("Course table #{} has no data rows", index + 1);
        }
        missing_header
            .into_iter()
            .chain(rows.into_iter().map(parse_course_row))
    }))
}

pub fn parse_departments(document: &CatalogDocument) -> Result<Vec<Department>> {
    department_records(document)?.collect()
}

pub fn parse_courses(document: &CatalogDocument) -> Result<Vec<Course>> {
    course_records(document)?.collect()
}

/// Walks the page in emission order: departments first, then courses.
///
/// With `stop_after_first_course` the walk ends right after the first course
/// and later rows are never looked at.
pub fn extract_records(document: &CatalogDocument, stop_after_first_course: bool) -> Extraction {
    let mut records = Vec::new();
    let end = walk(document, stop_after_first_course, &mut records);
    Extraction { records, end }
}

fn walk(
    document: &CatalogDocument,
    stop_after_first_course: bool,
    records: &mut Vec<Record>,
) -> Result<RunOutcome> {
    for department in department_records(document)? {
        records.push(department?.into());
    }

    for course in course_records(document)? {
        records.push(course?.into());
        if stop_after_first_course {
            return Ok(RunOutcome::StoppedAfterFirstCourse);
        }
    }

    Ok(RunOutcome::Completed)
}
