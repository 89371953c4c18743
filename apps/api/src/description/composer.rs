//! Flattens a `GeneratedDescription` into the text stored
//! on `JobPosting.description`, and reads that text back.
//!
//! Layout: `"<Label>:\n<body>"` per section, sections joined by one blank line,
//! list items one per line. Order is fixed:
//! Title, Summary, Responsibilities, Requirements, Qualifications, Benefits, Tools.
//! Qualifications and Benefits are omitted when absent or empty.

use thiserror::Error;

use crate::description::schema::GeneratedDescription;

const TITLE: &str = "Title";
const SUMMARY: &str = "Summary";
const RESPONSIBILITIES: &str = "Responsibilities";
const REQUIREMENTS: &str = "Requirements";
const QUALIFICATIONS: &str = "Qualifications";
const BENEFITS: &str = "Benefits";
const TOOLS: &str = "Tools";

const LABELS: [&str; 7] = [
    TITLE,
    SUMMARY,
    RESPONSIBILITIES,
    REQUIREMENTS,
    QUALIFICATIONS,
    BENEFITS,
    TOOLS,
];

#[derive(Debug, Error, PartialEq)]
pub enum ParseDescriptionError {
    #[error("description is missing the '{0}' section")]
    MissingSection(&'static str),

    #[error("description repeats the '{0}' section")]
    DuplicateSection(&'static str),

    #[error("description has text before the first section header")]
    LeadingText,
}

pub fn compose_description(description: &GeneratedDescription) -> String {
    let mut sections: Vec<(&str, String)> = vec![
        (TITLE, description.title.clone()),
        (SUMMARY, description.summary.clone()),
        (RESPONSIBILITIES, description.responsibilities.join("\n")),
        (REQUIREMENTS, description.requirements.join("\n")),
    ];
    if let Some(items) = non_empty(&description.qualifications) {
        sections.push((QUALIFICATIONS, items.join("\n")));
    }
    if let Some(items) = non_empty(&description.benefits) {
        sections.push((BENEFITS, items.join("\n")));
    }
    sections.push((TOOLS, description.tools.join("\n")));

    sections
        .iter()
        .map(|(label, body)| format!("{label}:\n{body}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn non_empty(items: &Option<Vec<String>>) -> Option<&[String]> {
    items.as_deref().filter(|v| !v.is_empty())
}

/// Re-extracts the structured fields from a composed description.
///
/// A known label on its own line starts a section when it opens the text or
/// follows a blank line.
pub fn parse_description(text: &str) -> Result<GeneratedDescription, ParseDescriptionError> {
    let mut sections: Vec<(&'static str, Vec<&str>)> = Vec::new();
    let mut previous_blank = true;

    for line in text.lines() {
        let header = line
            .trim_end()
            .strip_suffix(':')
            .and_then(|label| LABELS.iter().copied().find(|l| *l == label));

        match header {
            Some(label) if previous_blank => {
                if sections.iter().any(|(l, _)| *l == label) {
                    return Err(ParseDescriptionError::DuplicateSection(label));
                }
                sections.push((label, Vec::new()));
            }
            _ => match sections.last_mut() {
                Some((_, lines)) => lines.push(line),
                None if line.trim().is_empty() => {}
                None => return Err(ParseDescriptionError::LeadingText),
            },
        }
        previous_blank = line.trim().is_empty();
    }

    let lines_of = |label: &'static str| sections.iter().find(|(l, _)| *l == label).map(|(_, v)| v);
    let text_of = |label: &'static str| {
        lines_of(label)
            .map(|lines| lines.join("\n").trim().to_string())
            .ok_or(ParseDescriptionError::MissingSection(label))
    };
    let items_of = |label: &'static str| {
        lines_of(label).map(|lines| {
            lines
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
    };
    let required_items =
        |label: &'static str| items_of(label).ok_or(ParseDescriptionError::MissingSection(label));

    Ok(GeneratedDescription {
        title: text_of(TITLE)?,
        summary: text_of(SUMMARY)?,
        responsibilities: required_items(RESPONSIBILITIES)?,
        requirements: required_items(REQUIREMENTS)?,
        qualifications: items_of(QUALIFICATIONS).filter(|v| !v.is_empty()),
        benefits: items_of(BENEFITS).filter(|v| !v.is_empty()),
        tools: required_items(TOOLS)?,
    })
}
