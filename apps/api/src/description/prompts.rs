//! Prompt Builder for job description generation.

use crate::models::company::Company;
use crate::models::job::JobPosting;

/// Placeholder for company/job fields that were never filled in.
const NOT_SPECIFIED: &str = "Not specified";

/// Builds the user prompt for one job description.
///
/// Pure: identical inputs give byte-identical output. Tools keep caller order
/// and duplicates are not removed.
pub fn build_description_prompt(
    job: &JobPosting,
    company: &Company,
    required_tools: &[String],
) -> String {
    let industry = company.industry.as_deref().unwrap_or(NOT_SPECIFIED);
    let employment_type = job
        .employment_type
        .map(|e| e.as_str())
        .unwrap_or(NOT_SPECIFIED);
    let tools = if required_tools.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        required_tools.join(", ")
    };

    format!(
        "Generate a structured job description for the following AI role:

Job Title: {title}
Company: {company}
Industry: {industry}
Location: {location}
Employment Type: {employment_type}
Required Tools: {tools}

Please include the following sections in your response:
- Title
- Summary
- Responsibilities
- Requirements
- Qualifications
- Benefits
- Tools",
        title = job.title,
        company = company.name,
        location = job.location_type,
    )
}
