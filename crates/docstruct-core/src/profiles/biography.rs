//! Biography profile: personal details, career, education, certifications.
//!
//! The rule set reproduces, from the sample biography text, the same 37 rows
//! that the structured sample response flattens to.

use crate::error::Result;
use crate::extract::{RuleDefinition, RuleSet, StructuredRecord, Transform};
use crate::flatten::{CommentTable, LabelTable};

/// Rows produced by the profile for a complete biography.
pub const EXPECTED_ROWS: usize = 37;

/// Sample biography document, as extracted from the source PDF.
pub const SAMPLE_TEXT: &str = include_str!("../../data/sample_biography.txt");

const SAMPLE_RESPONSE: &str = include_str!("../../data/sample_response.json");

// Long-form English date, e.g. "March 15, 1989"
const LONG_DATE: &str = r"\w+\s+\d{1,2},\s+\d{4}";

const BIRTH_PLACE_COMMENT: &str =
    "Born and raised in the Pink City of India, his birthplace provides valuable regional profiling context";

const CERTIFICATION_CLOSING: &str =
    "complement his practical experience and demonstrate his expertise across multiple technology platforms.";

/// The structured response an extraction service returns for [`SAMPLE_TEXT`].
pub fn sample_response() -> Result<StructuredRecord> {
    StructuredRecord::from_json(SAMPLE_RESPONSE)
}

/// Compiled biography rule set.
pub fn rule_set() -> Result<RuleSet> {
    RuleSet::from_definitions(rules())
}

/// Biography rule definitions, in output order.
pub fn rules() -> Vec<RuleDefinition> {
    let name = r"^(\w+)\s+(\w+)\s+was\s+born";
    let birth_place = format!(r"born\s+on\s+{LONG_DATE},\s+in\s+([\w ]+?),\s+([\w ]+?),");
    let first_role = format!(
        r"professional\s+journey\s+began\s+on\s+({LONG_DATE}),.*?\s+as\s+an?\s+([\w ]+?)\s+with\s+an\s+annual\s+salary\s+of\s+([\d,]+)\s+([A-Z]{{3}})"
    );
    let current_role = format!(
        r"current\s+role\s+at\s+([\w ]+?)\s+beginning\s+on\s+({LONG_DATE}),.*?\s+as\s+an?\s+([\w ]+?)\s+earning\s+([\d,]+)\s+([A-Z]{{3}})"
    );
    let previous_role = format!(r"worked\s+at\s+([\w ]+?)\s+from\s+({LONG_DATE}),\s+to\s+(\d{{4}})");

    vec![
        // Personal information
        RuleDefinition::new("first_name", name).with_label("First Name"),
        RuleDefinition::new("last_name", name).with_group(2).with_label("Last Name"),
        RuleDefinition::new("date_of_birth", format!(r"born\s+on\s+({LONG_DATE})"))
            .with_transform(Transform::date())
            .with_default("")
            .with_label("Date of Birth"),
        RuleDefinition::new("birth_city", birth_place.clone())
            .with_label("Birth City")
            .with_comment(BIRTH_PLACE_COMMENT),
        RuleDefinition::new("birth_state", birth_place)
            .with_group(2)
            .with_label("Birth State")
            .with_comment(BIRTH_PLACE_COMMENT),
        RuleDefinition::new("age", r"making\s+\w+\s+(\d+)\s+years\s+old\s+as\s+of\s+(\d{4})")
            .with_transform(Transform::template("${1} years"))
            .with_label("Age")
            .with_comment(
                "As on year ${2}. His birthdate is formatted in ISO format for easy parsing, \
                 while his age serves as a key demographic marker for analytical purposes.",
            ),
        RuleDefinition::new("blood_group", r"\b((?:AB|A|B|O)[+-])\s+blood\s+group")
            .with_label("Blood Group")
            .with_comment("Emergency contact purposes."),
        RuleDefinition::new("nationality", r"As\s+an?\s+(\w+)\s+national")
            .with_label("Nationality")
            .with_comment(
                "Citizenship status is important for understanding his work authorization and \
                 visa requirements across different employment opportunities.",
            ),
        // First professional role
        RuleDefinition::new("first_role_joining_date", first_role.clone())
            .with_transform(Transform::date())
            .with_default("")
            .with_label("Joining Date of first professional role"),
        RuleDefinition::new("first_role_designation", first_role.clone())
            .with_group(2)
            .with_label("Designation of first professional role"),
        RuleDefinition::new("first_role_salary", first_role.clone())
            .with_group(3)
            .with_transform(Transform::Digits)
            .with_default("")
            .with_label("Salary of first professional role"),
        RuleDefinition::new("first_role_currency", first_role)
            .with_group(4)
            .with_label("Salary currency of first professional role"),
        // Current role
        RuleDefinition::new("current_organization", current_role.clone()).with_label("Current Organization"),
        RuleDefinition::new("current_joining_date", current_role.clone())
            .with_group(2)
            .with_transform(Transform::date())
            .with_default("")
            .with_label("Current Joining Date"),
        RuleDefinition::new("current_designation", current_role.clone())
            .with_group(3)
            .with_label("Current Designation"),
        RuleDefinition::new("current_salary", current_role.clone())
            .with_group(4)
            .with_transform(Transform::Digits)
            .with_default("")
            .with_label("Current Salary")
            .with_comment(
                "This salary progression from his starting compensation to his current peak salary \
                 of ${4} ${5} represents a substantial eight-fold increase over his twelve-year career span.",
            ),
        RuleDefinition::new("current_salary_currency", current_role)
            .with_group(5)
            .with_label("Current Salary Currency"),
        // Previous role
        RuleDefinition::new("previous_organization", previous_role.clone()).with_label("Previous Organization"),
        RuleDefinition::new("previous_joining_date", previous_role.clone())
            .with_group(2)
            .with_transform(Transform::date())
            .with_default("")
            .with_label("Previous Joining Date"),
        RuleDefinition::new("previous_end_year", previous_role)
            .with_group(3)
            .with_label("Previous end year"),
        RuleDefinition::new(
            "previous_starting_designation",
            format!(
                r"worked\s+at\s+[\w ]+?\s+from\s+{LONG_DATE},\s+to\s+\d{{4}},\s+starting\s+as\s+an?\s+([\w ]+?)\s+and\s+earning\s+a\s+promotion\s+in\s+(\d{{4}})"
            ),
        )
        .with_label("Previous Starting Designation")
        .with_comment("Promoted in ${2}"),
        // School
        RuleDefinition::new("high_school", r"high\s+school\s+education\s+at\s+(.+?),\s+where").with_label("High School"),
        RuleDefinition::new("twelfth_passout_year", r"12th\s+standard\s+in\s+(\d{4})")
            .with_label("12th standard pass out year")
            .with_comment(
                "His core subjects included Mathematics, Physics, Chemistry, and Computer Science, \
                 demonstrating his early aptitude for technical disciplines.",
            ),
        RuleDefinition::new("twelfth_board_score", r"outstanding\s+(\d+(?:\.\d+)?)%\s+overall\s+score")
            .with_transform(Transform::PercentFraction)
            .with_default("")
            .with_label("12th overall board score")
            .with_comment("Outstanding achievement"),
        // Undergraduate
        RuleDefinition::new("undergraduate_degree", r"(B\.Tech)\s+in\s+(\w+\s+\w+)")
            .with_transform(Transform::template("${1} (${2})"))
            .with_label("Undergraduate degree"),
        RuleDefinition::new("undergraduate_college", r"prestigious\s+([\w ]+?),\s+graduating")
            .with_label("Undergraduate college"),
        RuleDefinition::new(
            "undergraduate_year",
            r"graduating\s+with\s+honors\s+in\s+(\d{4}).*?ranking\s+(\w+)\s+among\s+(\d+)\s+students\s+in\s+his\s+class",
        )
        .with_label("Undergraduate year")
        .with_comment("Graduating with honors and ranking ${2} among ${3} students in his class."),
        RuleDefinition::new("undergraduate_cgpa", r"CGPA\s+of\s+(\d+(?:\.\d+)?)\s+on\s+a\s+(\d+)-point\s+scale")
            .with_transform(Transform::Number)
            .with_default("")
            .with_label("Undergraduate CGPA")
            .with_comment("On a ${2}-point scale"),
        // Postgraduate
        RuleDefinition::new("graduation_degree", r"(M\.Tech)\s+in\s+(\w+\s+\w+)")
            .with_transform(Transform::template("${1} (${2})"))
            .with_label("Graduation degree"),
        RuleDefinition::new(
            "graduation_college",
            r"academic\s+excellence\s+continued\s+at\s+([\w ]+?),\s+where\s+he\s+earned",
        )
        .with_label("Graduation college")
        .with_comment("Continued academic excellence at ${1}"),
        RuleDefinition::new("graduation_year", r"M\.Tech\s+in\s+[\w ]+?\s+in\s+(\d{4})").with_label("Graduation year"),
        RuleDefinition::new(
            "graduation_cgpa",
            r"achieving\s+an\s+exceptional\s+CGPA\s+of\s+(\d+(?:\.\d+)?)\s+and\s+scoring\s+(\d+)\s+out\s+of\s+(\d+)\s+for\s+his\s+final\s+year\s+thesis\s+project",
        )
        .with_transform(Transform::Number)
        .with_default("")
        .with_label("Graduation CGPA")
        .with_comment("Considered exceptional and scoring ${2} out of ${3} for his final year thesis project."),
        // Certifications
        RuleDefinition::new(
            "certification_1",
            r"\w+'s\s+commitment\s+to\s+continuous\s+learning.*?He\s+passed\s+the\s+([\w ]+?)\s+exam\s+in\s+\d{4}\s+with\s+a\s+score\s+of\s+\d+\s+out\s+of\s+\d+",
        )
        .with_label("Certification 1")
        .with_comment("${0}"),
        RuleDefinition::new(
            "certification_2",
            r"followed\s+by\s+the\s+([\w ]+?)\s+certification\s+in\s+(\d{4})\s+with\s+(\d+)\s+points",
        )
        .with_label("Certification 2")
        .with_comment("Pursued in the year ${2} with ${3} points."),
        RuleDefinition::new(
            "certification_3",
            r#"His\s+([\w ]+?\s+certification),\s+obtained\s+in\s+(\d{4}),\s+was\s+achieved\s+with\s+an?\s+"([^"]+)"\s+rating\s+from\s+(\w+)"#,
        )
        .with_label("Certification 3")
        .with_comment(format!(
            "Obtained in ${{2}}, was achieved with an \"${{3}}\" rating from ${{4}}, These certifications {CERTIFICATION_CLOSING}"
        )),
        RuleDefinition::new(
            "certification_4",
            r"\bhis\s+([\w ]+?\s+certification)\s+earned\s+him\s+an\s+outstanding\s+(\d+)%",
        )
        .with_label("Certification 4")
        .with_comment(format!("Earned him an outstanding ${{2}}% score. Certifications {CERTIFICATION_CLOSING}")),
        // Summary
        RuleDefinition::new("technical_proficiency", r"(?s)In\s+terms\s+of\s+technical\s+proficiency.*")
            .with_group(0)
            .with_transform(Transform::constant(""))
            .with_label("Technical Proficiency")
            .with_comment("${0}"),
    ]
}

/// Labels for the structured response, keyed by qualified field key.
pub fn labels() -> LabelTable {
    LabelTable::new()
        .with("personal_info.first_name", "First Name")
        .with("personal_info.last_name", "Last Name")
        .with("personal_info.date_of_birth", "Date of Birth")
        .with("personal_info.birth_city", "Birth City")
        .with("personal_info.birth_state", "Birth State")
        .with("personal_info.age", "Age")
        .with("personal_info.blood_group", "Blood Group")
        .with("personal_info.nationality", "Nationality")
        .with("first_role.joining_date", "Joining Date of first professional role")
        .with("first_role.designation", "Designation of first professional role")
        .with("first_role.salary", "Salary of first professional role")
        .with("first_role.currency", "Salary currency of first professional role")
        .with("current_role.organization", "Current Organization")
        .with("current_role.joining_date", "Current Joining Date")
        .with("current_role.designation", "Current Designation")
        .with("current_role.salary", "Current Salary")
        .with("current_role.currency", "Current Salary Currency")
        .with("previous_role.organization", "Previous Organization")
        .with("previous_role.joining_date", "Previous Joining Date")
        .with("previous_role.end_year", "Previous end year")
        .with("previous_role.starting_designation", "Previous Starting Designation")
        .with("education.high_school", "High School")
        .with("education.12th_passout_year", "12th standard pass out year")
        .with("education.12th_board_score", "12th overall board score")
        .with("undergraduate.degree", "Undergraduate degree")
        .with("undergraduate.college", "Undergraduate college")
        .with("undergraduate.year", "Undergraduate year")
        .with("undergraduate.cgpa", "Undergraduate CGPA")
        .with("graduation.degree", "Graduation degree")
        .with("graduation.college", "Graduation college")
        .with("graduation.year", "Graduation year")
        .with("graduation.cgpa", "Graduation CGPA")
        .with("certifications", "Certification")
        .with("technical_proficiency", "Technical Proficiency")
}

/// Comments for the structured response.
pub fn comments() -> CommentTable {
    CommentTable::new()
        .with("personal_info.birth_city", BIRTH_PLACE_COMMENT)
        .with("personal_info.birth_state", BIRTH_PLACE_COMMENT)
        .with(
            "personal_info.age",
            "As on year 2024. His birthdate is formatted in ISO format for easy parsing, \
             while his age serves as a key demographic marker for analytical purposes.",
        )
        .with("personal_info.blood_group", "Emergency contact purposes.")
        .with(
            "personal_info.nationality",
            "Citizenship status is important for understanding his work authorization and \
             visa requirements across different employment opportunities.",
        )
        .with(
            "current_role.salary",
            "This salary progression from his starting compensation to his current peak salary \
             of 2,800,000 INR represents a substantial eight-fold increase over his twelve-year career span.",
        )
        .with("previous_role.starting_designation", "Promoted in 2019")
        .with(
            "education.12th_passout_year",
            "His core subjects included Mathematics, Physics, Chemistry, and Computer Science, \
             demonstrating his early aptitude for technical disciplines.",
        )
        .with("education.12th_board_score", "Outstanding achievement")
        .with(
            "undergraduate.year",
            "Graduating with honors and ranking 15th among 120 students in his class.",
        )
        .with("undergraduate.cgpa", "On a 10-point scale")
        .with("graduation.college", "Continued academic excellence at IIT Bombay")
        .with(
            "graduation.cgpa",
            "Considered exceptional and scoring 95 out of 100 for his final year thesis project.",
        )
        .with(
            "certifications.1",
            "Vijay's commitment to continuous learning is evident through his impressive certification scores. \
             He passed the AWS Solutions Architect exam in 2019 with a score of 920 out of 1000",
        )
        .with("certifications.2", "Pursued in the year 2020 with 875 points.")
        .with(
            "certifications.3",
            format!(
                "Obtained in 2021, was achieved with an \"Above Target\" rating from PMI, These certifications {CERTIFICATION_CLOSING}"
            ),
        )
        .with(
            "certifications.4",
            format!("Earned him an outstanding 98% score. Certifications {CERTIFICATION_CLOSING}"),
        )
}
