// src/hunting/prompt.rs
//! Ranking prompt construction. Output depends only on the arguments,
//! the current date included, so a stub backend sees identical text on every attempt.

use chrono::NaiveDate;
use std::fmt::Write;

use crate::types::{Candidate, JobType, SearchRequest, TimeFilter};
use crate::utils::truncate_chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingPrompt {
    pub system: String,
    pub user: String,
}

fn freshness_directive(time_filter: TimeFilter) -> &'static str {
    match time_filter {
        TimeFilter::PastDay => "Discard any posting that looks older than 24 HOURS.",
        TimeFilter::PastWeek => "Discard any posting that looks older than 7 DAYS.",
        TimeFilter::PastMonth => "Discard any posting that looks older than 30 DAYS.",
    }
}

fn job_type_directive(job_type: JobType) -> &'static str {
    match job_type {
        JobType::Internship => {
            "Keep ONLY INTERNSHIP positions. Reject full-time, contract and senior roles."
        }
        JobType::FullTime => {
            "Keep ONLY FULL-TIME positions. Reject internships, part-time and contract roles."
        }
        JobType::PartTime => "Keep ONLY PART-TIME positions. Reject full-time and internship roles.",
        JobType::Contract => "Keep ONLY CONTRACT positions. Reject permanent and internship roles.",
        JobType::Freelance => "Keep ONLY FREELANCE or REMOTE CONTRACT positions.",
        JobType::Any => "Any job type is acceptable (internship, full-time, contract, etc.).",
    }
}

fn system_block(request: &SearchRequest) -> String {
    format!(
        r#"You are an elite technical recruiter and forensic job analyst.
You do not tolerate old, stale or irrelevant results.

Directives:
1. FRESHNESS: {}
2. JOB TYPE: {}
3. SEO SPAM: articles, personal profiles, forums and tutorials are not job postings. Drop them.
4. NEW FIRST: postings marked NEW rank above previously seen ones.
5. CLOSED: if the content says "closed", "expired" or "position filled", reject it.
6. NEVER INVENT: if fewer than 3 good postings exist, stop early. Do not hallucinate."#,
        freshness_directive(request.time_filter()),
        job_type_directive(request.job_type())
    )
}

fn evidence_block(candidates: &[Candidate], content_chars: usize) -> String {
    let mut block = String::new();
    for (i, candidate) in candidates.iter().enumerate() {
        let _ = write!(
            block,
            "\n[JOB MATCH #{}]\n- URL: {}\n- TITLE: {}\n- CONTENT: {}\n- NEW: {}\n",
            i + 1,
            candidate.url,
            candidate.title,
            truncate_chars(candidate.content(), content_chars),
            if candidate.is_new() { "YES" } else { "PREVIOUSLY SEEN" }
        );
    }
    block
}

fn resume_block(resume: &str, resume_chars: usize) -> String {
    format!(
        r#"
CANDIDATE RESUME:
{}

RESUME MATCHING:
For each posting compare its requirements against the resume and report:
- Fit Score (0-100%): how well the candidate matches
- Matches: skills and experience the candidate has that the posting asks for
- Gaps: requirements the resume does not cover
"#,
        truncate_chars(resume, resume_chars)
    )
}

fn output_format(with_resume: bool) -> String {
    let mut format = String::from(
        "FINAL OUTPUT FORMAT:\n\n### TOP JOB MATCH [1]\n\
         **Job Title:** [exact title]\n\
         **Company:** [company name]\n\
         **Type:** [Internship / Full-Time / Contract / etc.]\n\
         **Location:** [where]\n\
         **Freshness:** [e.g. \"Posted today\", \"2 days ago\"]\n",
    );
    if with_resume {
        format.push_str("**Fit Score:** [0-100%]\n");
    }
    format.push_str("**Why it matches:** [one sentence]\n");
    if with_resume {
        format.push_str("**Matches:** [skills you have that match]\n");
        format.push_str("**Gaps:** [skills required but missing from the resume]\n");
    }
    format.push_str(
        "**Direct Link:** [full URL]\n\n\
         (Repeat for matches 2-5. Stop early if fewer exist. DO NOT INVENT JOBS.)\n\n\
         If ZERO real job postings pass your filters, say:\n\
         \"No fresh, legitimate job postings found. Try the 'Past Month' filter or search directly on LinkedIn/Indeed.\"",
    );
    format
}

/// Build the system and user blocks for one ranking call.
/// The resume sections appear only when `resume_text` has non-whitespace content.
pub fn build_prompt(
    candidates: &[Candidate],
    request: &SearchRequest,
    resume_text: Option<&str>,
    today: NaiveDate,
    content_chars: usize,
    resume_chars: usize,
) -> RankingPrompt {
    let resume = resume_text.map(str::trim).filter(|r| !r.is_empty());

    let type_display = match request.job_type() {
        JobType::Any => String::new(),
        other => format!(" ({})", other.as_str().to_uppercase()),
    };

    let mut user = format!(
        "MISSION: Find the top 5 ACTIVE{} job openings for '{}' in '{}'.\nCURRENT DATE: {}\n\nRaw search results:\n{}",
        type_display,
        request.job_title(),
        request.location(),
        today.format("%B %d, %Y"),
        evidence_block(candidates, content_chars)
    );

    let _ = write!(
        user,
        r#"
--------------------------------------------------
ANALYSIS CHECKLIST, for each job match:
1. Does the content say "posted 5 months ago", "closed" or "expired"? REJECT.
2. Is the title a person's name or profile rather than a job? REJECT.
3. Is the URL a blog, tutorial or forum? REJECT.
4. Is it from a job board or a company careers page? STRONG KEEP.
5. Does it mention a tech stack, "hiring", "apply now" or a salary? KEEP.
6. Does the job type match "{}"? If not, REJECT.
--------------------------------------------------
"#,
        request.job_type().as_str()
    );

    if let Some(resume) = resume {
        user.push_str(&resume_block(resume, resume_chars));
    }

    user.push('\n');
    user.push_str(&output_format(resume.is_some()));

    RankingPrompt {
        system: system_block(request),
        user,
    }
}
