// src/hunting/staleness.rs
//! Heuristic pre-filter for postings that look closed, too old, or off-topic

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::types::{Candidate, TimeFilter};

/// Phrases that mark a posting as closed or old regardless of the time filter
const STALE_KEYWORDS: &[&str] = &[
    "months ago",
    "year ago",
    "years ago",
    "closed",
    "expired",
    "no longer accepting",
    "position filled",
    "this job is closed",
    "application deadline has passed",
];

/// Sites that are never job boards: forums, tutorials, video, Q&A
const JUNK_DOMAINS: &[&str] = &[
    "zhihu.com",
    "baidu.com",
    "quora.com",
    "stackoverflow.com",
    "reddit.com/r/",
    "medium.com",
    "youtube.com",
    "udemy.com",
    "coursera.org",
    "geeksforgeeks.org",
    "tutorialspoint.com",
    "w3schools.com",
    "wikipedia.org",
];

const PAST_DAY_PHRASES: &[&str] = &[
    "yesterday",
    "week ago",
    "weeks ago",
    "month ago",
    "months ago",
];

const PAST_WEEK_PHRASES: &[&str] = &["week ago", "weeks ago", "month ago", "months ago"];

static DAYS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)\+?\s*days?\s+ago\b").expect("valid days-ago pattern"));

static MONTHS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)\s*months?\s+ago\b").expect("valid months-ago pattern"));

const MONTH_NAMES: &str =
    r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

static POSTED_ON_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:posted|published)(?:\s+(?:on|in))?:?\s+(?:\d{{1,2}}\s+{MONTH_NAMES}|{MONTH_NAMES}\.?(?:\s+(?:\d{{4}}|\d{{1,2}}))?)\b"
    ))
    .expect("valid posted-on-date pattern")
});

static DATED_OLD_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:posted|published|updated|date|ago|since).{0,30}?\b(?:201\d|202[0-4])\b")
        .expect("valid dated-year pattern")
});

/// Which rule flagged a posting; the first match is the one logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    Keyword(&'static str),
    JunkDomain(&'static str),
    TooOldForWindow(String),
    MonthsAgo(u32),
    OldYear,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(f, "stale keyword '{}'", keyword),
            Self::JunkDomain(domain) => write!(f, "junk domain '{}'", domain),
            Self::TooOldForWindow(phrase) => write!(f, "'{}' is outside the time window", phrase),
            Self::MonthsAgo(months) => write!(f, "posted {} month(s) ago", months),
            Self::OldYear => write!(f, "dated with a year before 2025"),
        }
    }
}

/// Decide whether a candidate looks stale, closed, or off-topic
pub fn is_stale(candidate: &Candidate, time_filter: TimeFilter) -> bool {
    stale_reason(candidate, time_filter).is_some()
}

/// Same as [`is_stale`] but reports the first rule that matched
pub fn stale_reason(candidate: &Candidate, time_filter: TimeFilter) -> Option<StaleReason> {
    let text = format!("{} {}", candidate.title, candidate.snippet).to_lowercase();
    let url = candidate.url.to_lowercase();

    if let Some(keyword) = STALE_KEYWORDS.iter().find(|k| text.contains(*k)) {
        return Some(StaleReason::Keyword(keyword));
    }

    if let Some(domain) = JUNK_DOMAINS.iter().find(|d| url.contains(*d)) {
        return Some(StaleReason::JunkDomain(domain));
    }

    if let Some(reason) = window_violation(&text, time_filter) {
        return Some(reason);
    }

    if let Some(months) = max_count(&MONTHS_AGO, &text).filter(|n| *n >= 1) {
        return Some(StaleReason::MonthsAgo(months));
    }

    if DATED_OLD_YEAR.is_match(&text) {
        return Some(StaleReason::OldYear);
    }

    None
}

fn window_violation(text: &str, time_filter: TimeFilter) -> Option<StaleReason> {
    let phrases = match time_filter {
        TimeFilter::PastDay => PAST_DAY_PHRASES,
        TimeFilter::PastWeek => PAST_WEEK_PHRASES,
        TimeFilter::PastMonth => return None,
    };

    if let Some(phrase) = phrases.iter().find(|p| text.contains(*p)) {
        return Some(StaleReason::TooOldForWindow(phrase.to_string()));
    }

    if time_filter == TimeFilter::PastDay {
        match max_count(&DAYS_AGO, text) {
            Some(0) => {}
            Some(days) => {
                return Some(StaleReason::TooOldForWindow(format!("{} days ago", days)));
            }
            // "a few days ago", "several days ago"
            None if text.contains("days ago") => {
                return Some(StaleReason::TooOldForWindow("days ago".to_string()));
            }
            None => {}
        }
        if let Some(found) = POSTED_ON_DATE.find(text) {
            return Some(StaleReason::TooOldForWindow(found.as_str().to_string()));
        }
    }

    None
}

fn max_count(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JobType, SearchRequest};
    use proptest::prelude::*;

    fn candidate(url: &str, title: &str, snippet: &str) -> Candidate {
        let request =
            SearchRequest::new("Data Analyst", "Remote", TimeFilter::PastWeek, JobType::Any)
                .unwrap();
        Candidate::new(url, title, snippet, &request)
    }

    fn posting(snippet: &str) -> Candidate {
        candidate("https://acme.io/careers/job/123", "Data Analyst", snippet)
    }

    #[test]
    fn test_fresh_posting_passes_every_filter() {
        let c = posting("Hiring now. Posted 2 hours ago. Apply today!");
        for filter in TimeFilter::ALL {
            assert!(!is_stale(&c, filter), "{:?}", filter);
        }
    }

    #[test]
    fn test_global_keywords() {
        let c = posting("This position is CLOSED to new applicants");
        assert_eq!(
            stale_reason(&c, TimeFilter::PastMonth),
            Some(StaleReason::Keyword("closed"))
        );
        assert!(is_stale(
            &posting("Sorry, the application deadline has passed."),
            TimeFilter::PastMonth
        ));
    }

    #[test]
    fn test_junk_domains() {
        let c = candidate(
            "https://www.reddit.com/r/datascience/comments/abc",
            "Anyone hiring analysts?",
            "thread",
        );
        assert_eq!(
            stale_reason(&c, TimeFilter::PastMonth),
            Some(StaleReason::JunkDomain("reddit.com/r/"))
        );
        let c = candidate("https://www.youtube.com/watch?v=1", "Analyst interview", "");
        assert!(is_stale(&c, TimeFilter::PastMonth));
    }

    #[test]
    fn test_past_day_is_strictest() {
        let c = posting("Posted 3 days ago");
        assert!(is_stale(&c, TimeFilter::PastDay));
        assert!(!is_stale(&c, TimeFilter::PastWeek));
        assert!(!is_stale(&c, TimeFilter::PastMonth));

        assert!(!is_stale(&posting("Posted 0 days ago"), TimeFilter::PastDay));
        assert!(is_stale(&posting("Posted yesterday"), TimeFilter::PastDay));
        assert!(!is_stale(&posting("Posted yesterday"), TimeFilter::PastWeek));
    }

    #[test]
    fn test_past_day_rejects_days_ago_without_plain_count() {
        assert_eq!(
            stale_reason(&posting("Posted 30+ days ago"), TimeFilter::PastDay),
            Some(StaleReason::TooOldForWindow("30 days ago".to_string()))
        );
        assert_eq!(
            stale_reason(&posting("Posted a few days ago"), TimeFilter::PastDay),
            Some(StaleReason::TooOldForWindow("days ago".to_string()))
        );
        assert!(!is_stale(&posting("Posted 30+ days ago"), TimeFilter::PastWeek));
    }

    #[test]
    fn test_past_day_rejects_posted_on_month_name() {
        assert!(is_stale(&posting("Posted on March 3"), TimeFilter::PastDay));
        assert!(is_stale(&posting("published: 12 sep"), TimeFilter::PastDay));
        assert!(is_stale(&posting("Posted: January 2025"), TimeFilter::PastDay));
        assert!(is_stale(&posting("Published in March"), TimeFilter::PastDay));
        assert!(!is_stale(&posting("Posted: January 2025"), TimeFilter::PastWeek));
        assert!(!is_stale(&posting("Posted in marketing, apply now"), TimeFilter::PastDay));
        assert!(!is_stale(&posting("Posted on March 3"), TimeFilter::PastMonth));
        // "may" as a verb is not a date
        assert!(!is_stale(
            &posting("Once posted you may apply directly"),
            TimeFilter::PastDay
        ));
    }

    #[test]
    fn test_past_week_rejects_weeks() {
        let c = posting("Posted 2 weeks ago");
        assert!(is_stale(&c, TimeFilter::PastWeek));
        assert!(!is_stale(&c, TimeFilter::PastMonth));
    }

    #[test]
    fn test_explicit_month_count() {
        let c = posting("Posted 1 month ago");
        assert_eq!(
            stale_reason(&c, TimeFilter::PastMonth),
            Some(StaleReason::MonthsAgo(1))
        );
    }

    #[test]
    fn test_old_year_needs_date_context() {
        assert!(is_stale(&posting("Last updated: March 2023"), TimeFilter::PastMonth));
        assert!(is_stale(&posting("Hiring since 2019"), TimeFilter::PastMonth));
        // salary figures and bare years are not dates
        assert!(!is_stale(&posting("Salary 120230 USD per year"), TimeFilter::PastMonth));
        assert!(!is_stale(&posting("Founded 2015, growing fast"), TimeFilter::PastMonth));
    }

    proptest! {
        #[test]
        fn prop_position_filled_always_stale(
            prefix in "[a-zA-Z0-9 ,.]{0,40}",
            suffix in "[a-zA-Z0-9 ,.]{0,40}",
            filter_idx in 0usize..3,
        ) {
            let snippet = format!("{}position filled{}", prefix, suffix);
            let c = posting(&snippet);
            prop_assert!(is_stale(&c, TimeFilter::ALL[filter_idx]));
        }
    }
}
