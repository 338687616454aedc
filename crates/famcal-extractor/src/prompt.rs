//! LLM prompt for event extraction
//!
//! The rendered prompt is the protocol between the extractor and the model,
//! so its exact text is pinned by a snapshot test below. Any wording change
//! shows up there as a diff.

use crate::datetime::{weekday_date, weekday_name, WEEKDAYS};
use chrono::{Datelike, NaiveDate, Weekday};

/// Builds the extraction prompt for one email
pub struct PromptBuilder {
    cleaned_body: String,
    sender_address: String,
    sender_name: String,
    today: NaiveDate,
}

impl PromptBuilder {
    /// Create a new prompt builder
    ///
    /// `cleaned_body` should already have gone through
    /// [`crate::clean_email_body`]; `sender_address` is the normalized address.
    pub fn new(
        cleaned_body: impl Into<String>,
        sender_address: impl Into<String>,
        sender_name: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            cleaned_body: cleaned_body.into(),
            sender_address: sender_address.into(),
            sender_name: sender_name.into(),
            today,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let today = self.today.to_string();
        let name = &self.sender_name;
        let mut prompt = String::new();

        // 1. Task and input
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(&format!("FROM: {} <{}>\n", name, self.sender_address));
        prompt.push_str("EMAIL TEXT:\n");
        prompt.push_str(&self.cleaned_body);
        prompt.push_str("\n\n");
        prompt.push_str(&format!(
            "TODAY: {} ({})\n\n",
            today,
            weekday_name(self.today.weekday())
        ));

        // 2. Rules, including the weekday table
        prompt.push_str("RULES (CRITICAL):\n");
        prompt.push_str(&format!(
            "1. person = \"{}\" ALWAYS (never Ollama's guess)\n",
            name
        ));
        prompt.push_str("2. Extract ONLY explicit information from email text\n");
        prompt.push_str(&format!(
            "3. If not mentioned, use: date={}, time=0900, location=\"\"\n",
            today
        ));
        prompt.push_str("4. Time format: 24-hour HHMM (6pm=1800, 6:30pm=1830, no time=0900)\n");
        prompt.push_str(&format!("5. Weekday dates TODAY={}:\n", today));
        prompt.push_str(&format!("   - {}\n", self.weekday_entries(&WEEKDAYS[..3])));
        prompt.push_str(&format!("   - {}\n\n", self.weekday_entries(&WEEKDAYS[3..])));

        // 3. Few-shot examples
        prompt.push_str("REAL EXAMPLES (from family emails):\n");
        let thursday = weekday_date(Weekday::Thu, self.today).to_string();
        for (idx, (input, title, date, time, person, location)) in
            EXAMPLES.iter().enumerate()
        {
            let date = if *date == THURSDAY { thursday.as_str() } else { *date };
            let person = if *person == SENDER { name.as_str() } else { *person };
            prompt.push_str(&format!(
                "{}. \"{}\" → {{\"title\":\"{}\",\"date\":\"{}\",\"time\":\"{}\",\"person\":\"{}\",\"location\":\"{}\",\"recurring\":\"none\"}}\n",
                idx + 1,
                input,
                title,
                date,
                time,
                person,
                location
            ));
        }
        prompt.push('\n');

        // 4. Checklist and output format
        prompt.push_str("STEP-BY-STEP:\n");
        prompt.push_str("1. What is the event title? (extract from email)\n");
        prompt.push_str(&format!(
            "2. What is the date? (use mappings above, or today={} if none mentioned)\n",
            today
        ));
        prompt.push_str("3. What is the time? (24-hour HHMM, 0900 if none mentioned)\n");
        prompt.push_str("4. What is the location? (only if explicitly named, else empty)\n");
        prompt.push_str(&format!("5. person = \"{}\" (ALWAYS)\n\n", name));
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }

    /// "Monday=2026-01-19, Tuesday=2026-01-20, ..."
    fn weekday_entries(&self, weekdays: &[Weekday]) -> String {
        weekdays
            .iter()
            .map(|&day| format!("{}={}", weekday_name(day), weekday_date(day, self.today)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

const EXTRACTION_INSTRUCTIONS: &str =
    "Extract calendar event from this email. Extract ONLY what is explicitly stated.";

const OUTPUT_FORMAT_REMINDER: &str =
    "OUTPUT JSON ONLY (no markdown, no backticks, start with {):\n";

// Placeholders filled at render time
const SENDER: &str = "<sender>";
const THURSDAY: &str = "<thursday>";

/// (input, title, date, time, person, location)
///
/// Examples 3 and 5 name someone other than the sender; the extractor keeps
/// whatever person the model returns.
const EXAMPLES: [(&str, &str, &str, &str, &str, &str); 5] = [
    (
        "i have yoga this saturday the 17th at 9 AM",
        "Yoga",
        "2026-01-17",
        "0900",
        SENDER,
        "",
    ),
    (
        "Musical Parent Meeting on Jan 21 at 6:30pm",
        "Musical Parent Meeting",
        "2026-01-21",
        "1830",
        SENDER,
        "",
    ),
    (
        "Sarah hair appointment January 15 at 6 pm",
        "Hair appointment",
        "2026-01-15",
        "1800",
        "Sarah",
        "",
    ),
    (
        "I have a meeting on Thursday at 2 with SOCI",
        "Meeting with SOCI",
        THURSDAY,
        "1400",
        SENDER,
        "",
    ),
    (
        "Middle School Showcase at RNS January 14 at 7 pm",
        "Middle School Showcase",
        "2026-01-14",
        "1900",
        "Simon and Sarah",
        "RNS",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 14).unwrap()
    }

    const SNAPSHOT: &str = r#"Extract calendar event from this email. Extract ONLY what is explicitly stated.

FROM: Sarah <sarah@example.com>
EMAIL TEXT:
i have yoga this saturday the 17th at 9 AM

TODAY: 2026-01-14 (Wednesday)

RULES (CRITICAL):
1. person = "Sarah" ALWAYS (never Ollama's guess)
2. Extract ONLY explicit information from email text
3. If not mentioned, use: date=2026-01-14, time=0900, location=""
4. Time format: 24-hour HHMM (6pm=1800, 6:30pm=1830, no time=0900)
5. Weekday dates TODAY=2026-01-14:
   - Monday=2026-01-19, Tuesday=2026-01-20, Wednesday=2026-01-21
   - Thursday=2026-01-15, Friday=2026-01-16, Saturday=2026-01-17, Sunday=2026-01-18

REAL EXAMPLES (from family emails):
1. "i have yoga this saturday the 17th at 9 AM" → {"title":"Yoga","date":"2026-01-17","time":"0900","person":"Sarah","location":"","recurring":"none"}
2. "Musical Parent Meeting on Jan 21 at 6:30pm" → {"title":"Musical Parent Meeting","date":"2026-01-21","time":"1830","person":"Sarah","location":"","recurring":"none"}
3. "Sarah hair appointment January 15 at 6 pm" → {"title":"Hair appointment","date":"2026-01-15","time":"1800","person":"Sarah","location":"","recurring":"none"}
4. "I have a meeting on Thursday at 2 with SOCI" → {"title":"Meeting with SOCI","date":"2026-01-15","time":"1400","person":"Sarah","location":"","recurring":"none"}
5. "Middle School Showcase at RNS January 14 at 7 pm" → {"title":"Middle School Showcase","date":"2026-01-14","time":"1900","person":"Simon and Sarah","location":"RNS","recurring":"none"}

STEP-BY-STEP:
1. What is the event title? (extract from email)
2. What is the date? (use mappings above, or today=2026-01-14 if none mentioned)
3. What is the time? (24-hour HHMM, 0900 if none mentioned)
4. What is the location? (only if explicitly named, else empty)
5. person = "Sarah" (ALWAYS)

OUTPUT JSON ONLY (no markdown, no backticks, start with {):
"#;

    #[test]
    fn test_prompt_snapshot() {
        let prompt = PromptBuilder::new(
            "i have yoga this saturday the 17th at 9 AM",
            "sarah@example.com",
            "Sarah",
            wednesday(),
        )
        .build();
        assert_eq!(prompt, SNAPSHOT);
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let builder = PromptBuilder::new("text", "a@b.c", "Family", wednesday());
        assert_eq!(builder.build(), builder.build());
    }

    #[test]
    fn test_thursday_example_follows_reference_date() {
        // Thursday itself: the example maps to next week's Thursday
        let thursday = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let prompt = PromptBuilder::new("x", "a@b.c", "Family", thursday).build();
        assert!(prompt.contains(r#"→ {"title":"Meeting with SOCI","date":"2026-01-22""#));
        assert!(prompt.contains("Thursday=2026-01-22"));
        assert!(prompt.contains("TODAY: 2026-01-15 (Thursday)"));
    }

    #[test]
    fn test_weekday_table_never_contains_today() {
        let mut day = wednesday();
        for _ in 0..7 {
            let prompt = PromptBuilder::new("x", "a@b.c", "Family", day).build();
            for line in prompt.lines().filter(|l| l.starts_with("   - ")) {
                assert!(!line.contains(&day.to_string()), "{}", line);
            }
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_sender_identity_rendered() {
        let prompt = PromptBuilder::new("x", "dad@example.com", "Dad", wednesday()).build();
        assert!(prompt.contains("FROM: Dad <dad@example.com>"));
        assert!(prompt.contains("5. person = \"Dad\" (ALWAYS)"));
        assert!(prompt.contains(r#""person":"Simon and Sarah""#));
    }
}
