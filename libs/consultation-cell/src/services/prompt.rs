use chrono::Timelike;

/// Policy text sent ahead of every patient prompt. Edit the file, not this
/// module, and bump the version when the wording changes.
pub const PROMPT_TEMPLATE: &str = include_str!("../../prompts/consultation_v1.txt");
pub const PROMPT_TEMPLATE_VERSION: &str = "consultation_v1";

const GREETING_SLOT: &str = "{greeting}";
const PROMPT_SLOT: &str = "{prompt}";

pub fn greeting_for_hour(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

/// Builds the model prompt from the template. Deterministic in its two
/// inputs; the raw prompt is inserted last so placeholder-like text inside it
/// stays literal.
pub fn compose<T: Timelike>(raw_prompt: &str, now: &T) -> String {
    let greeting = greeting_for_hour(now.hour());

    PROMPT_TEMPLATE
        .trim()
        .replacen(GREETING_SLOT, greeting, 1)
        .replacen(PROMPT_SLOT, raw_prompt, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_greeting_by_hour() {
        assert_eq!(greeting_for_hour(9), "Good morning");
        assert_eq!(greeting_for_hour(14), "Good afternoon");
        assert_eq!(greeting_for_hour(20), "Good evening");
    }

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting_for_hour(0), "Good morning");
        assert_eq!(greeting_for_hour(11), "Good morning");
        assert_eq!(greeting_for_hour(12), "Good afternoon");
        assert_eq!(greeting_for_hour(17), "Good afternoon");
        assert_eq!(greeting_for_hour(18), "Good evening");
        assert_eq!(greeting_for_hour(23), "Good evening");
    }

    #[test]
    fn test_template_has_one_slot_each() {
        assert_eq!(PROMPT_TEMPLATE.matches(GREETING_SLOT).count(), 1);
        assert_eq!(PROMPT_TEMPLATE.matches(PROMPT_SLOT).count(), 1);
    }

    #[test]
    fn test_compose_golden() {
        let composed = compose("I have a fever since yesterday", &at(9));

        let expected = concat!(
            "You are Dr. AI, a board-certified physician who uses hinglish on speaking and if patient specifies a language you use that language. When responding:\n",
            "- Begin with a time-appropriate greeting: \"Good morning,\"\n",
            "- Be Professional while talking to patients (and be respectful)\n",
            "- Provide concise (20–30 words), evidence-based medical advice in a calm, reassuring tone.\n",
            "- If the user’s query is not medical, reply: \"Sorry that is not in my domain.\"\n",
            "Patient says: \"I have a fever since yesterday\"",
        );
        assert_eq!(composed, expected);
    }

    #[test]
    fn test_compose_is_deterministic() {
        assert_eq!(compose("cough", &at(18)), compose("cough", &at(18)));
        assert_ne!(compose("cough", &at(17)), compose("cough", &at(18)));
    }

    #[test]
    fn test_placeholders_in_prompt_stay_literal() {
        let composed = compose("what is {greeting} and {prompt}?", &at(14));

        assert!(composed.contains("\"Good afternoon,\""));
        assert!(composed.ends_with("Patient says: \"what is {greeting} and {prompt}?\""));
    }
}
