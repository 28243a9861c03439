//! Bilingual UI strings — English and Hindi.
//!
//! The whole interface switches language at runtime, so all user-visible
//! text lives in one [`UiStrings`] table per language instead of being
//! scattered through the widgets.  AI prompt wording is owned by
//! [`crate::ai::prompts`]; this module only carries interface chrome and
//! the fixed fallback messages shown when a gateway call fails.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Interface and AI output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    /// Simple conversational English.
    #[serde(rename = "en")]
    English,
    /// Simple conversational Hindi (Devanagari script).
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    /// ISO-639-1 code used in prompts and config files.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    /// Native-script label for the language switcher.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
        }
    }

    /// The string table for this language.
    pub fn strings(&self) -> &'static UiStrings {
        match self {
            Language::English => &EN,
            Language::Hindi => &HI,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

// ---------------------------------------------------------------------------
// UiStrings
// ---------------------------------------------------------------------------

/// Every user-visible interface string, one table per language.
pub struct UiStrings {
    // Chrome
    pub app_title: &'static str,
    pub district_label: &'static str,
    pub year_column: &'static str,
    pub households_metric: &'static str,
    pub person_days_metric: &'static str,
    pub avg_days_metric: &'static str,
    pub expenditure_metric: &'static str,
    pub state_average_note: &'static str,
    pub above_average: &'static str,
    pub below_average: &'static str,

    // Sections
    pub explanation_heading: &'static str,
    pub explain_button: &'static str,
    pub insight_heading: &'static str,
    pub insight_button: &'static str,
    pub forecast_heading: &'static str,
    pub forecast_button: &'static str,
    pub forecast_next_year: &'static str,
    pub story_heading: &'static str,
    pub story_button: &'static str,
    pub export_button: &'static str,
    pub export_done: &'static str,

    // Assistant tabs
    pub analyst_tab: &'static str,
    pub rights_tab: &'static str,
    pub pension_tab: &'static str,
    pub worksite_tab: &'static str,
    pub chat_placeholder: &'static str,
    pub chat_greeting: &'static str,
    pub analyzing: &'static str,
    pub send_button: &'static str,
    pub listen_button: &'static str,
    pub stop_listen_button: &'static str,

    // Letter form
    pub letter_heading: &'static str,
    pub letter_name: &'static str,
    pub letter_village: &'static str,
    pub letter_complaint_type: &'static str,
    pub letter_details: &'static str,
    pub letter_draft_button: &'static str,
    pub letter_copy_button: &'static str,
    pub letter_copied: &'static str,

    // Fixed fallback messages — always static and localized, never a raw
    // error string from the transport.
    pub ai_disabled: &'static str,
    pub stream_error: &'static str,
    pub request_error: &'static str,
    pub no_data: &'static str,
    pub audio_unavailable: &'static str,
}

/// English table.
static EN: UiStrings = UiStrings {
    app_title: "Gram Sahayak — MGNREGA District Dashboard",
    district_label: "District",
    year_column: "Year",
    households_metric: "Households employed",
    person_days_metric: "Person-days (lakh)",
    avg_days_metric: "Avg. days per household",
    expenditure_metric: "Expenditure (₹ crore)",
    state_average_note: "State average",
    above_average: "above state average",
    below_average: "below state average",

    explanation_heading: "What do these numbers mean?",
    explain_button: "Explain simply",
    insight_heading: "Did you know?",
    insight_button: "Show an insight",
    forecast_heading: "Next-year outlook",
    forecast_button: "Forecast trends",
    forecast_next_year: "Forecast",
    story_heading: "A story from the village",
    story_button: "Tell a story",
    export_button: "Export CSV",
    export_done: "Saved",

    analyst_tab: "AI Analyst",
    rights_tab: "Know Your Rights",
    pension_tab: "Pensions",
    worksite_tab: "Find Work",
    chat_placeholder: "Ask a question…",
    chat_greeting: "Ask me anything — I will answer from the data and the scheme rules.",
    analyzing: "Analyzing…",
    send_button: "Send",
    listen_button: "Speak",
    stop_listen_button: "Stop",

    letter_heading: "Draft a grievance letter",
    letter_name: "Your name",
    letter_village: "Village / block",
    letter_complaint_type: "Complaint type",
    letter_details: "Describe the problem",
    letter_draft_button: "Draft letter",
    letter_copy_button: "Copy letter",
    letter_copied: "Copied to clipboard",

    ai_disabled: "AI features are disabled. API key is missing.",
    stream_error: "Sorry, I ran into a problem. Please try again.",
    request_error: "Something went wrong. Please try again later.",
    no_data: "No data is available for this district.",
    audio_unavailable: "Audio could not be played. Please try again.",
};

/// Hindi table.
static HI: UiStrings = UiStrings {
    app_title: "ग्राम सहायक — मनरेगा जिला डैशबोर्ड",
    district_label: "जिला",
    year_column: "वर्ष",
    households_metric: "रोजगार पाने वाले परिवार",
    person_days_metric: "काम के दिन (लाख)",
    avg_days_metric: "प्रति परिवार औसत दिन",
    expenditure_metric: "खर्च (₹ करोड़)",
    state_average_note: "राज्य औसत",
    above_average: "राज्य औसत से ऊपर",
    below_average: "राज्य औसत से नीचे",

    explanation_heading: "इन आंकड़ों का क्या मतलब है?",
    explain_button: "सरल भाषा में समझाएं",
    insight_heading: "क्या आप जानते हैं?",
    insight_button: "एक रोचक तथ्य दिखाएं",
    forecast_heading: "अगले वर्ष का अनुमान",
    forecast_button: "रुझान का अनुमान लगाएं",
    forecast_next_year: "अनुमान",
    story_heading: "गांव की एक कहानी",
    story_button: "कहानी सुनाएं",
    export_button: "CSV सहेजें",
    export_done: "सहेजा गया",

    analyst_tab: "एआई विश्लेषक",
    rights_tab: "अपने अधिकार जानें",
    pension_tab: "पेंशन",
    worksite_tab: "काम खोजें",
    chat_placeholder: "अपना सवाल पूछें…",
    chat_greeting: "मुझसे कुछ भी पूछें — मैं डेटा और योजना के नियमों से जवाब दूंगी।",
    analyzing: "विश्लेषण हो रहा है…",
    send_button: "भेजें",
    listen_button: "बोलें",
    stop_listen_button: "रोकें",

    letter_heading: "शिकायत पत्र तैयार करें",
    letter_name: "आपका नाम",
    letter_village: "गांव / ब्लॉक",
    letter_complaint_type: "शिकायत का प्रकार",
    letter_details: "समस्या का विवरण लिखें",
    letter_draft_button: "पत्र तैयार करें",
    letter_copy_button: "पत्र कॉपी करें",
    letter_copied: "क्लिपबोर्ड पर कॉपी हो गया",

    ai_disabled: "एआई सुविधाएं बंद हैं। एपीआई कुंजी उपलब्ध नहीं है।",
    stream_error: "क्षमा करें, एक समस्या आ गई। कृपया फिर से प्रयास करें।",
    request_error: "कुछ गड़बड़ हो गई। कृपया बाद में फिर प्रयास करें।",
    no_data: "इस जिले के लिए कोई डेटा उपलब्ध नहीं है।",
    audio_unavailable: "ऑडियो नहीं चल सका। कृपया फिर से प्रयास करें।",
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_iso_639_1() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Hindi.code(), "hi");
    }

    #[test]
    fn default_language_is_english() {
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn serde_round_trip_uses_codes() {
        let json = serde_json::to_string(&Language::Hindi).unwrap();
        assert_eq!(json, "\"hi\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Language::Hindi);
    }

    #[test]
    fn tables_differ_between_languages() {
        let en = Language::English.strings();
        let hi = Language::Hindi.strings();
        assert_ne!(en.app_title, hi.app_title);
        assert_ne!(en.stream_error, hi.stream_error);
    }

    #[test]
    fn fallback_messages_are_non_empty() {
        for lang in [Language::English, Language::Hindi] {
            let s = lang.strings();
            assert!(!s.ai_disabled.is_empty());
            assert!(!s.stream_error.is_empty());
            assert!(!s.no_data.is_empty());
        }
    }
}
