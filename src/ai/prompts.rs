//! Prompt builders for every assistant surface.
//!
//! [`PromptBuilder`] renders the data context and instructions sent to the
//! gateway.  The language is selected at construction time; English and
//! Hindi each get dedicated instruction blocks.  The guide persona is
//! named "Sahayika" and speaks in simple language aimed at readers with
//! low literacy.

use crate::data::{DistrictSnapshot, Metric, PerformanceBundle, YearlyRecord};
use crate::i18n::Language;

// ---------------------------------------------------------------------------
// GrievanceDetails
// ---------------------------------------------------------------------------

/// User-supplied fields for the grievance-letter draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrievanceDetails {
    pub name: String,
    pub village: String,
    pub complaint_type: String,
    pub details: String,
    pub district: String,
}

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds feature prompts in the selected output language.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    language: Language,
}

impl PromptBuilder {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// The response-language instruction appended to most prompts.
    fn language_instruction(&self) -> &'static str {
        match self.language {
            Language::English => {
                "Your response MUST be in simple, conversational English."
            }
            Language::Hindi => {
                "Your response MUST be in simple, conversational Hindi \
                 (Devanagari script). When you refer to yourself, use \
                 feminine Hindi grammar."
            }
        }
    }

    /// Key/value summary of one yearly record, shared by several prompts.
    fn record_summary(record: &YearlyRecord) -> String {
        format!(
            "- Families who got work: {:.0}\n\
             - Total workdays created: {:.2} lakh\n\
             - Average days of work per family: {:.0}\n\
             - Money spent on wages and materials: Rs {:.2} crore",
            record.households_employed,
            record.person_days_lakh,
            record.average_days,
            record.expenditure_crore,
        )
    }

    /// Plain-language explanation of the latest year versus the state
    /// average.  Returns `None` when the bundle has no matching average
    /// year to compare against.
    pub fn explanation(&self, bundle: &PerformanceBundle) -> Option<String> {
        let (latest, average) = bundle.latest_with_average()?;

        let average_summary = format!(
            "- Families who got work: {:.0}\n\
             - Total workdays created: {:.2} lakh\n\
             - Average days of work per family: {:.0}\n\
             - Money spent: Rs {:.2} crore",
            average.households_employed,
            average.person_days_lakh,
            average.average_days,
            average.expenditure_crore,
        );

        Some(format!(
            "You are an expert at explaining government schemes to people \
             with low literacy in rural India. Your persona is a helpful \
             female guide. Your tone should be simple, positive, and \
             encouraging.\n\n\
             Explain the following MGNREGA performance data for {district} \
             district for the year {year}, and compare it to the state \
             average.\n\n\
             Data for {district}:\n{district_data}\n\n\
             Average data for a district in the state:\n{average_data}\n\n\
             Keep the explanation short, in 3-4 simple bullet points. Start \
             with a positive sentence about the district's progress. Clearly \
             state if the district is doing better or worse than the state \
             average on key metrics and what that means for local people.\n\n\
             {language}",
            district = bundle.district.name,
            year = latest.year,
            district_data = Self::record_summary(latest),
            average_data = average_summary,
            language = self.language_instruction(),
        ))
    }

    /// Data-grounded Q&A over one district's bundle (streamed).
    pub fn analyst(&self, bundle: &PerformanceBundle, question: &str) -> String {
        let context =
            serde_json::to_string_pretty(bundle).unwrap_or_else(|_| "{}".to_string());

        format!(
            "You are a helpful and friendly female data analyst specializing \
             in Indian government schemes like MGNREGA. You will be provided \
             with performance data for a specific district in JSON format, \
             including the district's yearly data and the corresponding \
             state-level averages for each year. Answer the user's question \
             based *only* on the provided data. Be concise, clear, and use \
             Markdown for formatting. Do not invent or assume any data not \
             present in the context. If the question cannot be answered with \
             the given data, politely say so. Analyze trends over the years \
             available in the data.\n{language}\n\n\
             Data context:\n```json\n{context}\n```\n\n\
             User question:\n\"{question}\"",
            language = self.language_instruction(),
            context = context,
            question = question,
        )
    }

    /// Rights guidance under the scheme (streamed, general knowledge).
    pub fn rights(&self, question: &str) -> String {
        let disclaimer = match self.language {
            Language::English => {
                "This is for informational purposes only. For official \
                 matters, please contact your Gram Panchayat."
            }
            Language::Hindi => {
                "यह केवल जानकारी के लिए है। आधिकारिक मामलों के लिए, कृपया अपनी \
                 ग्राम पंचायत से संपर्क करें।"
            }
        };

        format!(
            "You are a very patient and helpful female guide named 'Sahayika' \
             who explains the rights of citizens under the Indian MGNREGA \
             scheme. Your audience has low literacy, so your language must be \
             extremely simple and clear. Break complex topics into small \
             points, use bullet lists and everyday analogies, avoid jargon, \
             and keep your tone encouraging. End your answer with this \
             disclaimer: \"{disclaimer}\"\n{language}\n\n\
             User's question:\n\"{question}\"",
            disclaimer = disclaimer,
            language = self.language_instruction(),
            question = question,
        )
    }

    /// Pension-scheme guidance (streamed, general knowledge).
    pub fn pension(&self, question: &str) -> String {
        let disclaimer = match self.language {
            Language::English => {
                "This is for informational purposes only. For official \
                 matters, please contact your local social welfare office."
            }
            Language::Hindi => {
                "यह केवल जानकारी के लिए है। आधिकारिक मामलों के लिए, कृपया अपने \
                 स्थानीय समाज कल्याण कार्यालय से संपर्क करें।"
            }
        };

        format!(
            "You are a very patient and helpful female guide named 'Sahayika' \
             who explains Indian social security pension schemes (old-age, \
             widow, and disability pensions). Your audience has low literacy, \
             so your language must be extremely simple and clear. Break \
             complex topics into small points, use bullet lists and everyday \
             analogies, avoid jargon, and keep your tone encouraging. End \
             your answer with this disclaimer: \"{disclaimer}\"\n{language}\n\n\
             User's question:\n\"{question}\"",
            disclaimer = disclaimer,
            language = self.language_instruction(),
            question = question,
        )
    }

    /// Worksite guidance for a district (streamed, no live data).
    pub fn worksite(&self, district: &str, question: &str) -> String {
        format!(
            "You are a helpful female guide for the MGNREGA scheme named \
             'Sahayika'. A user is asking where they can find work in the \
             {district} district. You DO NOT have access to real-time \
             worksite data. Give 2-3 generic examples of common MGNREGA work \
             (pond construction, road building, tree plantation), emphasize \
             that these are just examples, and always end by telling the \
             user to contact their Gram Panchayat for the exact location and \
             availability of current worksites.\n{language}\n\n\
             User's question:\n\"{question}\"",
            district = district,
            language = self.language_instruction(),
            question = question,
        )
    }

    /// Single-sentence "Did you know?" insight for the latest snapshot.
    pub fn insight(&self, snapshot: &DistrictSnapshot) -> String {
        let opener = match self.language {
            Language::English => "Did you know?",
            Language::Hindi => "क्या आप जानते हैं?",
        };

        format!(
            "You are a data storyteller. Based on the following MGNREGA data \
             for {district} district, generate a single, short, interesting \
             \"Did you know?\" style insight. Make it relatable with a simple \
             analogy or comparison. Do not just repeat the data. Start the \
             response with \"{opener}\" and keep it to one sentence, with no \
             preamble or sign-off.\n{language}\n\n\
             Data:\n{data}",
            district = snapshot.name,
            opener = opener,
            language = self.language_instruction(),
            data = Self::record_summary(&snapshot.latest),
        )
    }

    /// Formal grievance letter addressed to the Block Development Officer.
    pub fn letter(&self, details: &GrievanceDetails) -> String {
        let target_language = match self.language {
            Language::English => "Generate the letter in ENGLISH.",
            Language::Hindi => {
                "Generate the letter only in Hindi (Devanagari script)."
            }
        };

        format!(
            "You are a helpful assistant for rural citizens in India. Draft a \
             formal grievance letter regarding the MGNREGA scheme, addressed \
             to the \"Block Development Officer\". It should be polite, \
             clear, and formal. Incorporate these details:\n\
             - Name: {name}\n\
             - Village/Block: {village}, {district} District\n\
             - Subject of complaint: MGNREGA Complaint - {complaint_type}\n\
             - Detailed problem: {details}\n\n\
             Structure: salutation to the Block Development Officer of \
             {district} District, a clear subject line, a respectful \
             introduction of the sender, a specific statement of the problem, \
             a request for timely investigation and resolution, and a closing \
             with the sender's name and space for signature and date.\n\
             {target_language}",
            name = details.name,
            village = details.village,
            district = details.district,
            complaint_type = details.complaint_type,
            details = details.details,
            target_language = target_language,
        )
    }

    /// Short fictional success story grounded in the district's numbers.
    pub fn story(&self, bundle: &PerformanceBundle) -> Option<String> {
        let (latest, average) = bundle.latest_with_average()?;

        Some(format!(
            "You are a positive storyteller. Based on the provided MGNREGA \
             data summary, write a short, heartwarming, fictional success \
             story (2-3 paragraphs) about a family from the {district} \
             district who benefited from the scheme. Create anonymous \
             characters. If the district's average days of employment is \
             high, focus on how consistent work helped the family; if it is \
             low but improving, focus on hope and positive change. Weave the \
             data into the narrative instead of stating it, and end on a \
             hopeful note.\n{language}\n\n\
             Data summary: District: {district}, Year: {year}, Average days \
             of employment per family: {days:.0}, compared to the state \
             average of {avg_days:.0} days.",
            district = bundle.district.name,
            language = self.language_instruction(),
            year = latest.year,
            days = latest.average_days,
            avg_days = average.average_days,
        ))
    }

    /// Trend-based forecast request for one metric (structured output).
    pub fn forecast(&self, metric: Metric, series: &[(u16, f64)], next_year: u16) -> String {
        let history = series
            .iter()
            .map(|(year, value)| format!("{year}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Given the following historical data for the metric \
             \"{metric}\": {history}. Provide a simple, non-financial, \
             trend-based forecast for the year {next_year}. Respond with a \
             JSON object with two keys: \"forecastedValue\" (a single number \
             for {next_year}) and \"explanation\" (one short sentence about \
             the trend). Do not include any other text.",
            metric = metric.prompt_name(),
            history = history,
            next_year = next_year,
        )
    }

    /// Resolve home coordinates to the nearest district in `districts`.
    /// The answer is validated by the caller against the same list.
    pub fn district_from_coords(
        &self,
        latitude: f64,
        longitude: f64,
        districts: &[String],
    ) -> String {
        format!(
            "From the following list of districts in Uttar Pradesh, India, \
             which one is closest to the geographical coordinate latitude: \
             {latitude}, longitude: {longitude}?\n\n\
             Districts: [{list}]\n\n\
             Respond with only the district name and nothing else.",
            latitude = latitude,
            longitude = longitude,
            list = districts.join(", "),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
