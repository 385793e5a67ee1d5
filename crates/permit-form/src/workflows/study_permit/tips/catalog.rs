use serde::Serialize;

/// Hand-written guidance for fields applicants most often get wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticTip {
    #[serde(skip)]
    pub key: &'static str,
    pub title: &'static str,
    pub tip: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_required: Option<&'static str>,
    #[serde(skip_serializing_if = "no_points")]
    pub key_points: &'static [&'static str],
}

fn no_points(points: &&[&str]) -> bool {
    points.is_empty()
}

pub const STATIC_TIPS: &[StaticTip] = &[
    StaticTip {
        key: "dli",
        title: "What is a DLI Number?",
        tip: "A Designated Learning Institution (DLI) number is a unique identifier assigned by the Canadian government to approved schools. It always starts with the letter \"O\" followed by 9 digits (e.g., O123456789). You can find your institution's DLI number on their official website or in your Letter of Acceptance.",
        example: Some("O123456789"),
        minimum_required: None,
        key_points: &[],
    },
    StaticTip {
        key: "letterOfAcceptance",
        title: "Letter of Acceptance Requirements",
        tip: "Your Letter of Acceptance must be an official document from a Designated Learning Institution (DLI) in Canada. It should include: the program name, start date, duration, tuition fees, and the DLI number. The letter must be signed by an authorized official of the institution.",
        example: None,
        minimum_required: None,
        key_points: &[
            "Must be from a DLI",
            "Include program details",
            "Signed and official",
            "Recent (within last 6 months)",
        ],
    },
    StaticTip {
        key: "proofOfFunds",
        title: "Proof of Financial Support",
        tip: "You need to prove you have enough money to pay for: tuition fees for your first year, living expenses (CAD $10,000 for 12 months), and return transportation for you and any family members coming with you. Acceptable documents include bank statements, scholarship letters, or sponsor affidavits.",
        example: None,
        minimum_required: Some("Tuition + CAD $10,000"),
        key_points: &[
            "Bank statements (last 4-6 months)",
            "Scholarship award letters",
            "Education loan approval",
            "Sponsor affidavit with financial proof",
        ],
    },
    StaticTip {
        key: "studyPlan",
        title: "Statement of Purpose / Study Plan",
        tip: "Your study plan should explain why you want to study in Canada, why you chose this specific program and institution, how it fits with your previous education and career goals, and most importantly, why you will return to your home country after completing your studies. Be honest and specific.",
        example: None,
        minimum_required: None,
        key_points: &[
            "Why this program?",
            "Why this institution?",
            "Career goals",
            "How it connects to previous education",
            "Reasons to return home",
        ],
    },
    StaticTip {
        key: "passport",
        title: "Passport Requirements",
        tip: "Your passport must be valid for the entire duration of your intended stay in Canada. IRCC recommends having at least 6 months of validity beyond your expected departure date. If your passport expires soon, renew it before applying.",
        example: None,
        minimum_required: None,
        key_points: &[
            "Valid for entire stay",
            "At least 6 months validity recommended",
            "Clear, readable bio page",
            "All pages with stamps/visas",
        ],
    },
];

/// Record paths and legacy client names that share a catalog entry.
const ALIASES: &[(&str, &str)] = &[
    ("studyDetails.dliNumber", "dli"),
    ("dliNumber", "dli"),
    ("studyDetails.fundsAvailable", "proofOfFunds"),
    ("fundsAvailable", "proofOfFunds"),
    ("availableFunds", "proofOfFunds"),
    ("passportInfo.number", "passport"),
    ("passportInfo.expiryDate", "passport"),
    ("passportNumber", "passport"),
    ("hasLetterOfAcceptance", "letterOfAcceptance"),
    ("statementOfPurpose", "studyPlan"),
];

pub fn static_tip(field_name: &str) -> Option<&'static StaticTip> {
    let name = field_name.trim();
    let key = ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, key)| *key);
    STATIC_TIPS.iter().find(|tip| tip.key == key)
}

/// `fundsAvailable` -> `Funds Available`, `studyDetails.dliNumber` -> `Dli Number`.
pub fn display_name(field_name: &str) -> String {
    let leaf = field_name.rsplit('.').next().unwrap_or(field_name);
    let mut spaced = String::with_capacity(leaf.len() + 4);
    for c in leaf.chars() {
        if c.is_ascii_uppercase() && !spaced.is_empty() {
            spaced.push(' ');
        }
        spaced.push(c);
    }
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_catalog_entries() {
        assert_eq!(static_tip("dli").map(|tip| tip.key), Some("dli"));
        assert_eq!(
            static_tip("studyDetails.dliNumber").map(|tip| tip.key),
            Some("dli")
        );
        assert_eq!(
            static_tip("availableFunds").map(|tip| tip.title),
            Some("Proof of Financial Support")
        );
        assert!(static_tip("maritalInfo.status").is_none());
    }

    #[test]
    fn display_names_split_camel_case() {
        assert_eq!(display_name("fundsAvailable"), "Funds Available");
        assert_eq!(display_name("studyDetails.dliNumber"), "Dli Number");
        assert_eq!(display_name("uci"), "Uci");
    }
}
