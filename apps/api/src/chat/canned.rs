use crate::models::user::UserType;

/// A keyword rule: the reply is used when the query contains any keyword.
struct Rule {
    keywords: &'static [&'static str],
    reply: &'static str,
}

const HIGH_SCHOOL_RULES: &[Rule] = &[
    Rule {
        keywords: &["dse", "score"],
        reply: "For DSE guidance, remember that your scores are just one part of your journey. \
            Focus on your strengths and explore the pathways open to you: local universities, \
            overseas options, and alternative routes through IVE or community colleges. \
            Every score opens different doors; the key is finding the right path for you.",
    },
    Rule {
        keywords: &["university", "study"],
        reply: "When choosing universities, weigh academic fit alongside personal interests. \
            Research local options like HKU, CUHK and HKUST, and look at overseas and alternative \
            pathways too. Compare program requirements, campus culture and career outcomes before deciding.",
    },
    Rule {
        keywords: &["career", "job"],
        reply: "Career exploration at your stage is about discovering possibilities. Try job shadowing, \
            attend career talks, and speak with professionals in fields that interest you. \
            It will help you choose the right university program and build a foundation for your career.",
    },
];

const HIGH_SCHOOL_DEFAULT: &str = "I'm here to help with DSE planning, university selection, and career \
    exploration. Whether you're worried about scores or excited about possibilities, we can work out \
    the best path for your future. What would you like to discuss?";

const UNI_POSTGRAD_RULES: &[Rule] = &[
    Rule {
        keywords: &["cv", "resume"],
        reply: "A strong CV tells your professional story clearly. Open with a short summary, then \
            sections for education, experience, skills and achievements. Tailor it to each role, \
            lead with action verbs, quantify your accomplishments, and keep it concise and error-free.",
    },
    Rule {
        keywords: &["interview"],
        reply: "Interview success comes from preparation and practice. Research the company, prepare \
            STAR method examples for behavioral questions, and rehearse your answers out loud. \
            Bring thoughtful questions of your own; confidence follows preparation.",
    },
    Rule {
        keywords: &["job", "application"],
        reply: "Effective job searching combines strategy with persistence. Network online and offline, \
            tailor each application to the role, and follow up professionally. \
            A few well-targeted applications usually beat many generic ones.",
    },
];

const UNI_POSTGRAD_DEFAULT: &str = "I'm here to support your career development with advice on job \
    searching, CV writing, interview preparation, and professional growth. \
    What would you like to focus on?";

/// Keyword-matched reply for when no LLM is available. First matching rule wins.
pub fn canned_response(user_type: UserType, query: &str) -> &'static str {
    let query = query.to_lowercase();
    let (rules, fallback) = match user_type {
        UserType::HighSchool => (HIGH_SCHOOL_RULES, HIGH_SCHOOL_DEFAULT),
        UserType::UniPostgrad => (UNI_POSTGRAD_RULES, UNI_POSTGRAD_DEFAULT),
    };

    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| query.contains(k)))
        .map(|rule| rule.reply)
        .unwrap_or(fallback)
}
