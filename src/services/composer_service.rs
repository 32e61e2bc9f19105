//! Message composition.
//!
//! Renders the HTML body of an outreach message from the sender profile and
//! a handful of phrase pools. One phrase is drawn from each pool per message
//! through the injected [`Randomness`], independently of the other pools.
//!
//! The recipient name is substituted verbatim. It is not HTML-escaped, so
//! markup in the contact table ends up in the rendered body.

use crate::config::ProfileSettings;
use crate::domain::first_name;

use super::Randomness;

/// Opening words of the greeting line, followed by the recipient's first name.
pub const GREETINGS: [&str; 3] = ["Hi", "Hello", "Dear"];

/// Rationale sentences, rendered only when a company is given. `{role}` is
/// replaced with the title-cased role type.
pub const RATIONALES: [&str; 1] = [
    "I believe my background aligns well with {role} roles and would love to contribute to your team.",
];

/// Closing requests for a conversation.
pub const CALLS_TO_ACTION: [&str; 3] = [
    "Would you be open to a brief conversation about how I could contribute to your team?",
    "I'd welcome the opportunity to discuss how my skills align with your needs.",
    "I'd appreciate the chance to learn more about your current opportunities.",
];

/// Sign-off lines, followed by a line break and the sender's first name.
pub const SIGN_OFFS: [&str; 3] = [
    "Best regards,",
    "Thank you for your consideration,",
    "Looking forward to connecting,",
];

/// Parameters for one rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeRequest {
    /// Recipient's full name.
    pub recipient_name: String,
    /// Target company; the rationale sentence is omitted when `None`.
    pub company: Option<String>,
    /// Kind of role being applied for.
    pub role_type: String,
    /// Whether to render the portfolio links block.
    pub include_links: bool,
}

impl ComposeRequest {
    /// Default role type.
    pub const DEFAULT_ROLE: &'static str = "software engineering";

    /// Creates a request with no company, the default role and links enabled.
    pub fn new(recipient_name: impl Into<String>) -> Self {
        Self {
            recipient_name: recipient_name.into(),
            company: None,
            role_type: Self::DEFAULT_ROLE.to_string(),
            include_links: true,
        }
    }

    /// Sets the target company.
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Sets the role type.
    pub fn role_type(mut self, role_type: impl Into<String>) -> Self {
        self.role_type = role_type.into();
        self
    }

    /// Enables or disables the links block.
    pub fn include_links(mut self, include: bool) -> Self {
        self.include_links = include;
        self
    }
}

/// Renders outreach messages for one sender profile.
#[derive(Debug, Clone)]
pub struct MessageComposer {
    profile: ProfileSettings,
}

impl MessageComposer {
    pub fn new(profile: ProfileSettings) -> Self {
        Self { profile }
    }

    /// Returns the request this profile implies for `recipient_name`.
    pub fn request_for(&self, recipient_name: &str, company: Option<&str>) -> ComposeRequest {
        let mut request = ComposeRequest::new(recipient_name)
            .role_type(self.profile.role_type.clone())
            .include_links(self.profile.include_links);
        request.company = company.map(str::to_string);
        request
    }

    /// Renders the HTML document for `request`.
    pub fn compose(&self, request: &ComposeRequest, rng: &mut dyn Randomness) -> String {
        let greeting = format!(
            "{} {},",
            choose(&GREETINGS, rng),
            first_name(&request.recipient_name)
        );

        let rationale = match request.company {
            Some(_) => format!(
                "<p>{}</p>",
                choose(&RATIONALES, rng).replace("{role}", &title_case(&request.role_type))
            ),
            None => String::new(),
        };

        let achievements: String = self
            .profile
            .achievements
            .iter()
            .map(|a| format!("<li><b>{}:</b> {}</li>", a.category, a.details))
            .collect();

        let links = if request.include_links && !self.profile.links.is_empty() {
            let items: String = self
                .profile
                .links
                .iter()
                .map(|link| {
                    format!(
                        "\n        <li>{}: <a href=\"{}\">{}</a></li>",
                        link.label,
                        link.url,
                        strip_scheme(&link.url)
                    )
                })
                .collect();
            format!("<p>You can learn more about my work here:</p>\n    <ul>{items}\n    </ul>")
        } else {
            String::new()
        };

        let call_to_action = choose(&CALLS_TO_ACTION, rng);
        let sign_off = format!("{}<br>{}", choose(&SIGN_OFFS, rng), self.profile.first_name);

        format!(
            r#"<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <p>{greeting}</p>

    <p>{introduction}</p>

    {rationale}

    <p>Here are some highlights from my background:</p>
    <ul>
    {achievements}
    </ul>

    {links}

    <p>{call_to_action}</p>

    <p>I've attached my resume for your review. Thank you for your time.</p>

    <p>{sign_off}</p>
</body>
</html>"#,
            introduction = self.profile.introduction,
        )
    }
}

fn choose<'a>(pool: &[&'a str], rng: &mut dyn Randomness) -> &'a str {
    pool[rng.pick(pool.len()).min(pool.len() - 1)]
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_scheme(url: &str) -> &str {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
}
