use crate::llm::Message;
use crate::results::Page;

/// Character budget for the page contents of a brochure prompt
pub const MAX_PROMPT_CHARS: usize = 80_000;

/// Appended when brochure contents were cut to the budget
pub const TRUNCATION_NOTICE: &str = "\n\n[Content truncated due to length limitations]";

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an assistant that analyzes the contents of a website. \
Your goal is to provide a short, concise summary of the main content, \
ignoring text that appears to be navigation, boilerplate, or advertisements. \
Respond in markdown format. If the website contains news or announcements, \
please highlight the key ones.";

pub const BROCHURE_SYSTEM_PROMPT: &str = "You are an assistant that analyzes the contents of several relevant pages from a company website \
and creates a short brochure about the company for prospective customers, investors and recruits. Respond in markdown. \
Include details of company culture, customers and careers/jobs if you have the information.";

pub const LINK_SYSTEM_PROMPT: &str = r#"You are provided with a list of links found on a webpage. You are able to decide which of the links would be most relevant to include in a brochure about the company, such as links to an About page, or a Company page, or Careers/Jobs pages.
You should respond in JSON as in this example:
{
    "links": [
        {"type": "about page", "url": "https://full.url/goes/here/about"},
        {"type": "careers page", "url": "https://another.full.url/careers"}
    ]
}
If no relevant links are found based on the criteria, respond with:
{
    "links": []
}
"#;

const SEPARATOR: &str = "---------------------------------------------------------";

/// The `[system, user]` message pair sent for every completion
pub fn build_messages(system_prompt: &str, user_prompt: &str) -> Vec<Message> {
    vec![Message::system(system_prompt), Message::user(user_prompt)]
}

/// User prompt asking for a summary of one page
pub fn summary_user_prompt(page: &Page) -> String {
    let mut prompt = format!("You are looking at a website titled: '{}'\n\n", page.title);
    prompt.push_str("The relevant text content of this website is as follows:\n");
    prompt.push_str(SEPARATOR);
    prompt.push('\n');
    prompt.push_str(&page.text);
    prompt.push('\n');
    prompt.push_str(SEPARATOR);
    prompt.push_str("\n\n");
    prompt.push_str(
        "Please provide a short summary of this website in markdown. \
Focus on the primary purpose and key information. \
If it includes significant news or announcements, summarize these too.",
    );
    prompt
}

/// User prompt asking for a brochure built from the collected page contents
pub fn brochure_user_prompt(company_name: &str, details: &str) -> String {
    let mut prompt = format!("You are looking at a company called: {}\n", company_name);
    prompt.push_str(
        "Here are the contents of its landing page and other relevant pages; \
use this information to build a short brochure of the company in markdown.\n",
    );

    let (kept, truncated) = truncate_chars(details, MAX_PROMPT_CHARS);
    if truncated {
        ::log::warn!(
            "Total content is {} chars, truncating to {} chars",
            details.chars().count(),
            MAX_PROMPT_CHARS
        );
    }
    prompt.push_str(kept);
    if truncated {
        prompt.push_str(TRUNCATION_NOTICE);
    }
    prompt
}

/// User prompt listing the links to classify
pub fn links_user_prompt(page_url: &str, links: &[String]) -> String {
    let mut prompt = format!("Here is the list of links on the website of {} - ", page_url);
    prompt.push_str(
        "please decide which of these are relevant web links for a brochure about the company, \
respond with the full https URL in JSON format. \
Do not include Terms of Service, Privacy, email links.\n",
    );
    prompt.push_str("Links (some might be relative links):\n");
    prompt.push_str(&links.join("\n"));
    prompt
}

/// First `max_chars` characters of `text`, and whether anything was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}
